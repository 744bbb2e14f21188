// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, build the collaborators and hand them to
//   the workflow.
// - Maps errors to exit statuses; Ctrl-C stops immediately without cleanup.

use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use std::process::ExitCode;
use transfersh_uploader::{
    api::TransferClient,
    cli::Args,
    clipboard::SystemClipboard,
    config::Config,
    error::TransferError,
    ui::{LinePrompt, Prompt, TerminalPrompt},
    workflow::Workflow,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Nothing is rolled back: an archive that was already written stays.
    if let Err(e) = ctrlc::set_handler(|| {
        println!("\nExecution stopped");
        std::process::exit(130);
    }) {
        log::warn!("could not install interrupt handler: {e}");
    }

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let transfer_err = err.downcast_ref::<TransferError>();
            if transfer_err.is_some_and(TransferError::is_interrupted) {
                println!("\nExecution stopped");
                return ExitCode::from(130);
            }
            eprintln!("Error: {err:#}");
            if let Some(TransferError::ArgumentConflict(_)) = transfer_err {
                eprintln!("\n{}", Args::command().render_usage());
            }
            ExitCode::from(transfer_err.map_or(1, TransferError::exit_code))
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mode = args.mode()?;

    let mut config = Config::from_env();
    args.apply_to(&mut config);
    log::debug!("using {config:?}");

    let cwd = std::env::current_dir()?;
    let uploader = TransferClient::new(&config)?;
    let mut clipboard = SystemClipboard::new();
    let mut prompt: Box<dyn Prompt> = if std::io::stdin().is_terminal() {
        Box::new(TerminalPrompt)
    } else {
        Box::new(LinePrompt::new(std::io::stdin().lock()))
    };

    let mut workflow = Workflow::new(&config, cwd, &uploader, &mut clipboard, prompt.as_mut());
    let outcome = workflow.run(mode)?;

    if !outcome.cleanup_failures.is_empty() {
        log::warn!(
            "{} clean-up step(s) failed, upload is still available",
            outcome.cleanup_failures.len()
        );
    }
    Ok(())
}
