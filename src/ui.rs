// UI layer: everything that happens after the upload succeeded. Shows the
// link, puts it on the clipboard and, in interactive mode, asks whether the
// uploaded artifact should be deleted.

use crate::api::UploadResult;
use crate::archive::Archive;
use crate::clipboard::{Clipboard, NO_CLIPBOARD_HINT};
use crate::error::{Result, TransferError};
use dialoguer::Input;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Invalid answers tolerated before the prompt gives up and keeps the files.
pub const MAX_CONFIRM_ATTEMPTS: usize = 5;

/// Source of answers to yes/no style questions.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Keyboard prompt backed by `dialoguer`.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
    }
}

/// Reads one answer per line, for piped stdin.
pub struct LinePrompt<R> {
    reader: R,
}

impl<R: BufRead> LinePrompt<R> {
    pub fn new(reader: R) -> Self {
        LinePrompt { reader }
    }
}

impl<R: BufRead> Prompt for LinePrompt<R> {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        print!("{question}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// What the user asked to have deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    /// Delete the created archive, keep the original files.
    ArchiveOnly,
}

/// Parse an answer. `archive` is only accepted when an archive was created.
pub fn parse_confirmation(answer: &str, allow_archive: bool) -> Option<Confirmation> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(Confirmation::Yes),
        "n" | "no" => Some(Confirmation::No),
        "archive" if allow_archive => Some(Confirmation::ArchiveOnly),
        _ => None,
    }
}

/// Ask until a recognised answer arrives, at most `MAX_CONFIRM_ATTEMPTS`
/// times. Running out of attempts counts as "no".
pub fn confirm_removal(
    prompt: &mut dyn Prompt,
    question: &str,
    allow_archive: bool,
) -> Result<Confirmation> {
    let choices = if allow_archive {
        "y/n, yes/no, archive"
    } else {
        "y/n, yes/no"
    };
    let full_question = format!("{question} ({choices})");

    for attempt in 1..=MAX_CONFIRM_ATTEMPTS {
        let answer = prompt.ask(&full_question)?;
        if let Some(choice) = parse_confirmation(&answer, allow_archive) {
            return Ok(choice);
        }
        log::debug!("unrecognised answer {answer:?} (attempt {attempt})");
        println!("Please enter a valid answer ({choices})");
    }

    println!("No valid answer given, files will stay there");
    Ok(Confirmation::No)
}

/// Print the link with its expiry date, then try to copy it. Returns
/// whether the clipboard now holds the link.
pub fn present_link(result: &UploadResult, clipboard: &mut dyn Clipboard) -> bool {
    println!(
        "Link to download file (will be saved till {}):\n{}",
        result.expires_on, result.download_link
    );
    match clipboard.copy(&result.download_link) {
        Ok(()) => {
            println!("Link copied to clipboard");
            true
        }
        Err(e) => {
            log::warn!("{e}");
            println!("{NO_CLIPBOARD_HINT}");
            false
        }
    }
}

/// The thing that was sent: either the user's file or an archive we built.
#[derive(Debug, Clone)]
pub enum Uploaded {
    File(PathBuf),
    Archive(Archive),
}

impl Uploaded {
    pub fn path(&self) -> &Path {
        match self {
            Uploaded::File(path) => path,
            Uploaded::Archive(archive) => &archive.path,
        }
    }
}

/// Interactive deletion step. Returns the deletions that failed; they have
/// already been reported to the user.
pub fn offer_removal(prompt: &mut dyn Prompt, uploaded: &Uploaded) -> Result<Vec<TransferError>> {
    let failures: Vec<TransferError> = match uploaded {
        Uploaded::File(path) => match confirm_removal(prompt, "\nRemove file?", false)? {
            Confirmation::Yes => remove_file(path).err().into_iter().collect(),
            _ => keep(),
        },
        Uploaded::Archive(archive) => {
            match confirm_removal(prompt, "\nDelete files in the directory?", true)? {
                Confirmation::Yes => clean_up(archive),
                Confirmation::ArchiveOnly => remove_file(&archive.path).err().into_iter().collect(),
                Confirmation::No => keep(),
            }
        }
    };
    Ok(failures)
}

fn keep() -> Vec<TransferError> {
    println!("OK, files will stay there");
    Vec::new()
}

/// Delete one file, reporting the outcome.
pub fn remove_file(path: &Path) -> std::result::Result<(), TransferError> {
    println!("Removing file... {}", path.display());
    match fs::remove_file(path) {
        Ok(()) => {
            println!("Removed.");
            Ok(())
        }
        Err(source) => {
            let err = TransferError::Deletion {
                path: path.to_path_buf(),
                source,
            };
            report(&err);
            Err(err)
        }
    }
}

/// Remove the archive and every file that went into it. Keeps going past
/// failures and returns them.
pub fn clean_up(archive: &Archive) -> Vec<TransferError> {
    println!("\nCleaning up...");
    let mut failures = Vec::new();
    let originals = archive.files.iter().cloned();
    for path in originals.chain(std::iter::once(archive.path.clone())) {
        match fs::remove_file(&path) {
            Ok(()) => println!("Removed file: {}", path.display()),
            Err(source) => {
                let err = TransferError::Deletion { path, source };
                report(&err);
                failures.push(err);
            }
        }
    }
    failures
}

fn report(err: &TransferError) {
    log::warn!("{err}");
    eprintln!("Warning: {err}");
}
