// Command-line arguments and the checks that turn them into a run mode.
// Flag conflicts are reported as `TransferError::ArgumentConflict` before
// anything touches the filesystem or the network.

use crate::archive::ArchiveNaming;
use crate::config::Config;
use crate::error::{Result, TransferError};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Send files to transfer.sh and get a download link back, straight from the
/// command line.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "transfer_files", version)]
#[command(about = "Upload a file, or a directory as a zip archive, to transfer.sh")]
#[command(
    long_about = "Upload a file, or all files of a directory as a zip archive, to transfer.sh. \
The download link is printed and copied to the clipboard. Uploads are kept for 14 days. \
Run without arguments to be asked for a path."
)]
pub struct Args {
    /// Run in interactive mode (asks for a path in the prompt)
    #[arg(short, long)]
    pub interactive: bool,

    /// Directory whose files are zipped and uploaded
    #[arg(short, long, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// File to upload
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// File or directory to upload (used instead of -f or -d)
    #[arg(short, long, value_name = "PATH")]
    pub send: Option<PathBuf>,

    /// Remove the file after sending
    #[arg(long = "rm-file", alias = "rf")]
    pub rm_file: bool,

    /// Remove only the created archive after sending
    #[arg(long = "rm-archive", alias = "ra")]
    pub rm_archive: bool,

    /// Upload endpoint [env: TRANSFER_URL]
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Give up on the upload after this many seconds [env: TRANSFER_TIMEOUT]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Add seconds and milliseconds to archive names
    #[arg(long)]
    pub precise_name: bool,
}

/// What this invocation is going to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Ask for a path, then ask before deleting anything.
    Interactive,
    File { path: PathBuf, remove: bool },
    Directory { path: PathBuf, remove_archive: bool },
    /// File or directory, decided by looking at the path.
    Send {
        path: PathBuf,
        rm_file: bool,
        rm_archive: bool,
    },
}

impl Args {
    /// Validate the flag combination.
    pub fn mode(&self) -> Result<Mode> {
        let has_target = self.file.is_some() || self.directory.is_some() || self.send.is_some();

        if self.interactive {
            if has_target || self.rm_file || self.rm_archive {
                return conflict("--interactive can't be combined with other options");
            }
            return Ok(Mode::Interactive);
        }
        if self.file.is_some() && self.directory.is_some() {
            return conflict("use either -f or -d");
        }
        if self.rm_file && self.rm_archive {
            return conflict("use either --rf or --ra");
        }
        if self.file.is_some() && self.rm_archive {
            return conflict("--ra only applies to -d, use --rf with -f");
        }
        if self.directory.is_some() && self.rm_file {
            return conflict("--rf only applies to -f, use --ra with -d");
        }

        if let Some(path) = &self.send {
            if self.file.is_some() || self.directory.is_some() {
                println!("Using path provided by --send, omitting --file and --directory");
            }
            return Ok(Mode::Send {
                path: path.clone(),
                rm_file: self.rm_file,
                rm_archive: self.rm_archive,
            });
        }
        if let Some(path) = &self.file {
            return Ok(Mode::File {
                path: path.clone(),
                remove: self.rm_file,
            });
        }
        if let Some(path) = &self.directory {
            return Ok(Mode::Directory {
                path: path.clone(),
                remove_archive: self.rm_archive,
            });
        }
        if self.rm_file || self.rm_archive {
            return conflict("--rf and --ra need a path from -f, -d or -s");
        }
        Ok(Mode::Interactive)
    }

    /// Let command-line values win over the environment.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.upload_url = url.clone();
        }
        if let Some(secs) = self.timeout {
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if self.precise_name {
            config.naming = ArchiveNaming::Precise;
        }
    }
}

fn conflict<T>(msg: &str) -> Result<T> {
    Err(TransferError::ArgumentConflict(msg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode_of(argv: &[&str]) -> Result<Mode> {
        Args::parse_from(argv).mode()
    }

    #[test]
    fn test_no_arguments_is_interactive() {
        assert_eq!(mode_of(&["transfer_files"]).unwrap(), Mode::Interactive);
        assert_eq!(mode_of(&["transfer_files", "-i"]).unwrap(), Mode::Interactive);
    }

    #[test]
    fn test_file_with_rm_file() {
        let mode = mode_of(&["transfer_files", "-f", "a.txt", "--rf"]).unwrap();
        assert_eq!(
            mode,
            Mode::File {
                path: "a.txt".into(),
                remove: true
            }
        );
    }

    #[test]
    fn test_directory_with_long_rm_archive() {
        let mode = mode_of(&["transfer_files", "--directory", "pics", "--rm-archive"]).unwrap();
        assert_eq!(
            mode,
            Mode::Directory {
                path: "pics".into(),
                remove_archive: true
            }
        );
    }

    #[test]
    fn test_conflicting_combinations() {
        let cases: &[&[&str]] = &[
            &["transfer_files", "-f", "a", "-d", "b"],
            &["transfer_files", "-f", "a", "--ra"],
            &["transfer_files", "-d", "b", "--rf"],
            &["transfer_files", "-f", "a", "--rf", "--ra"],
            &["transfer_files", "-i", "-f", "a"],
            &["transfer_files", "-i", "--rm-file"],
            &["transfer_files", "--rf"],
        ];
        for argv in cases {
            let err = mode_of(argv).unwrap_err();
            assert!(
                matches!(err, TransferError::ArgumentConflict(_)),
                "{argv:?} gave {err}"
            );
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn test_send_takes_precedence() {
        let mode = mode_of(&["transfer_files", "-s", "x", "-f", "a", "--rf"]).unwrap();
        assert_eq!(
            mode,
            Mode::Send {
                path: "x".into(),
                rm_file: true,
                rm_archive: false
            }
        );
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "transfer_files",
            "--url",
            "http://127.0.0.1:8080/",
            "--timeout",
            "10",
            "--precise-name",
        ]);
        let mut config = Config::default();
        args.apply_to(&mut config);
        assert_eq!(config.upload_url, "http://127.0.0.1:8080/");
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.naming, ArchiveNaming::Precise);
    }
}
