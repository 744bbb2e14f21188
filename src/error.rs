// Error kinds: one variant per way an invocation can fail. Every kind is
// terminal for the current run; `main` turns it into a message and an exit
// status. Deletion failures are the exception and are only reported.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransferError>;

#[derive(Debug, Error)]
pub enum TransferError {
    /// The path does not exist, or is not the kind the flag asked for.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// Mutually exclusive flags were given together.
    #[error("conflicting options: {0}")]
    ArgumentConflict(String),

    #[error("could not create archive from {}: {message}", source_dir.display())]
    ArchiveCreation { source_dir: PathBuf, message: String },

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("could not delete {}: {source}", path.display())]
    Deletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading an answer from the terminal failed.
    #[error("could not read input: {0}")]
    Prompt(#[from] std::io::Error),
}

impl TransferError {
    pub fn invalid_path(path: impl Into<PathBuf>, reason: &str) -> Self {
        TransferError::InvalidPath {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn archive(source_dir: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        TransferError::ArchiveCreation {
            source_dir: source_dir.into(),
            message: err.to_string(),
        }
    }

    /// Process exit status for this error. Usage errors get 2, like clap,
    /// and an interrupted prompt gets the usual 128 + SIGINT.
    pub fn exit_code(&self) -> u8 {
        match self {
            TransferError::ArgumentConflict(_) => 2,
            e if e.is_interrupted() => 130,
            _ => 1,
        }
    }

    /// Ctrl-C while the terminal was in raw mode reading an answer.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, TransferError::Prompt(e) if e.kind() == std::io::ErrorKind::Interrupted)
    }
}

impl From<reqwest::Error> for TransferError {
    fn from(error: reqwest::Error) -> Self {
        TransferError::Upload(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_non_zero() {
        let errors = [
            TransferError::ArgumentConflict("-f and -d".into()),
            TransferError::invalid_path("/nope", "does not exist"),
            TransferError::archive("/tmp", "disk full"),
            TransferError::Upload("503".into()),
        ];
        for err in errors {
            assert_ne!(err.exit_code(), 0, "{err}");
        }
        assert_eq!(TransferError::ArgumentConflict(String::new()).exit_code(), 2);
    }

    #[test]
    fn test_interrupted_prompt() {
        let err = TransferError::from(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(err.is_interrupted());
        assert_eq!(err.exit_code(), 130);
        let err = TransferError::from(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        assert!(!err.is_interrupted());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_invalid_path_message_names_the_path() {
        let err = TransferError::invalid_path("/missing/file.txt", "no such file or directory");
        assert_eq!(
            err.to_string(),
            "invalid path /missing/file.txt: no such file or directory"
        );
    }
}
