// Upload targets: turns whatever path the user typed into an absolute path
// and decides whether it names a single file or a directory to archive.

use crate::error::{Result, TransferError};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::File => write!(f, "file"),
            TargetKind::Directory => write!(f, "directory"),
        }
    }
}

/// A resolved, absolute path together with what it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    path: PathBuf,
    kind: TargetKind,
}

impl UploadTarget {
    /// Resolve `input` against `cwd` and classify it by inspecting the
    /// filesystem.
    pub fn resolve(input: &Path, cwd: &Path) -> Result<Self> {
        let path = absolutize(input, cwd);
        let kind = if path.is_file() {
            TargetKind::File
        } else if path.is_dir() {
            TargetKind::Directory
        } else {
            return Err(TransferError::invalid_path(
                path,
                "not an existing file or directory",
            ));
        };
        log::debug!("resolved {} to {} ({kind})", input.display(), path.display());
        Ok(UploadTarget { path, kind })
    }

    /// Like `resolve`, but the path must be of the given kind.
    pub fn expect(input: &Path, cwd: &Path, kind: TargetKind) -> Result<Self> {
        let target = Self::resolve(input, cwd)?;
        if target.kind != kind {
            return Err(TransferError::invalid_path(
                target.path,
                &format!("expected a {kind}, found a {}", target.kind),
            ));
        }
        Ok(target)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}

/// Join relative paths onto `cwd`; absolute paths pass through unchanged.
pub fn absolutize(input: &Path, cwd: &Path) -> PathBuf {
    if input.is_absolute() {
        input.to_path_buf()
    } else {
        cwd.join(input)
    }
}
