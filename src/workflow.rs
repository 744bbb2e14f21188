// One invocation, top to bottom: resolve the target, zip it if it is a
// directory, upload, show the link, then deal with deletion. Any error ends
// the run before the later steps; a failed upload never reaches the
// clipboard or the deletion prompt.

use crate::api::{UploadResult, Uploader};
use crate::archive::create_archive;
use crate::cli::Mode;
use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::error::{Result, TransferError};
use crate::target::{TargetKind, UploadTarget};
use crate::ui::{self, Prompt, Uploaded};
use std::path::{Path, PathBuf};

/// What happens to the uploaded artifact afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    Ask,
    Delete,
    Keep,
}

/// Summary of a successful run.
#[derive(Debug)]
pub struct Outcome {
    pub result: UploadResult,
    pub uploaded: Uploaded,
    pub copied_to_clipboard: bool,
    /// Failed deletions, or a deletion prompt that could not be read. They
    /// don't fail the run: the link is already out.
    pub cleanup_failures: Vec<TransferError>,
}

pub struct Workflow<'a> {
    config: &'a Config,
    cwd: PathBuf,
    uploader: &'a dyn Uploader,
    clipboard: &'a mut dyn Clipboard,
    prompt: &'a mut dyn Prompt,
}

impl<'a> Workflow<'a> {
    pub fn new(
        config: &'a Config,
        cwd: impl Into<PathBuf>,
        uploader: &'a dyn Uploader,
        clipboard: &'a mut dyn Clipboard,
        prompt: &'a mut dyn Prompt,
    ) -> Self {
        Workflow {
            config,
            cwd: cwd.into(),
            uploader,
            clipboard,
            prompt,
        }
    }

    pub fn run(&mut self, mode: Mode) -> Result<Outcome> {
        let (target, removal) = self.resolve(mode)?;
        log::info!("uploading {} {}", target.kind(), target.path().display());

        let uploaded = self.prepare(&target)?;
        let result = self.uploader.upload(uploaded.path())?;
        let copied_to_clipboard = ui::present_link(&result, &mut *self.clipboard);

        let cleanup_failures = match removal {
            Removal::Ask => match ui::offer_removal(&mut *self.prompt, &uploaded) {
                Ok(failures) => failures,
                Err(e) if e.is_interrupted() => return Err(e),
                Err(e) => {
                    log::warn!("{e}");
                    eprintln!("Warning: {e}, files were left in place");
                    vec![e]
                }
            },
            Removal::Delete => ui::remove_file(uploaded.path()).err().into_iter().collect(),
            Removal::Keep => Vec::new(),
        };

        Ok(Outcome {
            result,
            uploaded,
            copied_to_clipboard,
            cleanup_failures,
        })
    }

    fn resolve(&mut self, mode: Mode) -> Result<(UploadTarget, Removal)> {
        match mode {
            Mode::Interactive => {
                let input = self.prompt.ask("Enter path to file or directory")?;
                let target = UploadTarget::resolve(Path::new(input.trim()), &self.cwd)?;
                Ok((target, Removal::Ask))
            }
            Mode::File { path, remove } => {
                let target = UploadTarget::expect(&path, &self.cwd, TargetKind::File)?;
                Ok((target, removal_flag(remove)))
            }
            Mode::Directory {
                path,
                remove_archive,
            } => {
                let target = UploadTarget::expect(&path, &self.cwd, TargetKind::Directory)?;
                Ok((target, removal_flag(remove_archive)))
            }
            Mode::Send {
                path,
                rm_file,
                rm_archive,
            } => {
                let target = UploadTarget::resolve(&path, &self.cwd)?;
                let remove = match target.kind() {
                    TargetKind::File if rm_archive => {
                        return Err(TransferError::ArgumentConflict(
                            "--ra given for a file, use --rf".into(),
                        ))
                    }
                    TargetKind::Directory if rm_file => {
                        return Err(TransferError::ArgumentConflict(
                            "--rf given for a directory, use --ra".into(),
                        ))
                    }
                    _ => rm_file || rm_archive,
                };
                Ok((target, removal_flag(remove)))
            }
        }
    }

    fn prepare(&self, target: &UploadTarget) -> Result<Uploaded> {
        match target.kind() {
            TargetKind::File => Ok(Uploaded::File(target.path().to_path_buf())),
            TargetKind::Directory => {
                // The archive goes next to the files it was made from.
                let archive = create_archive(target.path(), target.path(), self.config.naming)?;
                Ok(Uploaded::Archive(archive))
            }
        }
    }
}

fn removal_flag(remove: bool) -> Removal {
    if remove {
        Removal::Delete
    } else {
        Removal::Keep
    }
}
