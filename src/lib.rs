// Library root
// -----------
// This crate exposes the pieces the `transfer_files` binary is built from.
//
// Module responsibilities:
// - `cli`: command-line flags and the conflict checks that pick a run mode.
// - `target`: turns a user-supplied path into an absolute file/directory target.
// - `archive`: zips the immediate files of a directory.
// - `api`: uploads a file to the hosting endpoint and reads the link back.
// - `clipboard`: best-effort copy of the link to the system clipboard.
// - `ui`: link display, deletion prompt and file removal.
// - `workflow`: runs one invocation through all of the above.
// - `config` and `error`: runtime settings and the error kinds.
pub mod api;
pub mod archive;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod target;
pub mod ui;
pub mod workflow;
