// Archiver: packs the regular files that sit directly inside a directory into
// a single zip. Subdirectories are skipped, not walked. Source and
// destination are explicit parameters; the process working directory is never
// touched.

use crate::error::{Result, TransferError};
use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// How archive file names are derived from the creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveNaming {
    /// `files_archive_MM-DD_HH:MM.zip`. Two runs in the same minute write the
    /// same name and the later one overwrites the earlier archive.
    #[default]
    Minute,
    /// Adds seconds and milliseconds to the minute token.
    Precise,
}

/// A zip built from a directory. The file stays on disk until removed.
#[derive(Debug, Clone)]
pub struct Archive {
    pub path: PathBuf,
    pub source_dir: PathBuf,
    pub created_at: DateTime<Local>,
    /// Names of the entries in the order they were added.
    pub entries: Vec<String>,
    /// The file each entry was read from, same order as `entries`.
    pub files: Vec<PathBuf>,
}

pub fn archive_name(created_at: &DateTime<Local>, naming: ArchiveNaming) -> String {
    let token = match naming {
        ArchiveNaming::Minute => created_at.format("%m-%d_%H:%M"),
        ArchiveNaming::Precise => created_at.format("%m-%d_%H:%M:%S%.3f"),
    };
    format!("files_archive_{token}.zip")
}

/// Zip the immediate regular files of `source_dir` into `dest_dir`, named
/// after the current local time.
pub fn create_archive(source_dir: &Path, dest_dir: &Path, naming: ArchiveNaming) -> Result<Archive> {
    create_archive_at(source_dir, dest_dir, Local::now(), naming)
}

pub fn create_archive_at(
    source_dir: &Path,
    dest_dir: &Path,
    created_at: DateTime<Local>,
    naming: ArchiveNaming,
) -> Result<Archive> {
    let path = dest_dir.join(archive_name(&created_at, naming));

    // List before creating the zip so it never ends up inside itself.
    let files: Vec<PathBuf> = list_files(source_dir)?
        .into_iter()
        .filter(|f| f != &path)
        .collect();

    println!("Creating zipfile from files in... {}", source_dir.display());
    log::info!("archiving {} file(s) into {}", files.len(), path.display());

    let out = File::create(&path).map_err(|e| TransferError::archive(source_dir, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(out));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let pb = ProgressBar::new(files.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}") {
        pb.set_style(style);
    }

    let mut entries = Vec::with_capacity(files.len());
    let mut added = Vec::with_capacity(files.len());
    for file in files {
        let name = match entry_name(&file) {
            Some(n) => n,
            None => continue,
        };
        pb.set_message(name.clone());

        zip.start_file(name.as_str(), options)
            .map_err(|e| TransferError::archive(source_dir, e))?;
        let mut input = File::open(&file).map_err(|e| TransferError::archive(source_dir, e))?;
        io::copy(&mut input, &mut zip).map_err(|e| TransferError::archive(source_dir, e))?;

        pb.suspend(|| println!("Added file: {name}"));
        pb.inc(1);
        entries.push(name);
        added.push(file);
    }

    zip.finish().map_err(|e| TransferError::archive(source_dir, e))?;
    pb.finish_and_clear();

    Ok(Archive {
        path,
        source_dir: source_dir.to_path_buf(),
        created_at,
        entries,
        files: added,
    })
}

/// Zip entry name for `file`. Zip names are UTF-8, so anything else is
/// stored lossily.
fn entry_name(file: &Path) -> Option<String> {
    let name = file.file_name()?;
    match name.to_str() {
        Some(n) => Some(n.to_string()),
        None => {
            let lossy = name.to_string_lossy().into_owned();
            log::warn!("{} is not valid UTF-8, stored as {lossy}", file.display());
            Some(lossy)
        }
    }
}

/// Regular files directly inside `dir`, sorted by name. Symlinks are
/// followed; links to directories and dangling links are skipped.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| TransferError::archive(dir, e))? {
        let path = entry.map_err(|e| TransferError::archive(dir, e))?.path();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => log::debug!("skipping non-regular entry {}", path.display()),
            Err(e) => log::info!("skipping {}: {e}", path.display()),
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 42).unwrap()
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_archive_name_minute_token() {
        assert_eq!(
            archive_name(&fixed_time(), ArchiveNaming::Minute),
            "files_archive_03-07_09:05.zip"
        );
    }

    #[test]
    fn test_archive_name_precise_token() {
        let name = archive_name(&fixed_time(), ArchiveNaming::Precise);
        assert_eq!(name, "files_archive_03-07_09:05:42.000.zip");
    }

    #[test]
    fn test_only_immediate_regular_files_are_archived() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), "alpha").unwrap();
        fs::write(src.path().join("b.bin"), [0u8, 1, 2, 3]).unwrap();
        fs::create_dir(src.path().join("nested")).unwrap();
        fs::write(src.path().join("nested").join("deep.txt"), "deep").unwrap();

        let archive =
            create_archive_at(src.path(), dest.path(), fixed_time(), ArchiveNaming::Minute).unwrap();

        assert_eq!(archive.entries, vec!["a.txt", "b.bin"]);
        assert_eq!(
            archive.files,
            vec![src.path().join("a.txt"), src.path().join("b.bin")]
        );
        assert_eq!(entry_names(&archive.path), vec!["a.txt", "b.bin"]);
        assert_eq!(archive.source_dir, src.path());
        assert!(archive.path.starts_with(dest.path()));
    }

    #[test]
    fn test_entry_contents_are_preserved() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("hello.txt"), "hello world").unwrap();

        let archive =
            create_archive_at(src.path(), src.path(), fixed_time(), ArchiveNaming::Minute).unwrap();

        let mut zip = ZipArchive::new(File::open(&archive.path).unwrap()).unwrap();
        let mut contents = String::new();
        zip.by_name("hello.txt").unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "hello world");
    }

    #[test]
    fn test_archive_written_into_source_does_not_contain_itself() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), "a").unwrap();

        // Same minute twice: the second run overwrites the first archive.
        let first =
            create_archive_at(src.path(), src.path(), fixed_time(), ArchiveNaming::Minute).unwrap();
        let second =
            create_archive_at(src.path(), src.path(), fixed_time(), ArchiveNaming::Minute).unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(entry_names(&second.path), vec!["a.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_followed() {
        use std::os::unix::fs::symlink;

        let src = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        fs::write(elsewhere.path().join("real.txt"), "linked contents").unwrap();
        symlink(elsewhere.path().join("real.txt"), src.path().join("link.txt")).unwrap();
        symlink(elsewhere.path(), src.path().join("dir-link")).unwrap();
        symlink(src.path().join("missing"), src.path().join("dangling")).unwrap();

        let dest = TempDir::new().unwrap();
        let archive =
            create_archive_at(src.path(), dest.path(), fixed_time(), ArchiveNaming::Minute).unwrap();

        assert_eq!(archive.entries, vec!["link.txt"]);
        let mut zip = ZipArchive::new(File::open(&archive.path).unwrap()).unwrap();
        let mut contents = String::new();
        zip.by_name("link.txt").unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "linked contents");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_name_keeps_real_source_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let src = TempDir::new().unwrap();
        let original = src.path().join(OsStr::from_bytes(b"caf\xe9.txt"));
        fs::write(&original, "latin-1 name").unwrap();

        let dest = TempDir::new().unwrap();
        let archive =
            create_archive_at(src.path(), dest.path(), fixed_time(), ArchiveNaming::Minute).unwrap();

        assert_eq!(archive.entries, vec!["caf\u{fffd}.txt"]);
        assert_eq!(archive.files, vec![original]);
    }

    #[test]
    fn test_empty_directory_gives_empty_archive() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        let archive =
            create_archive_at(src.path(), dest.path(), fixed_time(), ArchiveNaming::Minute).unwrap();

        assert!(archive.entries.is_empty());
        assert!(entry_names(&archive.path).is_empty());
    }

    #[test]
    fn test_missing_source_is_archive_error() {
        let dest = TempDir::new().unwrap();
        let err = create_archive(&dest.path().join("gone"), dest.path(), ArchiveNaming::Minute)
            .unwrap_err();
        assert!(matches!(err, TransferError::ArchiveCreation { .. }));
    }

    #[test]
    fn test_unwritable_destination_is_archive_error() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), "a").unwrap();
        let err = create_archive(src.path(), &src.path().join("no-such-dir"), ArchiveNaming::Minute)
            .unwrap_err();
        assert!(matches!(err, TransferError::ArchiveCreation { .. }));
    }
}
