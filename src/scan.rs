//! Input directory scanning.
//!
//! The input root contains one subdirectory per speaker; each speaker
//! directory contains that speaker's source recordings directly (no
//! recursion). A speaker directory that already holds a manifest file is
//! considered processed and excluded, with its files subtracted from the
//! progress total.

use crate::defaults;
use crate::error::{Result, VoxprepError};
use std::fs;
use std::path::{Path, PathBuf};

/// One speaker directory with its pending input files.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerDir {
    /// Directory name, used as the speaker label in clip identifiers.
    pub name: String,
    pub path: PathBuf,
    /// Files directly contained in the directory, sorted by name.
    pub audio_files: Vec<PathBuf>,
}

/// Result of scanning the input root.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Speakers still to process, sorted by name.
    pub speakers: Vec<SpeakerDir>,
    /// Speakers skipped because their manifest already exists.
    pub skipped: Vec<String>,
    /// Total pending files across all unskipped speakers.
    pub total_files: usize,
}

/// List the files directly contained in a directory, sorted by name.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Scan the input root for speaker directories.
///
/// Sorting makes file indices (and thus clip identifiers) deterministic
/// across runs.
///
/// # Errors
/// Returns [`VoxprepError::InputDirNotFound`] if the root does not exist or
/// is not a directory; I/O errors during traversal propagate as fatal.
pub fn scan_root(root: &Path) -> Result<ScanReport> {
    if !root.is_dir() {
        return Err(VoxprepError::InputDirNotFound {
            path: root.display().to_string(),
        });
    }

    let mut dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut report = ScanReport::default();
    for dir in dirs {
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let files = list_files(&dir)?;

        if dir.join(defaults::MANIFEST_FILENAME).exists() {
            report.skipped.push(name.to_string());
            continue;
        }

        report.total_files += files.len();
        report.speakers.push(SpeakerDir {
            name: name.to_string(),
            path: dir,
            audio_files: files,
        });
    }

    Ok(report)
}
