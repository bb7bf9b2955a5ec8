//! Clip identifiers and the per-speaker manifest file.
//!
//! The manifest is a `metadata.csv` of `id|text` lines inside each speaker
//! directory. Its presence marks the speaker as processed, so it is created
//! lazily on the first accepted segment and never rewritten.

use crate::defaults;
use crate::error::Result;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Identifier tying a manifest line to its clip file.
///
/// Rendered as `<speaker>_<fileIndex>_<segmentIndex>`; the clip filename is
/// the same with a `.wav` extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipId {
    pub speaker: String,
    pub file_index: usize,
    pub segment_index: usize,
}

impl ClipId {
    pub fn new(speaker: &str, file_index: usize, segment_index: usize) -> Self {
        Self {
            speaker: speaker.to_string(),
            file_index,
            segment_index,
        }
    }

    /// Clip filename: `<id>.wav`.
    pub fn wav_filename(&self) -> String {
        format!("{self}.wav")
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.speaker, self.file_index, self.segment_index)
    }
}

/// Append-only writer for a speaker's manifest file.
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
}

impl Manifest {
    /// Manifest handle for a speaker directory. Nothing is created until the
    /// first [`append`](Self::append).
    pub fn for_speaker_dir(speaker_dir: &Path) -> Self {
        Self {
            path: speaker_dir.join(defaults::MANIFEST_FILENAME),
        }
    }

    /// Whether a manifest already exists in `speaker_dir` (idempotency gate).
    pub fn exists(speaker_dir: &Path) -> bool {
        speaker_dir.join(defaults::MANIFEST_FILENAME).exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `id|text` line, creating the file if needed.
    pub fn append(&self, id: &ClipId, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{id}|{text}")?;
        Ok(())
    }
}
