//! voxprep - Speech dataset preparation
//!
//! Batch-transcribes per-speaker recordings into LJSpeech-style
//! manifest + WAV clip datasets.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod manifest;
pub mod models;
pub mod scan;
pub mod segment;
pub mod stt;
pub mod writer;

// Core pipeline surface
pub use app::{RunSummary, run_batch_command, run_prepare};
pub use manifest::{ClipId, Manifest};
pub use scan::{ScanReport, SpeakerDir, scan_root};
pub use segment::{Segment, SegmentList, Word};
pub use stt::transcriber::Transcriber;
pub use writer::{DurationVerdict, WriteOutcome, WriterConfig, write_segments};

// Error handling
pub use error::{Result, VoxprepError};

// Config
pub use config::{Config, DatasetConfig, SttConfig};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(ver.contains('+'));
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
