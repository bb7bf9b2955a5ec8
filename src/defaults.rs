//! Default configuration constants for voxprep.
//!
//! Shared constants used across configuration, segment refinement and the
//! clip writer, kept in one place to avoid drift between modules.

/// Sample rate Whisper expects for inference, in Hz.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Minimum accepted clip duration in seconds (inclusive).
///
/// Anything shorter is too small to be a useful training example.
pub const MIN_CLIP_SECS: f64 = 0.5;

/// Maximum accepted clip duration in seconds (inclusive).
///
/// Longer segments are usually misaligned timestamps rather than real
/// ten-second utterances.
pub const MAX_CLIP_SECS: f64 = 10.0;

/// Trailing padding added to a segment's end time, in seconds.
///
/// Whisper end timestamps tend to clip trailing speech; the padding keeps
/// word endings intact. 0.2 is a reasonable alternative for tightly-cut
/// source material — tunable via `--pad`.
pub const END_PAD_SECS: f64 = 0.3;

/// Minimum silence gap that splits a segment, in seconds.
pub const GAP_SPLIT_SECS: f64 = 0.5;

/// Maximum gap below which adjacent segments are merged, in seconds.
pub const GAP_MERGE_SECS: f64 = 0.15;

/// Word-count ceiling for gap merging: only merge when the merged segment
/// would have at most this many words.
pub const GAP_MERGE_MAX_WORDS: usize = 3;

/// Punctuation marks that end a sentence.
pub const SENTENCE_MARKS: &[char] = &['.', '。', '?'];

/// Punctuation marks that continue a clause (merge targets).
pub const CLAUSE_MARKS: &[char] = &[',', '、'];

/// Per-speaker manifest filename. Its presence marks a speaker directory
/// as already processed.
pub const MANIFEST_FILENAME: &str = "metadata.csv";

/// Subdirectory of a speaker directory holding the output clips.
pub const CLIP_DIR_NAME: &str = "wavs";

/// Default Whisper model name.
pub const DEFAULT_MODEL: &str = "medium";

/// Default language code for transcription.
///
/// "auto" lets Whisper detect the spoken language. Set a specific code
/// (e.g. "en", "ja") to force a language.
pub const DEFAULT_LANGUAGE: &str = "auto";

/// Language value that triggers automatic language detection.
pub const AUTO_LANGUAGE: &str = "auto";
