//! Speech-to-text: the transcriber contract and its implementations.

pub mod demucs;
pub mod transcriber;
pub mod whisper;

pub use transcriber::{MockTranscriber, Transcriber};
pub use whisper::{WhisperConfig, WhisperTranscriber};
