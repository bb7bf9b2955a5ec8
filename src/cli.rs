//! Command-line interface for voxprep
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Speech dataset preparation
#[derive(Parser, Debug)]
#[command(
    name = "voxprep",
    version,
    about = "Transcribe speaker audio into manifest + clip datasets"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Dataset root: one subdirectory per speaker
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Whisper model (default: medium, multilingual)
    #[arg(long, short = 'm', value_name = "MODEL")]
    pub model: Option<String>,

    /// Language code for transcription (default: auto-detect). Examples: auto, en, ja, de
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Resample output clips to this rate in Hz (default: keep native rate)
    #[arg(long, short = 's', value_name = "HZ")]
    pub resample: Option<u32>,

    /// Trailing padding added to each segment end, in seconds
    #[arg(long, value_name = "SECS")]
    pub pad: Option<f64>,

    /// Run demucs vocal isolation before transcription
    #[arg(long)]
    pub demucs: bool,

    /// Model weights directory (default: ~/.cache/voxprep/models)
    #[arg(long, value_name = "PATH")]
    pub model_dir: Option<PathBuf>,

    /// Inference threads
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Prevent automatic model download if the configured model is missing
    #[arg(long)]
    pub no_download: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage Whisper models
    Models {
        /// Action to perform
        #[command(subcommand)]
        action: ModelsAction,
    },
}

/// Actions for the models subcommand
#[derive(Subcommand, Debug)]
pub enum ModelsAction {
    /// List available and installed models
    List,

    /// Download and install a model
    Install {
        /// Model name (e.g. tiny, base, small, medium, large-v3)
        name: String,
    },
}
