//! Configuration: TOML file, environment overrides, CLI merge.
//!
//! Precedence is CLI > environment > config file > defaults. The merged
//! result is an explicit struct threaded through the pipeline; there is no
//! ambient global state.

use crate::defaults;
use crate::error::{Result, VoxprepError};
use crate::writer::WriterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub stt: SttConfig,
}

/// Dataset output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetConfig {
    /// Output sample rate in Hz; absent keeps each file's native rate.
    pub target_sample_rate: Option<u32>,
    /// Trailing padding added to segment end times, in seconds.
    pub end_pad_secs: f64,
    /// Minimum accepted clip duration in seconds (inclusive).
    pub min_clip_secs: f64,
    /// Maximum accepted clip duration in seconds (inclusive).
    pub max_clip_secs: f64,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    pub model: String,
    pub language: String,
    /// Run demucs vocal isolation before transcription.
    pub demucs: bool,
    /// Model weights directory; absent uses the cache directory.
    pub model_dir: Option<PathBuf>,
    /// Inference threads (absent = whisper.cpp default).
    pub threads: Option<usize>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: None,
            end_pad_secs: defaults::END_PAD_SECS,
            min_clip_secs: defaults::MIN_CLIP_SECS,
            max_clip_secs: defaults::MAX_CLIP_SECS,
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            demucs: false,
            model_dir: None,
            threads: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Missing fields use default values; a missing file or invalid TOML is
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VoxprepError::ConfigFileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from a file, or return defaults if the file doesn't exist.
    /// Invalid TOML still errors.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported variables:
    /// - VOXPREP_MODEL -> stt.model
    /// - VOXPREP_LANGUAGE -> stt.language
    /// - VOXPREP_MODEL_DIR -> stt.model_dir
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("VOXPREP_MODEL")
            && !model.is_empty()
        {
            self.stt.model = model;
        }

        if let Ok(language) = std::env::var("VOXPREP_LANGUAGE")
            && !language.is_empty()
        {
            self.stt.language = language;
        }

        if let Ok(dir) = std::env::var("VOXPREP_MODEL_DIR")
            && !dir.is_empty()
        {
            self.stt.model_dir = Some(PathBuf::from(dir));
        }

        self
    }

    /// Default configuration file path: `~/.config/voxprep/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("voxprep")
            .join("config.toml")
    }

    /// Validate the merged configuration before a run.
    pub fn validate(&self) -> Result<()> {
        if self.dataset.min_clip_secs >= self.dataset.max_clip_secs {
            return Err(VoxprepError::ConfigInvalidValue {
                key: "dataset.min_clip_secs".to_string(),
                message: format!(
                    "must be below max_clip_secs ({} >= {})",
                    self.dataset.min_clip_secs, self.dataset.max_clip_secs
                ),
            });
        }
        if self.dataset.end_pad_secs < 0.0 {
            return Err(VoxprepError::ConfigInvalidValue {
                key: "dataset.end_pad_secs".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if self.dataset.target_sample_rate == Some(0) {
            return Err(VoxprepError::ConfigInvalidValue {
                key: "dataset.target_sample_rate".to_string(),
                message: "must be a positive rate in Hz".to_string(),
            });
        }
        Ok(())
    }

    /// The writer configuration implied by this config.
    pub fn writer_config(&self, quiet: bool) -> WriterConfig {
        WriterConfig {
            target_sample_rate: self.dataset.target_sample_rate,
            end_pad_secs: self.dataset.end_pad_secs,
            min_clip_secs: self.dataset.min_clip_secs,
            max_clip_secs: self.dataset.max_clip_secs,
            quiet,
        }
    }
}
