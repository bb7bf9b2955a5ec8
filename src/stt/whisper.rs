//! Whisper-based transcription adapter.
//!
//! Wraps whisper-rs: the ggml model is loaded once and reused for every
//! file in the run. Requires the `whisper` feature (and cmake to build);
//! without it a stub is compiled that fails with guidance at runtime.

use crate::audio;
use crate::defaults;
use crate::error::{Result, VoxprepError};
use crate::segment::SegmentList;
use crate::stt::demucs;
use crate::stt::transcriber::Transcriber;
use std::path::{Path, PathBuf};

#[cfg(feature = "whisper")]
use std::sync::{Mutex, Once};
#[cfg(feature = "whisper")]
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

#[cfg(feature = "whisper")]
static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for the Whisper transcriber.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the ggml model file.
    pub model_path: PathBuf,
    /// Language code ("auto" enables detection).
    pub language: String,
    /// Inference threads (None = whisper.cpp default).
    pub threads: Option<usize>,
    /// Run demucs vocal isolation before transcription.
    pub demucs: bool,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-medium.bin"),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            threads: None,
            demucs: false,
        }
    }
}

/// Whisper transcriber holding the loaded model context.
#[cfg(feature = "whisper")]
pub struct WhisperTranscriber {
    context: Mutex<WhisperContext>,
    config: WhisperConfig,
    model_name: String,
}

#[cfg(feature = "whisper")]
impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("config", &self.config)
            .field("model_name", &self.model_name)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

/// Placeholder compiled without the `whisper` feature; fails at runtime
/// with build guidance.
#[cfg(not(feature = "whisper"))]
#[derive(Debug)]
pub struct WhisperTranscriber {
    config: WhisperConfig,
    model_name: String,
}

fn model_name_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Load the source file (or its isolated vocals) as mono 16kHz f32 samples.
fn load_whisper_input(path: &Path, use_demucs: bool) -> Result<Vec<f32>> {
    let vocals = if use_demucs {
        Some(demucs::isolate_vocals(path)?)
    } else {
        None
    };
    let source = vocals.as_ref().map_or(path, |v| v.path());

    let (channels, native_rate) = audio::decode_file(source)?;
    let mono = audio::downmix_mono(&channels);
    audio::resample(&mono, native_rate, defaults::WHISPER_SAMPLE_RATE)
}

#[cfg(feature = "whisper")]
impl WhisperTranscriber {
    /// Load the model named in `config`.
    ///
    /// # Errors
    /// [`VoxprepError::ModelNotFound`] if the model file is missing,
    /// [`VoxprepError::Transcription`] if whisper.cpp rejects it.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        // Suppress whisper.cpp's own logging (once per process)
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(VoxprepError::ModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = model_name_of(&config.model_path);

        let context_params = WhisperContextParameters::default();
        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| VoxprepError::Transcription {
                    message: "Invalid UTF-8 in model path".to_string(),
                })?,
            context_params,
        )
        .map_err(|e| VoxprepError::Transcription {
            message: format!("Failed to load Whisper model: {e}"),
        })?;

        Ok(Self {
            context: Mutex::new(context),
            config,
            model_name,
        })
    }

    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

#[cfg(feature = "whisper")]
impl Transcriber for WhisperTranscriber {
    fn transcribe_file(&self, path: &Path) -> Result<SegmentList> {
        let samples = load_whisper_input(path, self.config.demucs)?;

        let context = self
            .context
            .lock()
            .map_err(|e| VoxprepError::Transcription {
                message: format!("Failed to acquire context lock: {e}"),
            })?;

        let mut state = context
            .create_state()
            .map_err(|e| VoxprepError::Transcription {
                message: format!("Failed to create Whisper state: {e}"),
            })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        // "auto" -> let whisper detect the language
        if self.config.language == defaults::AUTO_LANGUAGE {
            params.set_language(None);
        } else {
            params.set_language(Some(&self.config.language));
        }

        if let Some(threads) = self.config.threads {
            params.set_n_threads(threads as i32);
        }

        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, &samples)
            .map_err(|e| VoxprepError::Transcription {
                message: format!("Whisper inference failed: {e}"),
            })?;

        // Segment timestamps arrive in centiseconds
        let spans: Vec<(f64, f64, String)> = state
            .as_iter()
            .map(|segment| {
                (
                    segment.start_timestamp() as f64 / 100.0,
                    segment.end_timestamp() as f64 / 100.0,
                    segment.to_string(),
                )
            })
            .collect();

        Ok(SegmentList::from_spans(spans))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(not(feature = "whisper"))]
impl WhisperTranscriber {
    pub fn new(config: WhisperConfig) -> Result<Self> {
        if !config.model_path.exists() {
            return Err(VoxprepError::ModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = model_name_of(&config.model_path);
        Ok(Self { config, model_name })
    }

    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

#[cfg(not(feature = "whisper"))]
impl Transcriber for WhisperTranscriber {
    fn transcribe_file(&self, _path: &Path) -> Result<SegmentList> {
        Err(VoxprepError::Transcription {
            message: concat!(
                "Whisper feature not enabled. This binary was built without speech recognition.\n",
                "To fix: cargo build --release (whisper is enabled by default)\n",
                "If the build fails with cmake errors, install: sudo apt install cmake"
            )
            .to_string(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_uses_auto_language() {
        let config = WhisperConfig::default();
        assert_eq!(config.language, defaults::AUTO_LANGUAGE);
        assert_eq!(config.threads, None);
        assert!(!config.demucs);
    }

    #[test]
    fn new_fails_for_missing_model() {
        let config = WhisperConfig {
            model_path: PathBuf::from("/nonexistent/model.bin"),
            ..WhisperConfig::default()
        };

        match WhisperTranscriber::new(config) {
            Err(VoxprepError::ModelNotFound { path }) => {
                assert_eq!(path, "/nonexistent/model.bin");
            }
            other => panic!("expected ModelNotFound, got {other:?}"),
        }
    }

    #[test]
    fn model_name_is_file_stem() {
        assert_eq!(
            model_name_of(Path::new("/models/ggml-medium.bin")),
            "ggml-medium"
        );
        assert_eq!(model_name_of(Path::new("")), "unknown");
    }

    #[test]
    fn load_input_resamples_to_16khz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..48000 {
            writer.write_sample(0i16).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let samples = load_whisper_input(&path, false).unwrap();
        // 1 second of audio at 16kHz, mono
        assert_eq!(samples.len(), 16000);
    }

    #[cfg(not(feature = "whisper"))]
    #[test]
    fn stub_reports_not_ready_and_fails_transcription() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("ggml-fake.bin");
        std::fs::write(&model, b"fake").unwrap();

        let transcriber = WhisperTranscriber::new(WhisperConfig {
            model_path: model,
            ..WhisperConfig::default()
        })
        .unwrap();
        assert!(!transcriber.is_ready());
        assert!(transcriber.transcribe_file(Path::new("x.wav")).is_err());
    }
}
