//! Error types for voxprep.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxprepError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Input scanning errors
    #[error("Input directory not found: {path}")]
    InputDirNotFound { path: String },

    // Audio errors
    #[error("Failed to decode audio file {path}: {message}")]
    AudioDecode { path: String, message: String },

    #[error("Resampling failed: {message}")]
    Resample { message: String },

    #[error("Failed to write clip {path}: {message}")]
    ClipWrite { path: String, message: String },

    // Transcription errors
    #[error("Transcription model not found at {path}")]
    ModelNotFound { path: String },

    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("Source separation failed: {message}")]
    SourceSeparation { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoxprepError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = VoxprepError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_audio_decode_display() {
        let error = VoxprepError::AudioDecode {
            path: "a.mp3".to_string(),
            message: "unsupported codec".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to decode audio file a.mp3: unsupported codec"
        );
    }

    #[test]
    fn test_model_not_found_display() {
        let error = VoxprepError::ModelNotFound {
            path: "/models/ggml-medium.bin".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription model not found at /models/ggml-medium.bin"
        );
    }

    #[test]
    fn test_transcription_display() {
        let error = VoxprepError::Transcription {
            message: "inference failed".to_string(),
        };
        assert_eq!(error.to_string(), "Transcription failed: inference failed");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: VoxprepError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: VoxprepError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VoxprepError>();
        assert_sync::<VoxprepError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
