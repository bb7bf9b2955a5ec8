//! Whisper model management: catalog, paths and downloads.

pub mod catalog;
#[cfg(feature = "model-download")]
pub mod download;

use std::path::{Path, PathBuf};

/// Directory where models are stored: the configured weights directory, or
/// `~/.cache/voxprep/models/` by default.
pub fn models_dir(override_dir: Option<&Path>) -> PathBuf {
    match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("voxprep")
            .join("models"),
    }
}

/// Full path for a model file, resolving catalog aliases.
///
/// Always returns a path; the file may or may not exist on disk.
pub fn model_path(name: &str, override_dir: Option<&Path>) -> PathBuf {
    let resolved = catalog::resolve_name(name);
    models_dir(override_dir).join(format!("ggml-{resolved}.bin"))
}

/// Check if a model is installed.
pub fn is_model_installed(name: &str, override_dir: Option<&Path>) -> bool {
    model_path(name, override_dir).exists()
}
