//! Model download and installation.
//!
//! Streams ggml models from HuggingFace into the weights directory,
//! verifying the catalog SHA-1 checksum on the way down.

use crate::error::{Result, VoxprepError};
use crate::models::catalog::get_model;
use crate::models::{model_path, models_dir};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use sha1::{Digest, Sha1};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Download a model into the weights directory, unless already present.
///
/// # Errors
/// Returns an error if the model is not in the catalog, the download fails,
/// the checksum does not match, or the file cannot be written.
pub async fn download_model(
    name: &str,
    override_dir: Option<&Path>,
    progress: bool,
) -> Result<PathBuf> {
    let path = model_path(name, override_dir);
    if path.exists() {
        if progress {
            eprintln!("Model '{}' is already installed at {}", name, path.display());
        }
        return Ok(path);
    }

    let info = get_model(name).ok_or_else(|| {
        VoxprepError::Other(format!(
            "Model '{name}' not found in catalog.\nRun 'voxprep models list' to see available models."
        ))
    })?;

    fs::create_dir_all(models_dir(override_dir))
        .map_err(|e| VoxprepError::Other(format!("Failed to create models directory: {e}")))?;

    if progress {
        eprintln!("Downloading {} ({} MB)...", info.name, info.size_mb);
    }

    let client = reqwest::Client::new();
    let response = client
        .get(info.url())
        .send()
        .await
        .map_err(|e| VoxprepError::Other(format!("Failed to start download: {e}")))?;

    if !response.status().is_success() {
        return Err(VoxprepError::Other(format!(
            "Download failed with status: {}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);

    let bar = if progress {
        let bar = ProgressBar::new(total_size);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Some(bar)
    } else {
        None
    };

    let mut hasher = Sha1::new();
    let mut stream = response.bytes_stream();
    let mut file = fs::File::create(&path)
        .map_err(|e| VoxprepError::Other(format!("Failed to create output file: {e}")))?;

    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| VoxprepError::Other(format!("Failed to read download chunk: {e}")))?;
        file.write_all(&chunk)
            .map_err(|e| VoxprepError::Other(format!("Failed to write to file: {e}")))?;
        hasher.update(&chunk);
        if let Some(ref bar) = bar {
            bar.inc(chunk.len() as u64);
        }
    }

    if let Some(bar) = bar {
        bar.finish_with_message("Downloaded");
    }

    if !info.sha1.is_empty() {
        let calculated = format!("{:x}", hasher.finalize());
        if calculated != info.sha1 {
            if let Err(e) = fs::remove_file(&path) {
                eprintln!("voxprep: failed to remove corrupted download: {e}");
            }
            return Err(VoxprepError::Other(format!(
                "SHA-1 checksum mismatch. Expected: {}, got: {calculated}",
                info.sha1
            )));
        }
        if progress {
            eprintln!("Checksum verified");
        }
    }

    if progress {
        eprintln!("Model installed to: {}", path.display());
    }

    Ok(path)
}

/// List installed model names by scanning the weights directory for
/// `ggml-*.bin` files (catalog or not).
pub fn list_installed_models(override_dir: Option<&Path>) -> Vec<String> {
    let dir = models_dir(override_dir);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name();
            let name = name.to_str()?;
            let model = name.strip_prefix("ggml-")?.strip_suffix(".bin")?;
            entry.path().is_file().then(|| model.to_string())
        })
        .collect();

    names.sort();
    names
}

/// Format one catalog entry for `models list`.
pub fn format_model_info(
    model: &crate::models::catalog::ModelInfo,
    override_dir: Option<&Path>,
) -> String {
    let status = if crate::models::is_model_installed(model.name, override_dir) {
        "[installed]"
    } else {
        "[not installed]"
    };
    format!("{:16} {:5} MB   {}", model.name, model.size_mb, status)
}
