//! Optional vocal isolation via the external `demucs` tool.
//!
//! When `--demucs` is enabled, each source file is run through demucs
//! two-stem separation and the isolated vocals are transcribed instead of
//! the original mix. A missing or failing demucs binary is reported as a
//! source-separation error, which the driver treats like any other
//! transcription failure for that file.

use crate::error::{Result, VoxprepError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Model name demucs uses for its default output subdirectory.
const DEMUCS_MODEL: &str = "htdemucs";

fn separation_err(message: impl Into<String>) -> VoxprepError {
    VoxprepError::SourceSeparation {
        message: message.into(),
    }
}

/// Isolated vocals for one source file.
///
/// Owns the demucs working directory; it is removed when the value is
/// dropped, so keep it alive until the vocals file has been consumed.
#[derive(Debug)]
pub struct VocalsTake {
    path: PathBuf,
    work_dir: PathBuf,
}

impl VocalsTake {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for VocalsTake {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.work_dir);
    }
}

/// Arguments for a two-stem (vocals/no_vocals) demucs run.
fn demucs_args(input: &Path, out_dir: &Path) -> Vec<OsString> {
    vec![
        OsString::from("--two-stems=vocals"),
        OsString::from("-o"),
        out_dir.as_os_str().to_os_string(),
        input.as_os_str().to_os_string(),
    ]
}

/// Where demucs puts the vocals stem for a given input file.
fn vocals_path(out_dir: &Path, input: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| separation_err("input file has no valid stem"))?;
    Ok(out_dir.join(DEMUCS_MODEL).join(stem).join("vocals.wav"))
}

/// Run demucs on `input` and return the isolated vocals.
pub fn isolate_vocals(input: &Path) -> Result<VocalsTake> {
    let work_dir = std::env::temp_dir().join(format!(
        "voxprep-demucs-{}-{}",
        std::process::id(),
        input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("input")
    ));
    std::fs::create_dir_all(&work_dir)?;

    let status = Command::new("demucs")
        .args(demucs_args(input, &work_dir))
        .status()
        .map_err(|e| {
            let _ = std::fs::remove_dir_all(&work_dir);
            separation_err(format!("failed to run demucs: {e}"))
        })?;

    if !status.success() {
        let _ = std::fs::remove_dir_all(&work_dir);
        return Err(separation_err(format!("demucs exited with {status}")));
    }

    let path = vocals_path(&work_dir, input)?;
    if !path.exists() {
        let _ = std::fs::remove_dir_all(&work_dir);
        return Err(separation_err(format!(
            "demucs produced no vocals stem at {}",
            path.display()
        )));
    }

    Ok(VocalsTake { path, work_dir })
}
