//! WAV clip encoding.
//!
//! Output clips are always mono 16-bit signed PCM; sample rate is whatever
//! the writer was given (native or resampled).

use crate::error::{Result, VoxprepError};
use std::path::Path;

/// Write a mono f32 buffer as a 16-bit signed PCM WAV file.
///
/// Samples are clamped to [-1.0, 1.0] before quantization.
pub fn write_clip(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let clip_err = |message: String| VoxprepError::ClipWrite {
        path: path.display().to_string(),
        message,
    };

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| clip_err(e.to_string()))?;
    for &sample in samples {
        let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(quantized)
            .map_err(|e| clip_err(e.to_string()))?;
    }
    writer.finalize().map_err(|e| clip_err(e.to_string()))?;

    Ok(())
}
