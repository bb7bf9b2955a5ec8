//! Batch audio resampling using the rubato FFT-based resampler.

use crate::error::{Result, VoxprepError};
use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{Fft, FixedSync, Resampler};

/// Chunk size for FFT-based resampling.
const CHUNK_SIZE: usize = 1024;

/// Number of sub-chunks for FFT processing (higher = better quality, more CPU).
const SUB_CHUNKS: usize = 2;

fn resample_err(message: impl Into<String>) -> VoxprepError {
    VoxprepError::Resample {
        message: message.into(),
    }
}

/// Feed one fixed-size input chunk and collect whatever the resampler emits.
fn push_chunk(
    resampler: &mut Fft<f32>,
    input_chunk: &[f32],
    output_buffer: &mut [f32],
    output: &mut Vec<f32>,
) -> Result<()> {
    let output_frames = output_buffer.len();
    let input_adapter = InterleavedSlice::new(input_chunk, 1, CHUNK_SIZE)
        .map_err(|e| resample_err(format!("input adapter: {e}")))?;
    let mut output_adapter = InterleavedSlice::new_mut(output_buffer, 1, output_frames)
        .map_err(|e| resample_err(format!("output adapter: {e}")))?;

    let (_, frames_written) = resampler
        .process_into_buffer(&input_adapter, &mut output_adapter, None)
        .map_err(|e| resample_err(e.to_string()))?;
    output.extend_from_slice(&output_buffer[..frames_written]);
    Ok(())
}

/// Resample a mono buffer from one sample rate to another.
///
/// Processes the entire buffer at once; suited to offline dataset work, not
/// streaming. The resampler's internal delay is drained and compensated, so
/// the output holds exactly `len * to_rate / from_rate` frames aligned with
/// the input. Returns the input unchanged when the rates already match.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        SUB_CHUNKS,
        1, // mono
        FixedSync::Input,
    )
    .map_err(|e| resample_err(format!("failed to create resampler: {e}")))?;

    let delay = resampler.output_delay();
    let output_frames_max = resampler.output_frames_max();
    let mut output_buffer = vec![0.0f32; output_frames_max];

    let expected_len = (samples.len() as f64 * to_rate as f64 / from_rate as f64) as usize;
    let mut output = Vec::with_capacity(expected_len + delay + CHUNK_SIZE);

    let mut pos = 0;
    while pos < samples.len() {
        let end = (pos + CHUNK_SIZE).min(samples.len());
        let chunk = &samples[pos..end];

        // Zero-pad the final partial chunk to the fixed input size
        let input_chunk: Vec<f32> = if chunk.len() < CHUNK_SIZE {
            let mut padded = chunk.to_vec();
            padded.resize(CHUNK_SIZE, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        push_chunk(&mut resampler, &input_chunk, &mut output_buffer, &mut output)?;
        pos += CHUNK_SIZE;
    }

    // Drain: the resampler sits on `delay` frames of the signal, so keep
    // feeding silence until the tail has been flushed out
    let silence = vec![0.0f32; CHUNK_SIZE];
    while output.len() < expected_len + delay {
        push_chunk(&mut resampler, &silence, &mut output_buffer, &mut output)?;
    }

    // Compensate the delay, then cut the padding tail
    output.drain(..delay);
    output.truncate(expected_len);

    Ok(output)
}
