//! Audio file decoding via symphonia.
//!
//! Decodes any container/codec symphonia supports (mp3, wav, flac, ogg) to
//! planar f32 channels at the file's native sample rate. Channel layout is
//! preserved so the caller can downmix by averaging.

use crate::error::{Result, VoxprepError};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::conv::FromSample;

fn decode_err(path: &Path, message: impl Into<String>) -> VoxprepError {
    VoxprepError::AudioDecode {
        path: path.display().to_string(),
        message: message.into(),
    }
}

/// Append every channel of a decoded buffer, converting samples to f32.
fn append<T>(
    channels: &mut Vec<Vec<f32>>,
    data: std::borrow::Cow<'_, symphonia::core::audio::AudioBuffer<T>>,
) where
    T: symphonia::core::sample::Sample,
    f32: FromSample<T>,
{
    let count = data.spec().channels.count();
    if channels.len() < count {
        channels.resize(count, Vec::new());
    }
    for (ch, out) in channels.iter_mut().enumerate().take(count) {
        out.extend(data.chan(ch).iter().map(|v| f32::from_sample(*v)));
    }
}

/// Decode an audio file to planar f32 channels plus its native sample rate.
///
/// # Errors
/// Returns [`VoxprepError::AudioDecode`] if the file cannot be opened or
/// probed, has no decodable audio track, or fails mid-decode.
pub fn decode_file(path: &Path) -> Result<(Vec<Vec<f32>>, u32)> {
    let src = std::fs::File::open(path).map_err(|e| decode_err(path, e.to_string()))?;
    let mss = symphonia::core::io::MediaSourceStream::new(Box::new(src), Default::default());

    let hint = symphonia::core::probe::Hint::new();
    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &Default::default(), &Default::default())
        .map_err(|e| decode_err(path, format!("probe failed: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_err(path, "no supported audio tracks found"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &Default::default())
        .map_err(|_| decode_err(path, "unsupported codec"))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| decode_err(path, "could not determine sample rate"))?;

    let mut channels: Vec<Vec<f32>> = Vec::new();

    while let Ok(packet) = format.next_packet() {
        while !format.metadata().is_latest() {
            format.metadata().pop();
        }
        if packet.track_id() != track_id {
            continue;
        }

        match decoder
            .decode(&packet)
            .map_err(|e| decode_err(path, format!("decode failed: {e}")))?
        {
            AudioBufferRef::F32(data) => append(&mut channels, data),
            AudioBufferRef::U8(data) => append(&mut channels, data),
            AudioBufferRef::U16(data) => append(&mut channels, data),
            AudioBufferRef::U24(data) => append(&mut channels, data),
            AudioBufferRef::U32(data) => append(&mut channels, data),
            AudioBufferRef::S8(data) => append(&mut channels, data),
            AudioBufferRef::S16(data) => append(&mut channels, data),
            AudioBufferRef::S24(data) => append(&mut channels, data),
            AudioBufferRef::S32(data) => append(&mut channels, data),
            AudioBufferRef::F64(data) => append(&mut channels, data),
        }
    }

    if channels.is_empty() {
        return Err(decode_err(path, "no audio frames decoded"));
    }

    Ok((channels, sample_rate))
}
