//! Audio I/O: decoding, downmixing, resampling and clip encoding.

pub mod decode;
pub mod resample;
pub mod wav;

pub use decode::decode_file;
pub use resample::resample;
pub use wav::write_clip;

/// Downmix planar channels to mono by averaging each frame across channels.
///
/// Channels are truncated to the shortest channel length; decoders can leave
/// a partial trailing frame on one channel.
pub fn downmix_mono(channels: &[Vec<f32>]) -> Vec<f32> {
    match channels {
        [] => Vec::new(),
        [only] => only.clone(),
        _ => {
            let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
            let scale = 1.0 / channels.len() as f32;
            (0..frames)
                .map(|i| channels.iter().map(|ch| ch[i]).sum::<f32>() * scale)
                .collect()
        }
    }
}
