//! Segment filtering and clip/manifest writing.
//!
//! Turns refined segments into manifest lines and trimmed WAV clips,
//! enforcing the duration policy. The source file is decoded at most once
//! per call (and not at all when every segment is rejected), downmixed to
//! mono and resampled to the configured target rate.

use crate::audio;
use crate::defaults;
use crate::error::Result;
use crate::manifest::{ClipId, Manifest};
use crate::segment::SegmentList;
use std::fs;
use std::path::Path;

/// Writer configuration, threaded explicitly through the pipeline.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Output sample rate; `None` keeps each file's native rate.
    pub target_sample_rate: Option<u32>,
    /// Trailing padding added to segment end times for the duration check.
    pub end_pad_secs: f64,
    /// Minimum accepted clip duration (inclusive).
    pub min_clip_secs: f64,
    /// Maximum accepted clip duration (inclusive).
    pub max_clip_secs: f64,
    /// Suppress per-segment status lines.
    pub quiet: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: None,
            end_pad_secs: defaults::END_PAD_SECS,
            min_clip_secs: defaults::MIN_CLIP_SECS,
            max_clip_secs: defaults::MAX_CLIP_SECS,
            quiet: false,
        }
    }
}

/// Outcome of the duration policy for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationVerdict {
    Accept,
    TooShort,
    TooLong,
}

/// Judge a padded duration against the policy. Boundaries are inclusive:
/// exactly `min_clip_secs` and exactly `max_clip_secs` are both accepted.
pub fn judge_duration(duration: f64, config: &WriterConfig) -> DurationVerdict {
    if duration < config.min_clip_secs {
        DurationVerdict::TooShort
    } else if duration > config.max_clip_secs {
        DurationVerdict::TooLong
    } else {
        DurationVerdict::Accept
    }
}

/// Counters for one source file's write pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub clips_written: usize,
    pub skipped_short: usize,
    pub skipped_long: usize,
}

/// Decode, downmix and resample the full source waveform.
fn prepare_waveform(audio_path: &Path, config: &WriterConfig) -> Result<(Vec<f32>, u32)> {
    let (channels, native_rate) = audio::decode_file(audio_path)?;
    let mono = audio::downmix_mono(&channels);
    match config.target_sample_rate {
        Some(target) if target != native_rate => {
            let resampled = audio::resample(&mono, native_rate, target)?;
            Ok((resampled, target))
        }
        Some(target) => Ok((mono, target)),
        None => Ok((mono, native_rate)),
    }
}

/// Write manifest lines and clips for every accepted segment of one source
/// file.
///
/// The waveform is prepared lazily on the first accepted segment, so a file
/// whose segments are all rejected (or absent) is never decoded. Clips longer
/// than `max_clip_secs` worth of waveform are sliced to the segment's
/// un-padded `[start, end)` sample range; shorter waveforms are saved whole.
pub fn write_segments(
    audio_path: &Path,
    segments: &SegmentList,
    speaker_dir: &Path,
    speaker: &str,
    file_index: usize,
    config: &WriterConfig,
) -> Result<WriteOutcome> {
    let mut outcome = WriteOutcome::default();
    let manifest = Manifest::for_speaker_dir(speaker_dir);
    let clip_dir = speaker_dir.join(defaults::CLIP_DIR_NAME);
    let mut waveform: Option<(Vec<f32>, u32)> = None;

    for (segment_index, segment) in segments.iter().enumerate() {
        let duration = (segment.end + config.end_pad_secs) - segment.start;
        let text = segment.text();
        let text = text.trim();

        match judge_duration(duration, config) {
            DurationVerdict::TooShort => {
                if !config.quiet {
                    eprintln!("{text} | {duration:.2}s - segment too short, skipping");
                }
                outcome.skipped_short += 1;
                continue;
            }
            DurationVerdict::TooLong => {
                if !config.quiet {
                    eprintln!("{text} | {duration:.2}s - segment too long, skipping");
                }
                outcome.skipped_long += 1;
                continue;
            }
            DurationVerdict::Accept => {
                if !config.quiet {
                    eprintln!("{text} | {duration:.2}s");
                }
            }
        }

        let prepared = match waveform.take() {
            Some(prepared) => prepared,
            None => {
                let prepared = prepare_waveform(audio_path, config)?;
                fs::create_dir_all(&clip_dir)?;
                prepared
            }
        };
        let (samples, rate) = waveform.insert(prepared);

        let id = ClipId::new(speaker, file_index, segment_index);
        manifest.append(&id, text)?;

        let total_secs = samples.len() as f64 / *rate as f64;
        let clip: &[f32] = if total_secs > config.max_clip_secs {
            // Slice on the un-padded segment bounds
            let start = (segment.start * *rate as f64) as usize;
            let end = (segment.end * *rate as f64) as usize;
            let end = end.min(samples.len());
            let start = start.min(end);
            &samples[start..end]
        } else {
            samples
        };

        audio::write_clip(&clip_dir.join(id.wav_filename()), clip, *rate)?;
        outcome.clips_written += 1;
    }

    Ok(outcome)
}
