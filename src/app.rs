//! Dataset preparation entry point.
//!
//! Orchestrates the complete batch flow:
//! scan → transcribe → refine → write clips + manifest

use crate::config::Config;
use crate::error::{Result, VoxprepError};
use crate::models::{is_model_installed, model_path};
use crate::scan::scan_root;
use crate::segment::SegmentList;
use crate::stt::transcriber::Transcriber;
use crate::stt::whisper::{WhisperConfig, WhisperTranscriber};
use crate::writer::write_segments;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "model-download")]
use crate::models::download::download_model;

/// Aggregate counters for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files that went through transcription (including failed ones).
    pub processed_files: usize,
    /// Total pending files reported by the scan.
    pub total_files: usize,
    pub clips_written: usize,
    /// Segments rejected by the duration policy.
    pub skipped_segments: usize,
    /// Files whose transcription failed; the run continues past them.
    pub failed_files: usize,
    /// Speakers skipped because their manifest already exists.
    pub skipped_speakers: usize,
}

/// Process every pending speaker under `root` with the given transcriber.
///
/// Speakers whose manifest exists are skipped. Each source file is
/// transcribed, its segments refined and written, and then the source is
/// deleted regardless of how many clips it produced. A failed transcription
/// is reported, counted and treated as zero segments; its source is consumed
/// like any other and the run continues.
pub fn run_prepare(
    root: &Path,
    config: &Config,
    transcriber: &dyn Transcriber,
    quiet: bool,
) -> Result<RunSummary> {
    let report = scan_root(root)?;
    let writer_config = config.writer_config(quiet);

    let mut summary = RunSummary {
        total_files: report.total_files,
        skipped_speakers: report.skipped.len(),
        ..RunSummary::default()
    };

    for speaker in &report.skipped {
        if !quiet {
            eprintln!("Manifest found, skipping {speaker}");
        }
    }

    for speaker in &report.speakers {
        for (file_index, audio_path) in speaker.audio_files.iter().enumerate() {
            // A failed transcription degrades to zero segments
            let segments = match transcriber.transcribe_file(audio_path) {
                Ok(segments) => segments.refine(),
                Err(e) => {
                    eprintln!("voxprep: failed to transcribe {}: {e}", audio_path.display());
                    summary.failed_files += 1;
                    SegmentList::empty()
                }
            };

            let outcome = write_segments(
                audio_path,
                &segments,
                &speaker.path,
                &speaker.name,
                file_index,
                &writer_config,
            )?;
            summary.clips_written += outcome.clips_written;
            summary.skipped_segments += outcome.skipped_short + outcome.skipped_long;

            // The source is consumed whether or not any clip survived
            fs::remove_file(audio_path)?;

            summary.processed_files += 1;
            if !quiet {
                eprintln!(
                    "Processed: {}/{}",
                    summary.processed_files, summary.total_files
                );
            }
        }
    }

    Ok(summary)
}

/// Resolve the model file, downloading it if missing and allowed.
async fn ensure_model(config: &Config, quiet: bool, no_download: bool) -> Result<PathBuf> {
    let override_dir = config.stt.model_dir.as_deref();
    let path = model_path(&config.stt.model, override_dir);

    if is_model_installed(&config.stt.model, override_dir) {
        return Ok(path);
    }

    if no_download {
        return Err(VoxprepError::ModelNotFound {
            path: path.to_string_lossy().to_string(),
        });
    }

    #[cfg(feature = "model-download")]
    {
        if !quiet {
            eprintln!("Downloading model '{}'...", config.stt.model);
        }
        let path = download_model(&config.stt.model, override_dir, !quiet).await?;
        if !quiet {
            eprintln!("Download complete.");
        }
        Ok(path)
    }

    #[cfg(not(feature = "model-download"))]
    {
        let _ = quiet;
        Err(VoxprepError::ModelNotFound {
            path: path.to_string_lossy().to_string(),
        })
    }
}

/// Run the default command: prepare the dataset under `root`.
pub async fn run_batch_command(
    config: Config,
    root: &Path,
    quiet: bool,
    no_download: bool,
) -> Result<RunSummary> {
    let model_path = ensure_model(&config, quiet, no_download).await?;

    if !quiet {
        eprintln!("Loading model '{}'...", config.stt.model);
    }
    let transcriber = WhisperTranscriber::new(WhisperConfig {
        model_path,
        language: config.stt.language.clone(),
        threads: config.stt.threads,
        demucs: config.stt.demucs,
    })?;

    let summary = run_prepare(root, &config, &transcriber, quiet)?;

    if !quiet {
        eprintln!(
            "Done: {} clips from {} files ({} segments skipped, {} files failed)",
            summary.clips_written,
            summary.processed_files,
            summary.skipped_segments,
            summary.failed_files
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::transcriber::MockTranscriber;

    fn write_wav(path: &Path, seconds: f64) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..(16000.0 * seconds) as usize {
            writer.write_sample((i % 500) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn run_prepare_deletes_sources_and_counts() {
        let root = tempfile::tempdir().unwrap();
        let spk = root.path().join("spk");
        fs::create_dir(&spk).unwrap();
        let audio = spk.join("a.wav");
        write_wav(&audio, 5.0);

        let transcriber =
            MockTranscriber::new("mock").with_segments("a.wav", vec![(0.0, 2.0, "hello there.")]);

        let summary = run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();
        assert_eq!(summary.processed_files, 1);
        assert_eq!(summary.total_files, 1);
        assert_eq!(summary.clips_written, 1);
        assert_eq!(summary.failed_files, 0);
        assert!(!audio.exists());
    }

    #[test]
    fn run_prepare_continues_past_failed_file() {
        let root = tempfile::tempdir().unwrap();
        let spk = root.path().join("spk");
        fs::create_dir(&spk).unwrap();
        let bad = spk.join("bad.wav");
        let good = spk.join("good.wav");
        write_wav(&bad, 1.0);
        write_wav(&good, 5.0);

        let transcriber = MockTranscriber::new("mock")
            .with_failure("bad.wav", "decoder exploded")
            .with_segments("good.wav", vec![(0.0, 2.0, "fine.")]);

        let summary = run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();
        assert_eq!(summary.processed_files, 2);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.clips_written, 1);
        // Both sources are consumed, failure or not
        assert!(!bad.exists());
        assert!(!good.exists());
    }

    #[test]
    fn run_prepare_skips_speakers_with_manifest() {
        let root = tempfile::tempdir().unwrap();
        let done = root.path().join("done");
        fs::create_dir(&done).unwrap();
        fs::write(done.join("metadata.csv"), b"x_0_0|y\n").unwrap();
        let audio = done.join("a.wav");
        write_wav(&audio, 3.0);

        let transcriber = MockTranscriber::new("mock");
        let summary = run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();

        assert_eq!(summary.skipped_speakers, 1);
        assert_eq!(summary.processed_files, 0);
        assert_eq!(transcriber.call_count(), 0);
        assert!(audio.exists());
    }

    #[test]
    fn run_prepare_deletes_source_even_with_zero_segments() {
        let root = tempfile::tempdir().unwrap();
        let spk = root.path().join("spk");
        fs::create_dir(&spk).unwrap();
        let audio = spk.join("silent.wav");
        write_wav(&audio, 3.0);

        // Default script: empty segment list
        let transcriber = MockTranscriber::new("mock");
        let summary = run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();

        assert_eq!(summary.processed_files, 1);
        assert_eq!(summary.clips_written, 0);
        assert!(!audio.exists());
    }
}
