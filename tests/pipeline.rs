//! End-to-end pipeline tests driving `run_prepare` with a scripted
//! transcriber over real directory trees and real WAV files.

use std::fs;
use std::path::{Path, PathBuf};
use voxprep::config::Config;
use voxprep::run_prepare;
use voxprep::stt::transcriber::MockTranscriber;

fn write_wav(path: &Path, sample_rate: u32, seconds: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..(sample_rate as f64 * seconds) as usize {
        writer.write_sample((i % 800) as i16 - 400).unwrap();
    }
    writer.finalize().unwrap();
}

fn speaker_dir(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir(&dir).unwrap();
    dir
}

fn read_manifest(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("metadata.csv"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn full_run_produces_manifest_and_clips() {
    let root = tempfile::tempdir().unwrap();
    let alice = speaker_dir(root.path(), "alice");
    write_wav(&alice.join("session1.wav"), 16000, 8.0);
    write_wav(&alice.join("session2.wav"), 16000, 6.0);

    let transcriber = MockTranscriber::new("mock")
        .with_segments(
            "session1.wav",
            vec![(0.0, 2.0, "first take."), (3.0, 5.5, "second take.")],
        )
        .with_segments("session2.wav", vec![(1.0, 3.0, "another day.")]);

    let summary = run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();
    assert_eq!(summary.processed_files, 2);
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.clips_written, 3);
    assert_eq!(summary.failed_files, 0);

    let lines = read_manifest(&alice);
    assert_eq!(
        lines,
        vec!["alice_0_0|first take.", "alice_0_1|second take.", "alice_1_0|another day."]
    );

    // Every manifest line has a matching clip, every clip a matching line
    let wavs = alice.join("wavs");
    for line in &lines {
        let id = line.split('|').next().unwrap();
        assert!(wavs.join(format!("{id}.wav")).exists(), "missing clip {id}");
    }
    let clip_count = fs::read_dir(&wavs).unwrap().count();
    assert_eq!(clip_count, lines.len());

    // Sources are consumed
    assert!(!alice.join("session1.wav").exists());
    assert!(!alice.join("session2.wav").exists());
}

#[test]
fn rerun_after_completion_is_a_no_op() {
    let root = tempfile::tempdir().unwrap();
    let spk = speaker_dir(root.path(), "spk");
    write_wav(&spk.join("a.wav"), 16000, 5.0);

    let transcriber =
        MockTranscriber::new("mock").with_segments("a.wav", vec![(0.0, 2.0, "hello.")]);
    run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();
    assert_eq!(transcriber.call_count(), 1);

    let manifest_before = fs::read_to_string(spk.join("metadata.csv")).unwrap();

    // Second run: the manifest marks the speaker as done
    let transcriber2 = MockTranscriber::new("mock");
    let summary = run_prepare(root.path(), &Config::default(), &transcriber2, true).unwrap();
    assert_eq!(summary.skipped_speakers, 1);
    assert_eq!(summary.processed_files, 0);
    assert_eq!(summary.total_files, 0);
    assert_eq!(transcriber2.call_count(), 0);
    assert_eq!(
        fs::read_to_string(spk.join("metadata.csv")).unwrap(),
        manifest_before
    );
}

#[test]
fn multiple_speakers_are_processed_in_sorted_order() {
    let root = tempfile::tempdir().unwrap();
    let zoe = speaker_dir(root.path(), "zoe");
    let amy = speaker_dir(root.path(), "amy");
    write_wav(&zoe.join("z.wav"), 16000, 4.0);
    write_wav(&amy.join("a.wav"), 16000, 4.0);

    let transcriber = MockTranscriber::new("mock")
        .with_segments("z.wav", vec![(0.0, 1.5, "zoe speaks.")])
        .with_segments("a.wav", vec![(0.0, 1.5, "amy speaks.")]);

    let summary = run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();
    assert_eq!(summary.clips_written, 2);

    let calls = transcriber.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].ends_with("amy/a.wav"));
    assert!(calls[1].ends_with("zoe/z.wav"));

    assert_eq!(read_manifest(&amy), vec!["amy_0_0|amy speaks."]);
    assert_eq!(read_manifest(&zoe), vec!["zoe_0_0|zoe speaks."]);
}

#[test]
fn failed_file_is_consumed_and_run_continues() {
    let root = tempfile::tempdir().unwrap();
    let spk = speaker_dir(root.path(), "spk");
    write_wav(&spk.join("bad.wav"), 16000, 3.0);
    write_wav(&spk.join("good.wav"), 16000, 5.0);

    let transcriber = MockTranscriber::new("mock")
        .with_failure("bad.wav", "inference failed")
        .with_segments("good.wav", vec![(0.0, 2.0, "survives.")]);

    let summary = run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();
    assert_eq!(summary.processed_files, 2);
    assert_eq!(summary.failed_files, 1);
    assert_eq!(summary.clips_written, 1);

    // The failed file produced no manifest line but was still consumed
    assert!(!spk.join("bad.wav").exists());
    assert!(!spk.join("good.wav").exists());
    assert_eq!(read_manifest(&spk), vec!["spk_1_0|survives."]);
}

#[test]
fn duration_policy_filters_segments() {
    let root = tempfile::tempdir().unwrap();
    let spk = speaker_dir(root.path(), "spk");
    write_wav(&spk.join("a.wav"), 16000, 20.0);

    // Padded durations: 0.1+0.3 short, 3.0+0.3 accept, the last one is
    // clamped to 10.0 and its padded duration still exceeds the cap
    let transcriber = MockTranscriber::new("mock").with_segments(
        "a.wav",
        vec![
            (0.0, 0.1, "um"),
            (1.0, 4.0, "a keeper."),
            (4.0, 19.0, "far too long to be a clip."),
        ],
    );

    let summary = run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();
    assert_eq!(summary.clips_written, 1);
    assert_eq!(summary.skipped_segments, 2);

    let lines = read_manifest(&spk);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("spk_0_1|"));
}

#[test]
fn zero_segment_file_still_consumes_source() {
    let root = tempfile::tempdir().unwrap();
    let spk = speaker_dir(root.path(), "spk");
    write_wav(&spk.join("silence.wav"), 16000, 3.0);

    let transcriber = MockTranscriber::new("mock");
    let summary = run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();

    assert_eq!(summary.processed_files, 1);
    assert_eq!(summary.clips_written, 0);
    assert!(!spk.join("silence.wav").exists());
    assert!(!spk.join("metadata.csv").exists());
    assert!(!spk.join("wavs").exists());
}

#[test]
fn resample_option_controls_clip_rate() {
    let root = tempfile::tempdir().unwrap();
    let spk = speaker_dir(root.path(), "spk");
    write_wav(&spk.join("a.wav"), 44100, 6.0);

    let mut config = Config::default();
    config.dataset.target_sample_rate = Some(22050);

    let transcriber =
        MockTranscriber::new("mock").with_segments("a.wav", vec![(0.0, 2.0, "resampled.")]);
    run_prepare(root.path(), &config, &transcriber, true).unwrap();

    let clip = spk.join("wavs").join("spk_0_0.wav");
    let reader = hound::WavReader::open(&clip).unwrap();
    assert_eq!(reader.spec().sample_rate, 22050);
    assert_eq!(reader.spec().channels, 1);
}

#[test]
fn refinement_splits_on_sentence_marks() {
    let root = tempfile::tempdir().unwrap();
    let spk = speaker_dir(root.path(), "spk");
    write_wav(&spk.join("a.wav"), 16000, 12.0);

    // One raw segment carrying two sentences of roughly equal length;
    // refinement splits it into two clips
    let transcriber = MockTranscriber::new("mock").with_segments(
        "a.wav",
        vec![(0.0, 8.0, "the first sentence here. the second sentence too.")],
    );

    let summary = run_prepare(root.path(), &Config::default(), &transcriber, true).unwrap();
    assert_eq!(summary.clips_written, 2);

    let lines = read_manifest(&spk);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("|the first sentence here."));
    assert!(lines[1].ends_with("|the second sentence too."));
}
