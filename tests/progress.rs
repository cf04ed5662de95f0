//! Progress reporting integration tests.

mod common;

use std::sync::mpsc;
use std::sync::Arc;

use framedump::{ChannelProgress, ExtractionConfig, FrameExtractor, MemorySource};

use common::{RecordingProgress, distinct_frames};

#[test]
fn one_update_per_frame_in_order() {
    let output = tempfile::tempdir().expect("tempdir");
    let recorder = RecordingProgress::new();
    let config = ExtractionConfig::new().with_progress(recorder.clone());

    FrameExtractor::new(config)
        .run(&mut MemorySource::new(distinct_frames(5)), output.path())
        .expect("extract");

    let infos = recorder.snapshot();
    let currents: Vec<u64> = infos.iter().map(|info| info.current).collect();
    assert_eq!(currents, vec![1, 2, 3, 4, 5]);
    for info in &infos {
        assert_eq!(info.total, 5);
    }
}

#[test]
fn accurate_estimate_ends_at_exactly_one_hundred() {
    let output = tempfile::tempdir().expect("tempdir");
    let recorder = RecordingProgress::new();
    let config = ExtractionConfig::new().with_progress(recorder.clone());

    FrameExtractor::new(config)
        .run(&mut MemorySource::new(distinct_frames(7)), output.path())
        .expect("extract");

    let last = recorder.snapshot().pop().expect("at least one update");
    assert_eq!(last.percentage, Some(100.0));
    assert_eq!(last.percentage_label(), "100.00%");
}

#[test]
fn skipped_frames_still_report_progress() {
    let output = tempfile::tempdir().expect("tempdir");
    let recorder = RecordingProgress::new();

    let mut frames = distinct_frames(4);
    frames[3] = frames[2].clone();

    let config = ExtractionConfig::new()
        .with_skip_near_duplicates(true)
        .with_progress(recorder.clone());
    FrameExtractor::new(config)
        .run(&mut MemorySource::new(frames), output.path())
        .expect("extract");

    let infos = recorder.snapshot();
    assert_eq!(infos.len(), 4);
    let last = infos.last().expect("last update");
    assert_eq!(last.current, 4);
    assert_eq!(last.frames_written, 3);
    assert_eq!(last.frames_skipped, 1);
    assert_eq!(last.percentage, Some(100.0));
}

#[test]
fn short_estimate_overshoots() {
    let output = tempfile::tempdir().expect("tempdir");
    let recorder = RecordingProgress::new();
    let config = ExtractionConfig::new().with_progress(recorder.clone());

    let mut source = MemorySource::new(distinct_frames(8)).with_frame_count_estimate(5);
    FrameExtractor::new(config)
        .run(&mut source, output.path())
        .expect("extract");

    let last = recorder.snapshot().pop().expect("last update");
    assert_eq!(last.percentage_label(), "160.00%");
}

#[test]
fn unknown_estimate_reports_counts_only() {
    let output = tempfile::tempdir().expect("tempdir");
    let recorder = RecordingProgress::new();
    let config = ExtractionConfig::new().with_progress(recorder.clone());

    let mut source = MemorySource::new(distinct_frames(2)).with_frame_count_estimate(0);
    let summary = FrameExtractor::new(config)
        .run(&mut source, output.path())
        .expect("extract");

    assert_eq!(summary.frames_written, 2);
    for info in recorder.snapshot() {
        assert_eq!(info.percentage, None);
    }
}

#[test]
fn channel_subscriber_sees_every_update() {
    let output = tempfile::tempdir().expect("tempdir");
    let (sender, receiver) = mpsc::channel();
    let config = ExtractionConfig::new().with_progress(Arc::new(ChannelProgress::new(sender)));

    FrameExtractor::new(config)
        .run(&mut MemorySource::new(distinct_frames(3)), output.path())
        .expect("extract");

    let labels: Vec<String> = receiver.try_iter().map(|info| info.percentage_label()).collect();
    assert_eq!(labels, vec!["33.33%", "66.67%", "100.00%"]);
}

#[test]
fn empty_source_reports_nothing() {
    let output = tempfile::tempdir().expect("tempdir");
    let recorder = RecordingProgress::new();
    let config = ExtractionConfig::new().with_progress(recorder.clone());

    FrameExtractor::new(config)
        .run(&mut MemorySource::new(Vec::new()), output.path())
        .expect("extract");

    assert!(recorder.snapshot().is_empty());
}
