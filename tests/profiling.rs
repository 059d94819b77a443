use misi_hijau::systems::profiling::{StageId, StageTimings};
use std::time::Duration;
use strum::IntoEnumIterator;

macro_rules! assert_close {
    ($actual:expr, $expected:expr, $concern:expr) => {
        let tolerance = Duration::from_micros(500);
        let diff = $actual.abs_diff($expected);
        assert!(
            diff < tolerance,
            "Expected {expected:?} ± {tolerance:.0?}, got {actual:?}, off by {diff:?} ({concern})",
            concern = $concern,
            expected = $expected,
            actual = $actual,
            tolerance = tolerance,
            diff = diff
        );
    };
}

#[test]
fn test_timing_statistics() {
    let timings = StageTimings::default();

    // 10ms average, 2ms std dev (population)
    timings.add_timing(StageId::Update, Duration::from_millis(10));
    timings.add_timing(StageId::Update, Duration::from_millis(12));
    timings.add_timing(StageId::Update, Duration::from_millis(8));

    timings.add_timing(StageId::Draw, Duration::from_millis(3));
    timings.add_timing(StageId::Draw, Duration::from_millis(2));
    timings.add_timing(StageId::Draw, Duration::from_millis(1));

    let stats = timings.get_stats();
    let (avg, std_dev) = stats.get(&StageId::Update).unwrap();
    assert_close!(*avg, Duration::from_millis(10), "Update average timing");
    assert_close!(*std_dev, Duration::from_micros(1633), "Update standard deviation timing");

    let (avg, _) = stats.get(&StageId::Draw).unwrap();
    assert_close!(*avg, Duration::from_millis(2), "Draw average timing");
}

#[test]
fn test_default_zero_timing_for_unused_stages() {
    let timings = StageTimings::default();
    timings.add_timing(StageId::Update, Duration::from_millis(5));

    let stats = timings.get_stats();
    assert_eq!(stats.len(), StageId::iter().count(), "All StageId variants should be in stats");

    let (avg, std_dev) = stats.get(&StageId::Update).unwrap();
    assert_close!(*avg, Duration::from_millis(5), "Stage with data should have correct timing");
    assert_close!(*std_dev, Duration::ZERO, "Single measurement should have zero std dev");

    for id in StageId::iter().filter(|id| *id != StageId::Update) {
        let (avg, std_dev) = stats.get(&id).unwrap();
        assert_eq!(*avg, Duration::ZERO, "Unused stage {id:?} should have zero avg timing");
        assert_eq!(*std_dev, Duration::ZERO, "Unused stage {id:?} should have zero std dev");
    }
}

#[test]
fn test_window_keeps_recent_samples() {
    let timings = StageTimings::default();

    for _ in 0..100 {
        timings.add_timing(StageId::Services, Duration::from_millis(50));
    }
    for _ in 0..30 {
        timings.add_timing(StageId::Services, Duration::from_millis(1));
    }

    let stats = timings.get_stats();
    let (avg, _) = stats.get(&StageId::Services).unwrap();
    assert_close!(*avg, Duration::from_millis(1), "Old samples should fall out of the window");
}

#[test]
fn test_slowest_stages_exclude_total() {
    let timings = StageTimings::default();
    timings.add_timing(StageId::Total, Duration::from_millis(30));
    timings.add_timing(StageId::Draw, Duration::from_millis(9));
    timings.add_timing(StageId::Update, Duration::from_millis(4));
    timings.add_timing(StageId::Lifecycle, Duration::from_millis(1));

    let slowest: Vec<StageId> = timings.get_slowest_stages(2).into_iter().map(|(id, _)| id).collect();
    assert_eq!(slowest, vec![StageId::Draw, StageId::Update]);
}

#[test]
fn test_measure_records_under_stage() {
    let timings = StageTimings::default();
    let value = timings.measure(StageId::Lifecycle, || 42);

    assert_eq!(value, 42);
    let stats = timings.get_stats();
    let (avg, _) = stats.get(&StageId::Lifecycle).unwrap();
    assert!(*avg < Duration::from_millis(50));
}

#[test]
fn test_timing_display_lines() {
    let timings = StageTimings::default();
    assert_eq!(timings.format_timing_display()[0].split(':').next().map(str::trim), Some("-- FPS"));

    for _ in 0..5 {
        timings.add_timing(StageId::Total, Duration::from_millis(20));
        timings.add_timing(StageId::Update, Duration::from_millis(12));
    }

    let lines = timings.format_timing_display();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("50 FPS"), "unexpected first line {:?}", lines[0]);
    assert!(lines[1].starts_with("update"), "unexpected second line {:?}", lines[1]);
}
