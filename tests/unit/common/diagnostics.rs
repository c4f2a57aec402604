//! Unit tests for diagnostics.rs

use banded_swipe::align::{banded_swipe, DpStat, DpTarget, Frame, SwipeFlags};
use banded_swipe::diagnostics::{counters, diagnostics_enabled, print_summary};
use banded_swipe::post::{score_only_culling, CullingConfig, Target};
use banded_swipe::Scoring;
use std::sync::atomic::Ordering;

#[test]
fn test_diagnostics_flag_is_stable() {
    // the flag is read once per process
    let first = diagnostics_enabled();
    assert_eq!(diagnostics_enabled(), first);
}

#[test]
fn test_counters_track_lane_widths() {
    let c = counters();
    let narrow_before = c.targets_8bit.load(Ordering::Relaxed);
    let wide_before = c.targets_16bit.load(Ordering::Relaxed);
    let reported_before = c.hsps_reported.load(Ordering::Relaxed);

    let query = b"MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ";
    let short = b"MKTAY";
    let targets = [
        // at most 5 columns x 11: fits 8-bit lanes
        DpTarget::full(short, query.len(), 0),
        // the full query against itself does not
        DpTarget::full(query, query.len(), 1),
    ];
    let hsps = banded_swipe(
        query,
        &targets,
        Frame::default(),
        None,
        SwipeFlags::NONE,
        0,
        &Scoring::default(),
        &DpStat::new(),
    );
    assert_eq!(hsps.len(), 2);

    assert!(c.targets_8bit.load(Ordering::Relaxed) >= narrow_before + 1);
    assert!(c.targets_16bit.load(Ordering::Relaxed) >= wide_before + 1);
    assert!(c.hsps_reported.load(Ordering::Relaxed) >= reported_before + 2);
}

#[test]
fn test_counters_track_culling() {
    let c = counters();
    let calls_before = c.culling_calls.load(Ordering::Relaxed);
    let deferred_before = c.culling_deferred.load(Ordering::Relaxed);
    let culled_before = c.targets_culled.load(Ordering::Relaxed);

    let mut hits = vec![Target::new(0, 10), Target::new(1, 30), Target::new(2, 20)];
    score_only_culling(
        &mut hits,
        &CullingConfig {
            max_alignments: 1,
            ..Default::default()
        },
    );
    let mut deferred = vec![Target::new(0, 10)];
    score_only_culling(
        &mut deferred,
        &CullingConfig {
            no_self_hits: true,
            ..Default::default()
        },
    );

    assert!(c.culling_calls.load(Ordering::Relaxed) >= calls_before + 2);
    assert!(c.culling_deferred.load(Ordering::Relaxed) >= deferred_before + 1);
    assert!(c.targets_culled.load(Ordering::Relaxed) >= culled_before + 2);
}

#[test]
fn test_print_summary() {
    let stat = DpStat::new();
    // no output unless enabled, and never a panic
    print_summary(&stat);
    counters().print_summary(&stat);
}
