use super::*;

fn vp(h: f64) -> Viewport {
    Viewport::new(1000.0, h).unwrap()
}

fn region() -> PinnedRegion {
    // start 1000, distance 3 * 800 = 2400, enter at 1400, leave at 3400
    PinnedRegion::pin(1000.0, vp(800.0), PinConfig::default()).unwrap()
}

#[test]
fn geometry_follows_viewport_heights() {
    let g = region().geometry();
    assert_eq!(g.start, 1000.0);
    assert_eq!(g.distance, 2400.0);
    assert_eq!(g.end, 3400.0);
    assert_eq!(g.enter_at, 1400.0);
    assert_eq!(g.leave_at, 3400.0);
}

#[test]
fn four_edges_fire_in_both_directions() {
    let mut r = region();
    assert!(!r.update(0.0).contains(&ScrollEvent::Enter));
    assert!(r.update(1500.0).contains(&ScrollEvent::Enter));
    assert!(r.is_active());
    assert!(r.update(3500.0).contains(&ScrollEvent::Leave));
    assert!(r.update(3000.0).contains(&ScrollEvent::EnterBack));
    assert!(r.update(1200.0).contains(&ScrollEvent::LeaveBack));
    // same zone again: no edges
    let again = r.update(1100.0);
    assert!(
        again
            .iter()
            .all(|e| matches!(e, ScrollEvent::Progress(_)))
    );
}

fn edges(events: Vec<ScrollEvent>) -> Vec<ScrollEvent> {
    events
        .into_iter()
        .filter(|e| !matches!(e, ScrollEvent::Progress(_) | ScrollEvent::Threshold { .. }))
        .collect()
}

#[test]
fn jumping_across_the_region_reports_both_edges() {
    let mut r = region();
    r.update(0.0);
    assert_eq!(
        edges(r.update(5000.0)),
        vec![ScrollEvent::Enter, ScrollEvent::Leave]
    );
    assert_eq!(
        edges(r.update(0.0)),
        vec![ScrollEvent::EnterBack, ScrollEvent::LeaveBack]
    );
}

#[test]
fn leaving_edges_come_last() {
    let cfg = PinConfig {
        thresholds: vec![0.5],
        ..PinConfig::default()
    };
    let mut r = PinnedRegion::pin(0.0, vp(1000.0), cfg).unwrap();
    r.update(0.0);
    r.update(2000.0);
    let ev = r.update(100.0);
    assert_eq!(ev.last(), Some(&ScrollEvent::LeaveBack));
    assert!(ev.contains(&ScrollEvent::Threshold {
        index: 0,
        direction: ScrollDirection::Up
    }));
}

#[test]
fn progress_is_normalized_and_reported_on_change() {
    let mut r = region();
    assert_eq!(r.progress_at(0.0), 0.0);
    assert_eq!(r.progress_at(2200.0), 0.5);
    assert_eq!(r.progress_at(99_999.0), 1.0);

    let ev = r.update(2200.0);
    assert!(ev.contains(&ScrollEvent::Progress(0.5)));
    let ev = r.update(2200.0);
    assert!(ev.is_empty());
    assert_eq!(r.progress(), 0.5);
}

#[test]
fn thresholds_report_direction() {
    let cfg = PinConfig {
        thresholds: vec![0.25, 0.75],
        ..PinConfig::default()
    };
    let mut r = PinnedRegion::pin(0.0, vp(1000.0), cfg).unwrap();
    r.update(0.0);
    let down = r.update(2000.0);
    assert!(down.contains(&ScrollEvent::Threshold {
        index: 0,
        direction: ScrollDirection::Down
    }));
    let up = r.update(100.0);
    assert!(up.contains(&ScrollEvent::Threshold {
        index: 0,
        direction: ScrollDirection::Up
    }));
    assert!(!up.iter().any(|e| matches!(e, ScrollEvent::Threshold { index: 1, .. })));
}

#[test]
fn pin_state_tracks_scroll() {
    let mut r = region();
    r.update(500.0);
    assert_eq!(r.pin_state(), PinState::Flow);
    assert_eq!(r.region_offset(), 500.0);
    r.update(2000.0);
    assert_eq!(r.pin_state(), PinState::Fixed);
    assert_eq!(r.region_offset(), 0.0);
    r.update(3600.0);
    assert_eq!(r.pin_state(), PinState::Released);
    assert_eq!(r.region_offset(), -200.0);
    assert_eq!(r.spacer_height(), 2400.0);
}

#[test]
fn resize_is_debounced_and_waits_for_settle() {
    let mut r = region();
    r.update(2000.0);
    r.resize(vp(400.0), 1000.0, 10.0);
    assert!(r.has_pending_resize());
    assert_eq!(r.poll(10.1, true), None);
    // a later resize pushes the deadline out
    r.resize(vp(500.0), 1000.0, 10.15);
    assert_eq!(r.poll(10.25, true), None);
    assert_eq!(r.poll(10.5, false), None);
    // still inside the region: only the new progress is reported
    let applied = r.poll(10.5, true).unwrap();
    assert_eq!(edges(applied.clone()), vec![]);
    assert!(matches!(
        applied.as_slice(),
        [ScrollEvent::Progress(p)] if (p - 1000.0 / 1500.0).abs() < 1e-9
    ));
    assert!(!r.has_pending_resize());
    assert_eq!(r.geometry().distance, 1500.0);
    assert!(r.update(2000.0).is_empty());
}

#[test]
fn resize_that_moves_the_region_below_reports_leave_back() {
    let mut r = PinnedRegion::pin(
        1000.0,
        vp(800.0),
        PinConfig {
            thresholds: vec![0.25],
            ..PinConfig::default()
        },
    )
    .unwrap();
    r.update(2000.0);
    assert!(r.is_active());

    r.resize(vp(800.0), 3000.0, 0.0);
    let applied = r.poll(1.0, true).unwrap();
    assert_eq!(
        applied,
        vec![
            ScrollEvent::Threshold {
                index: 0,
                direction: ScrollDirection::Up
            },
            ScrollEvent::Progress(0.0),
            ScrollEvent::LeaveBack,
        ]
    );
    assert!(!r.is_active());
    // the offset is unchanged, so nothing more to report
    assert!(r.update(2000.0).is_empty());
}

#[test]
fn resize_before_any_scroll_reports_nothing() {
    let mut r = region();
    r.resize(vp(500.0), 0.0, 0.0);
    assert_eq!(r.poll(1.0, true), Some(vec![]));
}

#[test]
fn unpin_restores_flow_and_silences_updates() {
    let mut r = region();
    r.update(2000.0);
    r.unpin();
    assert!(!r.is_pinned());
    assert_eq!(r.pin_state(), PinState::Flow);
    assert_eq!(r.spacer_height(), 0.0);
    assert!(r.update(100.0).is_empty());
}

#[test]
fn invalid_config_is_rejected() {
    let bad = PinConfig {
        size_in_viewport_heights: 0.0,
        ..PinConfig::default()
    };
    assert!(PinnedRegion::pin(0.0, vp(800.0), bad).is_err());
    let bad = PinConfig {
        thresholds: vec![1.5],
        ..PinConfig::default()
    };
    assert!(bad.validate().is_err());
}
