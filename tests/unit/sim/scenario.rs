use super::*;

fn items(n: usize) -> Vec<Item> {
    (0..n)
        .map(|k| {
            Item::new(format!("s{k}"), format!("S{k}"), format!("s{k}.png"))
                .with_secondary_assets(["a.png"])
        })
        .collect()
}

fn scenario() -> Scenario {
    Scenario::new(
        ShowcaseConfig::default(),
        Viewport::new(1200.0, 800.0).unwrap(),
        items(3),
    )
}

#[test]
fn parses_json_with_defaults() {
    let s = Scenario::from_json_str(
        r#"{
            "viewport": { "width": 1000, "height": 600 },
            "items": [
                { "id": "a", "title": "A", "primary_asset": "a.png" },
                { "id": "b", "title": "B", "primary_asset": "b.png" }
            ],
            "script": [
                { "at": 0.5, "input": { "activate": { "index": 1 } } },
                { "at": 2.0, "input": "escape" }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(s.config, ShowcaseConfig::default());
    assert_eq!(s.script.len(), 2);
    assert_eq!(s.script[1].input, Input::Escape);
    assert_eq!(s.end_time(), 5.0);
}

#[test]
fn validation_catches_bad_timing_and_layout() {
    let bad = scenario().at(-1.0, Input::Close);
    assert!(bad.validate().is_err());

    let mut bad = scenario();
    bad.duration = Some(f64::NAN);
    assert!(bad.validate().is_err());

    let mut bad = scenario();
    let vp = bad.viewport;
    bad.layout.insert(ItemId::new("ghost"), ItemLayout::grid(0, 1, vp));
    let err = bad.validate().unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn zero_fps_is_rejected() {
    assert!(run_scenario(&scenario(), 0).is_err());
}

#[test]
fn explicit_duration_wins() {
    let mut s = scenario().at(1.0, Input::Close);
    assert_eq!(s.end_time(), 4.0);
    s.unmount_at = Some(2.0);
    assert_eq!(s.end_time(), 5.0);
    s.duration = Some(0.5);
    assert_eq!(s.end_time(), 0.5);
}

#[test]
fn trace_records_the_round_trip() {
    let s = scenario()
        .at(0.0, Input::Activate { index: 1 })
        .at(2.0, Input::Close);
    let trace = run_scenario(&s, 60).unwrap();
    assert_eq!(
        trace.state_path(),
        vec![
            ViewState::Overview,
            ViewState::EnteringDetail(1),
            ViewState::Detail(1),
            ViewState::ExitingDetail(1),
            ViewState::Overview,
        ]
    );
    assert_eq!(trace.final_state, ViewState::Overview);
    assert!(trace.carousel.is_none());
    assert_eq!(trace.frames, 300);

    let opened = trace
        .first_time(|e| matches!(e, EngineEvent::StateChanged { to: ViewState::Detail(_), .. }))
        .unwrap();
    assert!((1.0..1.2).contains(&opened), "opened at {opened}");
}

#[test]
fn unmount_stops_everything() {
    let mut s = scenario().at(0.0, Input::Activate { index: 0 });
    s.unmount_at = Some(0.5);
    let trace = run_scenario(&s, 30).unwrap();
    assert_eq!(trace.final_state, ViewState::Overview);
    assert!(trace.carousel.is_none());
    assert!(trace.entries.iter().all(|e| e.time < 0.5 + 1e-9));
}

#[test]
fn harness_scales_layout_on_resize() {
    let mut h = Harness::new(&scenario()).unwrap();
    let overview = h.showcase().slots()[0].overview;
    let before = h.layout_mut().bounding_rect(overview).unwrap();
    h.input(Input::Resize {
        viewport: Viewport::new(600.0, 400.0).unwrap(),
        region_top: 0.0,
    });
    let after = h.layout_mut().bounding_rect(overview).unwrap();
    assert!((after.width() - before.width() / 2.0).abs() < 1e-9);
    assert!((after.y0 - before.y0 / 2.0).abs() < 1e-9);
}

#[test]
fn degenerate_resize_in_script_is_rejected() {
    let flat = scenario().at(
        1.0,
        Input::Resize {
            viewport: Viewport {
                width: 0.0,
                height: 800.0,
            },
            region_top: 0.0,
        },
    );
    assert!(flat.validate().is_err());
    assert!(run_scenario(&flat, 30).is_err());

    let adrift = scenario().at(
        1.0,
        Input::Resize {
            viewport: Viewport::new(1000.0, 600.0).unwrap(),
            region_top: f64::NAN,
        },
    );
    assert!(adrift.validate().is_err());

    let err = Scenario::from_json_str(
        r#"{
            "viewport": { "width": 1000, "height": 600 },
            "items": [{ "id": "a", "title": "A", "primary_asset": "a.png" }],
            "script": [
                { "at": 0.5, "input": { "resize": { "viewport": { "width": 0, "height": 600 }, "region_top": 0 } } }
            ]
        }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("resize at 0.5"));
}

#[test]
fn harness_ignores_degenerate_resize_layout() {
    let mut h = Harness::new(&scenario()).unwrap();
    let overview = h.showcase().slots()[0].overview;
    let before = h.layout_mut().bounding_rect(overview).unwrap();
    h.input(Input::Resize {
        viewport: Viewport {
            width: 0.0,
            height: 0.0,
        },
        region_top: 0.0,
    });
    let after = h.layout_mut().bounding_rect(overview).unwrap();
    assert_eq!(before, after);
    assert!(!h.showcase().region().has_pending_resize());
}
