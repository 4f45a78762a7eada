use super::*;
use crate::sim::scenario::{Harness, Scenario};

const FPS: u32 = 60;

fn items(n: usize) -> Vec<Item> {
    (0..n)
        .map(|k| {
            Item::new(format!("scent-{k}"), format!("Scent {k}"), format!("scent-{k}.png"))
                .with_secondary_assets([format!("scent-{k}-a.png"), format!("scent-{k}-b.png")])
        })
        .collect()
}

fn viewport() -> Viewport {
    Viewport::new(1200.0, 800.0).unwrap()
}

fn harness(config: ShowcaseConfig) -> Harness {
    Harness::new(&Scenario::new(config, viewport(), items(4))).unwrap()
}

fn settle(h: &mut Harness) {
    h.run_for(1.5, FPS);
}

#[test]
fn sections_split_progress_evenly() {
    assert_eq!(section_for(0.0, 4), 0);
    assert_eq!(section_for(0.24, 4), 0);
    assert_eq!(section_for(0.25, 4), 1);
    assert_eq!(section_for(0.999, 4), 3);
    assert_eq!(section_for(1.0, 4), 3);
    assert_eq!(section_for(-2.0, 4), 0);
    assert_eq!(section_for(0.5, 0), 0);
}

#[test]
fn activation_opens_the_item() {
    let mut h = harness(ShowcaseConfig::hybrid());
    let events = h.input(Input::Activate { index: 2 });
    assert_eq!(
        events,
        vec![EngineEvent::StateChanged {
            from: ViewState::Overview,
            to: ViewState::EnteringDetail(2),
        }]
    );
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Detail(2));
    assert!(h.showcase().carousel_state().is_some());

    h.input(Input::Escape);
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Overview);
}

#[test]
fn single_reveal_follows_the_region_edges() {
    let config = ShowcaseConfig {
        reveal_index: 1,
        ..ShowcaseConfig::single_reveal()
    };
    let mut h = harness(config);

    let events = h.input(Input::Scroll(500.0));
    assert!(events.contains(&EngineEvent::Scroll {
        scroll: ScrollEvent::Enter
    }));
    assert_eq!(h.showcase().state(), ViewState::EnteringDetail(1));
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Detail(1));

    let events = h.input(Input::Scroll(100.0));
    assert_eq!(
        events.last(),
        Some(&EngineEvent::StateChanged {
            from: ViewState::Detail(1),
            to: ViewState::ExitingDetail(1),
        })
    );
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Overview);
}

#[test]
fn pinned_sections_wait_for_the_lock_then_advance() {
    let mut h = harness(ShowcaseConfig::pinned_sections());

    h.input(Input::Scroll(500.0));
    assert_eq!(h.showcase().state(), ViewState::EnteringDetail(0));

    // 1300 / 2400 lands in the third section while the entry is still flying.
    h.input(Input::Scroll(1300.0));
    assert_eq!(h.showcase().pending_intent(), Some(Intent::Show(2)));
    assert_eq!(h.showcase().state(), ViewState::EnteringDetail(0));

    settle(&mut h);
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Detail(2));
    assert_eq!(h.showcase().pending_intent(), None);

    h.input(Input::Scroll(2600.0));
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Overview);
}

#[test]
fn hybrid_thresholds_step_to_neighbours() {
    let mut h = harness(ShowcaseConfig::hybrid());
    assert_eq!(h.showcase().region().config().thresholds, vec![0.25, 0.5, 0.75]);

    h.input(Input::Scroll(100.0));
    h.input(Input::Activate { index: 1 });
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Detail(1));

    // Crossing the first mark on the way in steps forward.
    h.input(Input::Scroll(700.0));
    assert_eq!(h.showcase().state(), ViewState::ExitingDetail(1));
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Detail(2));

    // Leaving back closes even though the same scroll crossed a mark upwards.
    h.input(Input::Scroll(100.0));
    assert_eq!(h.showcase().state(), ViewState::ExitingDetail(2));
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Overview);
}

#[test]
fn hybrid_ignores_threshold_without_an_open_item() {
    let mut h = harness(ShowcaseConfig::hybrid());
    h.input(Input::Scroll(100.0));
    h.input(Input::Scroll(700.0));
    assert_eq!(h.showcase().state(), ViewState::Overview);
    assert_eq!(h.showcase().pending_intent(), None);
}

#[test]
fn navigate_resets_and_unpins() {
    let mut h = harness(ShowcaseConfig::hybrid());
    h.input(Input::Activate { index: 1 });
    h.run_for(0.3, FPS);

    h.input(Input::Navigate);
    assert_eq!(h.showcase().state(), ViewState::Overview);
    assert!(!h.showcase().region().is_pinned());
    assert!(h.showcase().carousel_state().is_none());
    let overview = h.showcase().slots()[1].overview;
    assert_eq!(h.stage().props(overview).opacity, 1.0);

    assert!(h.input(Input::Scroll(900.0)).is_empty());
}

#[test]
fn unmounted_showcase_is_silent() {
    let mut h = harness(ShowcaseConfig::hybrid());
    h.input(Input::Activate { index: 0 });
    h.unmount();
    assert!(!h.showcase().is_mounted());
    assert!(h.input(Input::Activate { index: 1 }).is_empty());
    assert!(h.step(1.0 / 60.0).is_empty());
    assert!(h.input(Input::Scroll(500.0)).is_empty());
}

#[test]
fn resize_waits_for_the_flight() {
    let mut h = harness(ShowcaseConfig::hybrid());
    h.input(Input::Activate { index: 0 });
    h.run_for(0.1, FPS);
    h.input(Input::Resize {
        viewport: Viewport::new(1000.0, 500.0).unwrap(),
        region_top: 0.0,
    });
    h.run_for(0.5, FPS);
    assert!(h.showcase().region().has_pending_resize());
    h.run_for(1.0, FPS);
    assert!(!h.showcase().region().has_pending_resize());
    assert_eq!(h.showcase().region().geometry().distance, 1500.0);
}

#[test]
fn mount_rejects_bad_input() {
    let mut stage = Stage::new();
    let cfg = ShowcaseConfig::default();

    let err = Showcase::mount(items(2), &ElementMap::new(), cfg.clone(), viewport(), 0.0, &mut stage)
        .unwrap_err();
    assert!(err.to_string().contains("scent-0"));

    let mut twins = items(2);
    twins[1].id = twins[0].id.clone();
    let map = ElementMap::allocate(&items(2));
    assert!(Showcase::mount(twins, &map, cfg, viewport(), 0.0, &mut stage).is_err());

    let single = ShowcaseConfig {
        reveal_index: 5,
        ..ShowcaseConfig::single_reveal()
    };
    assert!(Showcase::mount(items(2), &map, single, viewport(), 0.0, &mut stage).is_err());
}

#[test]
fn resize_that_lifts_the_region_above_closes_detail() {
    let config = ShowcaseConfig {
        reveal_index: 1,
        ..ShowcaseConfig::single_reveal()
    };
    let mut h = harness(config);
    h.input(Input::Scroll(500.0));
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Detail(1));

    // Same viewport, region moved down: offset 500 now sits before the pin.
    h.input(Input::Resize {
        viewport: viewport(),
        region_top: 1000.0,
    });
    let mut events = Vec::new();
    for _ in 0..30 {
        events.extend(h.step(1.0 / f64::from(FPS)));
    }
    assert!(events.contains(&EngineEvent::Scroll {
        scroll: ScrollEvent::LeaveBack
    }));
    assert!(events.contains(&EngineEvent::StateChanged {
        from: ViewState::Detail(1),
        to: ViewState::ExitingDetail(1),
    }));
    assert!(!h.showcase().region().is_active());

    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Overview);
    assert!(h.input(Input::Scroll(100.0)).is_empty());
    assert_eq!(h.showcase().state(), ViewState::Overview);
}

#[test]
fn hybrid_threshold_during_close_does_not_reopen() {
    let mut h = harness(ShowcaseConfig::hybrid());
    h.input(Input::Scroll(100.0));
    h.input(Input::Activate { index: 1 });
    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Detail(1));

    h.input(Input::Close);
    assert_eq!(h.showcase().state(), ViewState::ExitingDetail(1));
    let events = h.input(Input::Scroll(700.0));
    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::Scroll {
            scroll: ScrollEvent::Threshold { .. }
        }
    )));
    assert_eq!(h.showcase().pending_intent(), None);

    settle(&mut h);
    assert_eq!(h.showcase().state(), ViewState::Overview);
}
