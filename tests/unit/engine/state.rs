use super::*;

#[test]
fn legal_transitions() {
    use ViewState::*;
    assert!(Overview.can_transition_to(EnteringDetail(2)));
    assert!(EnteringDetail(2).can_transition_to(Detail(2)));
    assert!(!EnteringDetail(2).can_transition_to(Detail(1)));
    assert!(Detail(2).can_transition_to(ExitingDetail(2)));
    assert!(ExitingDetail(2).can_transition_to(Overview));
    assert!(ExitingDetail(2).can_transition_to(EnteringDetail(3)));
    assert!(!ExitingDetail(2).can_transition_to(EnteringDetail(2)));

    assert!(!Overview.can_transition_to(Detail(0)));
    assert!(!Detail(0).can_transition_to(Detail(1)));
    assert!(!Detail(0).can_transition_to(Overview));
}

#[test]
fn active_item_and_flags() {
    assert_eq!(ViewState::Overview.active_item(), None);
    assert_eq!(ViewState::ExitingDetail(4).active_item(), Some(4));
    assert!(ViewState::EnteringDetail(0).is_transitioning());
    assert!(!ViewState::Detail(0).is_transitioning());
    assert_eq!(ViewState::Detail(3).detail_item(), Some(3));
    assert_eq!(ViewState::Detail(3).to_string(), "detail(3)");
}

#[test]
fn plan_docks_over_destination() {
    let vp = Viewport::new(1000.0, 800.0).unwrap();
    let src = LayoutSnapshot::new(700.0, 300.0, 100.0, 100.0);
    let dst = LayoutSnapshot::new(100.0, 100.0, 300.0, 400.0);
    let plan = TransitionPlan::new(1, src, dst, vp);
    assert_eq!(plan.side, Side::Right);
    let docked = plan.docked();
    assert_eq!(docked.translate, crate::foundation::core::Vec2::new(-500.0, -50.0));
    assert_eq!(docked.scale, 3.0);
    assert_eq!(docked.opacity, 1.0);
    assert_eq!(plan.tilt(6.0), 6.0);
    assert_eq!(
        TransitionPlan::with_side(1, src, dst, Side::Left).tilt(6.0),
        -6.0
    );
}

#[test]
fn events_serialize_with_tags() {
    let ev = EngineEvent::StateChanged {
        from: ViewState::Overview,
        to: ViewState::EnteringDetail(1),
    };
    let v = serde_json::to_value(&ev).unwrap();
    assert_eq!(v["event"], "state_changed");
    assert_eq!(v["to"]["state"], "entering_detail");
    assert_eq!(v["to"]["item"], 1);

    let ev = EngineEvent::TransitionRejected {
        request: Request::Enter(0),
        reason: Rejection::InFlight,
    };
    let v = serde_json::to_value(&ev).unwrap();
    assert_eq!(v["reason"]["reason"], "in_flight");
    assert_eq!(Rejection::UnknownItem(7).to_string(), "unknown item 7");
}
