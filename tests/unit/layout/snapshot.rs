use super::*;
use crate::scene::stage::Stage;
use crate::sim::layout::SimLayout;

fn layout() -> SimLayout {
    let mut l = SimLayout::new(Viewport::new(1200.0, 800.0).unwrap());
    l.insert(ElementId(1), Rect::new(100.0, 300.0, 300.0, 700.0));
    l.insert(ElementId(2), Rect::new(600.0, 0.0, 1200.0, 800.0));
    l
}

#[test]
fn measure_reports_rect_and_side() {
    let l = layout();
    let snap = measure(&l, ElementId(1)).unwrap();
    assert_eq!(snap, LayoutSnapshot::new(100.0, 300.0, 200.0, 400.0));
    assert_eq!(snap.center(), Point::new(200.0, 500.0));
    assert_eq!(snap.side_in(l.viewport()), Side::Left);
    assert_eq!(
        measure(&l, ElementId(2)).unwrap().side_in(l.viewport()),
        Side::Right
    );
    assert_eq!(snap.rect(), Rect::new(100.0, 300.0, 300.0, 700.0));
}

#[test]
fn unmounted_element_fails_measurement() {
    let l = layout();
    let err = measure(&l, ElementId(99)).unwrap_err();
    assert!(err.is_measurement());
}

#[test]
fn zero_size_rect_fails_sized_measurement() {
    let mut l = layout();
    let mut stage = Stage::new();
    stage.set_visible(ElementId(2), false);
    l.commit(&stage);
    assert!(measure(&l, ElementId(2)).is_ok());
    assert!(measure_sized(&l, ElementId(2)).unwrap_err().is_measurement());
}

#[test]
fn fit_scale_and_offset() {
    let a = LayoutSnapshot::new(0.0, 0.0, 100.0, 200.0);
    let b = LayoutSnapshot::new(500.0, 100.0, 300.0, 300.0);
    assert_eq!(a.fit_scale_to(b), 1.5);
    assert_eq!(a.offset_to(b), Vec2::new(600.0, 150.0));
    assert_eq!(a.fit_scale_to(LayoutSnapshot::new(0.0, 0.0, 0.0, 10.0)), 1.0);
}

#[test]
fn deferred_measure_waits_for_next_commit() {
    let mut l = layout();
    let mut stage = Stage::new();
    stage.set_visible(ElementId(2), false);
    l.commit(&stage);

    stage.set_visible(ElementId(2), true);
    let pending = DeferredMeasure::request(&l, ElementId(2));
    assert_eq!(pending.element(), ElementId(2));
    assert!(!pending.is_ready(&l));
    assert_eq!(pending.poll(&l).unwrap(), None);

    l.commit(&stage);
    let snap = pending.poll(&l).unwrap().unwrap();
    assert_eq!(snap.width, 600.0);
    assert!(l.layout_epoch() > pending.requested_epoch());
}

#[test]
fn degenerate_detects_non_finite() {
    assert!(LayoutSnapshot::new(f64::NAN, 0.0, 10.0, 10.0).is_degenerate());
    assert!(!LayoutSnapshot::new(0.0, 0.0, 10.0, 10.0).is_degenerate());
}
