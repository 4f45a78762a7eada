use super::*;

fn vp() -> Viewport {
    Viewport::new(1000.0, 800.0).unwrap()
}

#[test]
fn hidden_elements_measure_zero_until_commit() {
    let mut layout = SimLayout::new(vp());
    let el = ElementId(4);
    layout.insert(el, Rect::new(10.0, 20.0, 110.0, 220.0));

    let mut stage = Stage::new();
    stage.set_visible(el, false);
    layout.commit(&stage);
    assert_eq!(layout.bounding_rect(el).unwrap().width(), 0.0);

    stage.set_visible(el, true);
    // not picked up before the next commit
    assert_eq!(layout.bounding_rect(el).unwrap().width(), 0.0);
    layout.commit(&stage);
    assert_eq!(layout.bounding_rect(el).unwrap().width(), 100.0);
    assert_eq!(layout.layout_epoch(), 2);
}

#[test]
fn removed_elements_are_not_live() {
    let mut layout = SimLayout::new(vp());
    layout.insert(ElementId(1), Rect::new(0.0, 0.0, 1.0, 1.0));
    assert!(layout.is_live(ElementId(1)));
    layout.remove(ElementId(1));
    assert!(!layout.is_live(ElementId(1)));
    assert!(layout.bounding_rect(ElementId(1)).is_none());
}

#[test]
fn scale_resizes_every_box() {
    let mut layout = SimLayout::new(vp());
    layout.insert(ElementId(1), Rect::new(10.0, 20.0, 110.0, 220.0));
    layout.scale(0.5, 2.0);
    assert_eq!(
        layout.bounding_rect(ElementId(1)),
        Some(Rect::new(5.0, 40.0, 55.0, 440.0))
    );
}
