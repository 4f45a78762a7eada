use super::*;

#[test]
fn side_sign_and_opposite() {
    assert_eq!(Side::Left.sign(), -1.0);
    assert_eq!(Side::Right.sign(), 1.0);
    assert_eq!(Side::Left.opposite(), Side::Right);
}

#[test]
fn viewport_rejects_degenerate_sizes() {
    assert!(Viewport::new(1280.0, 720.0).is_ok());
    assert!(Viewport::new(0.0, 720.0).is_err());
    assert!(Viewport::new(1280.0, f64::NAN).is_err());
}

#[test]
fn ids_display_and_serialize() {
    assert_eq!(ElementId(7).to_string(), "#7");
    let id = ItemId::new("eau-de-nuit");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"eau-de-nuit\"");
    assert_eq!(id.as_str(), "eau-de-nuit");
}
