use super::*;

#[test]
fn parses_with_optional_fields() {
    let item: Item = serde_json::from_str(
        r#"{ "id": "noir", "primary_asset": "noir.png", "title": "Noir" }"#,
    )
    .unwrap();
    assert_eq!(item, Item::new("noir", "Noir", "noir.png"));
    item.validate().unwrap();
}

#[test]
fn empty_fields_are_rejected() {
    assert!(Item::new("", "x", "x.png").validate().is_err());
    assert!(Item::new("a", "x", " ").validate().is_err());
    assert!(
        Item::new("a", "x", "x.png")
            .with_secondary_assets(["ok.png", ""])
            .validate()
            .is_err()
    );
    let mut item = Item::new("a", "x", "x.png");
    item.purchase = Some(PurchaseLink {
        label: "Buy".to_owned(),
        url: String::new(),
    });
    assert!(item.validate().is_err());
}

#[test]
fn duplicate_ids_are_rejected() {
    let items = vec![Item::new("a", "A", "a.png"), Item::new("a", "B", "b.png")];
    let err = validate_items(&items).unwrap_err();
    assert!(err.to_string().contains("duplicate item id 'a'"));
}
