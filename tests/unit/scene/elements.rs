use super::*;

fn items() -> Vec<Item> {
    vec![
        Item::new("a", "A", "a.png").with_secondary_assets(["a1.png", "a2.png"]),
        Item::new("b", "B", "b.png"),
    ]
}

#[test]
fn allocate_hands_out_unique_ids() {
    let items = items();
    let map = ElementMap::allocate(&items);
    let slots = map.resolve(&items).unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].overview, ElementId(1));
    assert_eq!(slots[0].assets, vec![ElementId(4), ElementId(5)]);
    assert_eq!(slots[1].overview, ElementId(6));

    let all = all_elements(&slots);
    let unique: BTreeSet<_> = all.iter().copied().collect();
    assert_eq!(all.len(), unique.len());
}

#[test]
fn insert_rejects_shared_elements() {
    let mut map = ElementMap::new();
    let a = ItemSlots {
        overview: ElementId(1),
        panel: ElementId(2),
        dock: ElementId(3),
        assets: vec![],
    };
    map.insert(ItemId::new("a"), a.clone()).unwrap();
    assert!(map.insert(ItemId::new("a"), a.clone()).is_err());

    let b = ItemSlots {
        overview: ElementId(3),
        ..a.clone()
    };
    assert!(map.insert(ItemId::new("b"), b).is_err());

    let c = ItemSlots {
        overview: ElementId(10),
        panel: ElementId(10),
        dock: ElementId(11),
        assets: vec![],
    };
    assert!(map.insert(ItemId::new("c"), c).is_err());
    assert_eq!(map.len(), 1);
}

#[test]
fn resolve_requires_every_item_and_asset() {
    let items = items();
    let mut map = ElementMap::allocate(&items[..1]);
    assert!(map.resolve(&items).is_err());

    map.insert(
        ItemId::new("b"),
        ItemSlots {
            overview: ElementId(20),
            panel: ElementId(21),
            dock: ElementId(22),
            assets: vec![ElementId(23)],
        },
    )
    .unwrap();
    let err = map.resolve(&items).unwrap_err();
    assert!(err.to_string().contains("1 asset elements for 0"));
}
