use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::core::{ElementId, ItemId},
    foundation::error::{VitrineError, VitrineResult},
    presentation::item::Item,
};

/// Elements rendered for one item.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ItemSlots {
    /// Overview card image; the element that flies.
    pub overview: ElementId,
    /// Detail panel (backdrop and copy). Hidden outside detail.
    pub panel: ElementId,
    /// Placeholder inside the panel the overview image docks onto.
    pub dock: ElementId,
    /// One element per secondary asset.
    #[serde(default)]
    pub assets: Vec<ElementId>,
}

impl ItemSlots {
    /// Every element of the item.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        [self.overview, self.panel, self.dock]
            .into_iter()
            .chain(self.assets.iter().copied())
    }
}

/// Item id to element handles, supplied by the presentation layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ElementMap {
    slots: BTreeMap<ItemId, ItemSlots>,
}

impl ElementMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out sequential element ids for `items`, starting at 1.
    pub fn allocate<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut next = 1u32;
        let mut take = || {
            let id = ElementId(next);
            next += 1;
            id
        };
        let mut map = Self::new();
        for item in items {
            let slots = ItemSlots {
                overview: take(),
                panel: take(),
                dock: take(),
                assets: item.secondary_assets.iter().map(|_| take()).collect(),
            };
            map.slots.insert(item.id.clone(), slots);
        }
        map
    }

    /// Register the slots of `id`. Element ids must be unique across the map.
    pub fn insert(&mut self, id: ItemId, slots: ItemSlots) -> VitrineResult<()> {
        if self.slots.contains_key(&id) {
            return Err(VitrineError::validation(format!(
                "item '{id}' already has elements"
            )));
        }
        let used: BTreeSet<ElementId> = self.slots.values().flat_map(ItemSlots::elements).collect();
        let mut own = BTreeSet::new();
        for el in slots.elements() {
            if used.contains(&el) || !own.insert(el) {
                return Err(VitrineError::validation(format!(
                    "element {el} of item '{id}' is already in use"
                )));
            }
        }
        self.slots.insert(id, slots);
        Ok(())
    }

    /// Slots of `id`.
    pub fn get(&self, id: &ItemId) -> Option<&ItemSlots> {
        self.slots.get(id)
    }

    /// Number of mapped items.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no item is mapped.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in `items` order. Every item must be mapped with one asset
    /// element per secondary asset.
    pub fn resolve(&self, items: &[Item]) -> VitrineResult<Vec<ItemSlots>> {
        items
            .iter()
            .map(|item| {
                let slots = self.get(&item.id).ok_or_else(|| {
                    VitrineError::validation(format!("item '{}' has no elements", item.id))
                })?;
                if slots.assets.len() != item.secondary_assets.len() {
                    return Err(VitrineError::validation(format!(
                        "item '{}' maps {} asset elements for {} secondary assets",
                        item.id,
                        slots.assets.len(),
                        item.secondary_assets.len()
                    )));
                }
                Ok(slots.clone())
            })
            .collect()
    }
}

/// Every element of every item.
pub(crate) fn all_elements(slots: &[ItemSlots]) -> Vec<ElementId> {
    slots.iter().flat_map(ItemSlots::elements).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/elements.rs"]
mod tests;
