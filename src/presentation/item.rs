use std::collections::BTreeSet;

use crate::foundation::{
    core::ItemId,
    error::{VitrineError, VitrineResult},
};

/// Call-to-action attached to an item.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PurchaseLink {
    /// Button label.
    pub label: String,
    /// Destination URL.
    pub url: String,
}

/// One showcased product.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    /// Stable identifier.
    pub id: ItemId,
    /// Image shown in the overview and flown into the detail view.
    pub primary_asset: String,
    /// Images cycled by the detail carousel.
    #[serde(default)]
    pub secondary_assets: Vec<String>,
    /// Display name.
    pub title: String,
    /// Long-form copy.
    #[serde(default)]
    pub description: String,
    /// Optional call-to-action.
    #[serde(default)]
    pub purchase: Option<PurchaseLink>,
}

impl Item {
    /// Minimal item with no secondary assets.
    pub fn new(id: impl Into<String>, title: impl Into<String>, primary_asset: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            primary_asset: primary_asset.into(),
            secondary_assets: Vec::new(),
            title: title.into(),
            description: String::new(),
            purchase: None,
        }
    }

    /// Replace the secondary assets.
    pub fn with_secondary_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secondary_assets = assets.into_iter().map(Into::into).collect();
        self
    }

    /// Check required fields.
    pub fn validate(&self) -> VitrineResult<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(VitrineError::validation("item id must be non-empty"));
        }
        if self.primary_asset.trim().is_empty() {
            return Err(VitrineError::validation(format!(
                "item '{}' primary_asset must be non-empty",
                self.id
            )));
        }
        if self.secondary_assets.iter().any(|a| a.trim().is_empty()) {
            return Err(VitrineError::validation(format!(
                "item '{}' has an empty secondary asset",
                self.id
            )));
        }
        if let Some(link) = &self.purchase
            && link.url.trim().is_empty()
        {
            return Err(VitrineError::validation(format!(
                "item '{}' purchase url must be non-empty",
                self.id
            )));
        }
        Ok(())
    }
}

/// Validate every item and require unique ids.
pub fn validate_items(items: &[Item]) -> VitrineResult<()> {
    let mut seen = BTreeSet::new();
    for item in items {
        item.validate()?;
        if !seen.insert(&item.id) {
            return Err(VitrineError::validation(format!(
                "duplicate item id '{}'",
                item.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/presentation/item.rs"]
mod tests;
