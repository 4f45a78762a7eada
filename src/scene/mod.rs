/// Element slots of each item.
pub mod elements;
/// Retained per-element styles.
pub mod stage;
