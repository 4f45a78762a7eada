/// Showcase items.
pub mod item;
/// The showcase component.
pub mod showcase;
