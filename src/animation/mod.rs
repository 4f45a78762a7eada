//! Tweens and timelines over element visual properties.

/// Easing curves.
pub mod ease;
/// Visual properties and their interpolation.
pub mod props;
/// Time-driven timelines of property steps.
pub mod timeline;
