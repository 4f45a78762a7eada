/// Variant, motion and carousel settings.
pub mod model;
