/// Identifiers, viewport and geometry types.
pub mod core;
/// Error type and result alias.
pub mod error;
/// Small numeric helpers.
pub mod math;
