//! In-memory layout and scripted sessions, for tests and the CLI.

/// Simulated layout probe.
pub mod layout;
/// Scripted scenarios and their traces.
pub mod scenario;
