//! The view state machine and the flights it drives.

/// Secondary-asset carousel.
pub mod carousel;
/// Timeline builders for the enter and advance flights.
pub mod flip;
/// The view state machine.
pub mod machine;
/// States, requests and events.
pub mod state;
