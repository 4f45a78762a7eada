/// Layout probing and deferred measurement.
pub mod snapshot;
