/// Pinned scroll region and its edge events.
pub mod region;
