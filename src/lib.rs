//! Vitrine is a headless engine for scroll-synchronized FLIP view transitions.
//!
//! A showcase presents a collection of items in an overview grid. Activating an
//! item (or scrolling through a pinned region) flies it from its overview card
//! into a detail panel, where a carousel cycles its secondary assets.
//!
//! # Model
//!
//! - **Stage**: retained per-element styles ([`Stage`]) written by the engine.
//! - **Layout**: element rectangles read through a [`LayoutProbe`]. Measurements
//!   taken right after a visibility change are deferred one layout pass.
//! - **Timelines**: property tweens sampled purely from elapsed time, so a
//!   timeline can be seeked, reversed and killed at any point.
//! - **State machine**: [`ViewStateMachine`] admits one transition at a time and
//!   rejects (never queues) requests that arrive while one is in flight.
//! - **Showcase**: [`Showcase`] ties items, a pinned scroll region and the state
//!   machine behind a single [`Input`] entry point.
//!
//! Nothing here touches a real DOM. [`SimLayout`] and [`run_scenario`] drive the
//! engine against declared layout boxes; the `vitrine` binary exposes both.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Tweens, easing and timelines.
pub mod animation;
/// Showcase configuration.
pub mod config;
/// View state machine, flights and the detail carousel.
pub mod engine;
/// Shared types and errors.
pub mod foundation;
/// Layout probing.
pub mod layout;
/// Items and the showcase component.
pub mod presentation;
/// Elements and their retained styles.
pub mod scene;
/// Pinned scroll regions.
pub mod scroll;
/// Simulated layout and scripted sessions.
pub mod sim;

pub use crate::animation::ease::Ease;
pub use crate::animation::props::{ChannelValues, Lerp, Span, Tween, VisualProps};
pub use crate::animation::timeline::{
    At, Direction, Timeline, TimelineBuilder, TimelineStatus, TimelineTick,
};
pub use crate::config::model::{CarouselConfig, MotionConfig, ShowcaseConfig, Variant};
pub use crate::engine::carousel::{CarouselEvent, CarouselState, DetailCarousel};
pub use crate::engine::flip::{BACKDROP_LABEL, HANDOFF_LABEL};
pub use crate::engine::machine::{EngineCtx, ViewStateMachine};
pub use crate::engine::state::{
    EngineEvent, Rejection, Request, RequestOutcome, TransitionPlan, ViewState,
};
pub use crate::foundation::core::{ElementId, ItemId, Point, Rect, Side, Size, Vec2, Viewport};
pub use crate::foundation::error::{VitrineError, VitrineResult};
pub use crate::layout::snapshot::{
    DeferredMeasure, LayoutProbe, LayoutSnapshot, measure, measure_sized,
};
pub use crate::presentation::item::{Item, PurchaseLink, validate_items};
pub use crate::presentation::showcase::{Input, Intent, Showcase, section_for};
pub use crate::scene::elements::{ElementMap, ItemSlots};
pub use crate::scene::stage::{ElementStyle, Stage, StageSnapshot};
pub use crate::scroll::region::{
    PinConfig, PinGeometry, PinState, PinnedRegion, ScrollDirection, ScrollEvent,
};
pub use crate::sim::layout::SimLayout;
pub use crate::sim::scenario::{
    Harness, ItemLayout, Scenario, ScriptStep, Trace, TraceEntry, run_scenario,
};
