use std::fmt;

use crate::{
    animation::props::VisualProps,
    foundation::core::{Side, Viewport},
    layout::snapshot::LayoutSnapshot,
    scroll::region::ScrollEvent,
};

/// Which item, if any, owns the detail view.
///
/// Holding the index inside the variant makes "two items in detail at once"
/// unrepresentable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "state", content = "item", rename_all = "snake_case")]
pub enum ViewState {
    /// Every item visible in the overview.
    #[default]
    Overview,
    /// Item is flying from the overview into its detail view.
    EnteringDetail(usize),
    /// Item is shown in detail.
    Detail(usize),
    /// Item is flying back (or out, during an advance).
    ExitingDetail(usize),
}

impl ViewState {
    /// Item the state refers to.
    pub fn active_item(self) -> Option<usize> {
        match self {
            Self::Overview => None,
            Self::EnteringDetail(i) | Self::Detail(i) | Self::ExitingDetail(i) => Some(i),
        }
    }

    /// True for the two in-flight states.
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::EnteringDetail(_) | Self::ExitingDetail(_))
    }

    /// Item in settled detail.
    pub fn detail_item(self) -> Option<usize> {
        match self {
            Self::Detail(i) => Some(i),
            _ => None,
        }
    }

    /// Whether `next` is a legal successor.
    pub fn can_transition_to(self, next: ViewState) -> bool {
        use ViewState::*;
        match (self, next) {
            (Overview, EnteringDetail(_)) => true,
            (EnteringDetail(i), Detail(j)) => i == j,
            (EnteringDetail(_), Overview) => true,
            (Detail(i), ExitingDetail(j)) => i == j,
            (ExitingDetail(_), Overview) => true,
            (ExitingDetail(i), Detail(j)) => i == j,
            (ExitingDetail(i), EnteringDetail(j)) => i != j,
            _ => false,
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overview => f.write_str("overview"),
            Self::EnteringDetail(i) => write!(f, "entering_detail({i})"),
            Self::Detail(i) => write!(f, "detail({i})"),
            Self::ExitingDetail(i) => write!(f, "exiting_detail({i})"),
        }
    }
}

/// Geometry of one FLIP flight: from an overview rectangle to a dock.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TransitionPlan {
    /// Item that flies.
    pub item_index: usize,
    /// Overview rectangle measured before the flight.
    pub source: LayoutSnapshot,
    /// Dock rectangle measured after the panel was laid out.
    pub destination: LayoutSnapshot,
    /// Side of the viewport the source sat on; signs the tilt.
    pub side: Side,
}

impl TransitionPlan {
    /// Plan a flight with the side taken from the source position.
    pub fn new(
        item_index: usize,
        source: LayoutSnapshot,
        destination: LayoutSnapshot,
        viewport: Viewport,
    ) -> Self {
        Self::with_side(item_index, source, destination, source.side_in(viewport))
    }

    /// Plan a flight with a known side.
    pub fn with_side(
        item_index: usize,
        source: LayoutSnapshot,
        destination: LayoutSnapshot,
        side: Side,
    ) -> Self {
        Self {
            item_index,
            source,
            destination,
            side,
        }
    }

    /// Props that place the overview element exactly over the dock.
    pub fn docked(&self) -> VisualProps {
        VisualProps {
            translate: self.source.offset_to(self.destination),
            scale: self.source.fit_scale_to(self.destination),
            ..VisualProps::IDENTITY
        }
    }

    /// Peak tilt for `tilt_deg`, signed by side.
    pub fn tilt(&self, tilt_deg: f64) -> f64 {
        tilt_deg * self.side.sign()
    }
}

/// Transition request as issued by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "request", content = "item", rename_all = "snake_case")]
pub enum Request {
    /// Open an item from the overview.
    Enter(usize),
    /// Close the item in detail.
    Exit,
    /// Move from the item in detail to another one.
    Advance(usize),
}

/// Why a request was not started. Nothing is queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "reason", content = "item", rename_all = "snake_case")]
pub enum Rejection {
    /// The engine was unmounted.
    Unmounted,
    /// Another transition is in flight.
    InFlight,
    /// Entering requires the overview.
    NotInOverview,
    /// Exiting or advancing requires a settled detail view.
    NotInDetail,
    /// Index outside the item collection.
    UnknownItem(usize),
    /// Advance target is already in detail.
    AlreadyActive(usize),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmounted => f.write_str("engine is unmounted"),
            Self::InFlight => f.write_str("a transition is already in flight"),
            Self::NotInOverview => f.write_str("not in the overview"),
            Self::NotInDetail => f.write_str("not in a settled detail view"),
            Self::UnknownItem(i) => write!(f, "unknown item {i}"),
            Self::AlreadyActive(i) => write!(f, "item {i} is already in detail"),
        }
    }
}

/// Immediate result of a transition request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The transition started.
    Started,
    /// The request was dropped.
    Rejected(Rejection),
    /// The transition could not start; visual state is unchanged.
    Aborted(String),
}

impl RequestOutcome {
    /// True for [`RequestOutcome::Started`].
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

/// Notifications drained by the host after each input.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// The view state changed.
    StateChanged {
        /// Previous state.
        from: ViewState,
        /// New state.
        to: ViewState,
    },
    /// A request was rejected.
    TransitionRejected {
        /// The request.
        request: Request,
        /// Why.
        reason: Rejection,
    },
    /// A transition was abandoned and its visual changes rolled back.
    TransitionAborted {
        /// Item that was flying.
        item: usize,
        /// Underlying failure.
        reason: String,
    },
    /// An in-flight transition was stopped and snapped to a terminal state.
    TransitionInterrupted {
        /// State it settled in.
        snapped_to: ViewState,
    },
    /// A deferred dock measurement resolved.
    DestinationMeasured {
        /// Item whose dock was measured.
        item: usize,
        /// Layout epoch at request time.
        requested_epoch: u64,
        /// Layout epoch the measurement was taken in.
        measured_epoch: u64,
    },
    /// The detail carousel started for an item.
    CarouselStarted {
        /// Item in detail.
        item: usize,
    },
    /// The first asset finished its entrance; automatic advancing begins.
    CarouselReady {
        /// Item in detail.
        item: usize,
    },
    /// The carousel moved to another asset.
    CarouselAdvanced {
        /// Item in detail.
        item: usize,
        /// Outgoing asset index.
        from: usize,
        /// Incoming asset index.
        to: usize,
    },
    /// An interval fired during a cross-fade and was ignored.
    CarouselTickSkipped {
        /// Item in detail.
        item: usize,
    },
    /// The carousel stopped.
    CarouselStopped {
        /// Item that was in detail.
        item: usize,
    },
    /// Scroll region callback.
    Scroll {
        /// What the region reported.
        scroll: ScrollEvent,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/engine/state.rs"]
mod tests;
