use crate::{
    config::model::{ShowcaseConfig, Variant},
    engine::carousel::CarouselState,
    engine::machine::{EngineCtx, ViewStateMachine, show_overview},
    engine::state::{EngineEvent, Rejection, RequestOutcome, ViewState},
    foundation::core::Viewport,
    foundation::error::VitrineResult,
    foundation::math::finite_non_negative,
    layout::snapshot::LayoutProbe,
    presentation::item::{Item, validate_items},
    scene::elements::{ElementMap, ItemSlots},
    scene::stage::Stage,
    scroll::region::{PinnedRegion, ScrollDirection, ScrollEvent},
};

/// Host input.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    /// Pointer or keyboard activation of an overview item.
    Activate {
        /// Item index.
        index: usize,
    },
    /// Close button.
    Close,
    /// Escape key.
    Escape,
    /// Document scroll offset changed.
    Scroll(f64),
    /// Viewport resized; the region top may have moved with it.
    Resize {
        /// New viewport.
        viewport: Viewport,
        /// New document offset of the region top.
        region_top: f64,
    },
    /// One rendered frame, `dt` seconds after the previous one.
    Frame(f64),
    /// Route change: drop everything and show the overview.
    Navigate,
}

/// Where scroll position wants the view to be, pending the transition lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "intent", content = "item", rename_all = "snake_case")]
pub enum Intent {
    /// Item should be in detail.
    Show(usize),
    /// The overview should be shown.
    Close,
}

/// Section of `progress` in a region split evenly across `count` items.
pub fn section_for(progress: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let p = progress.clamp(0.0, 1.0);
    ((p * count as f64).floor() as usize).min(count - 1)
}

/// The showcase component: items, the pinned scroll region and the view
/// state machine behind one input entry point.
#[derive(Debug)]
pub struct Showcase {
    items: Vec<Item>,
    slots: Vec<ItemSlots>,
    config: ShowcaseConfig,
    machine: ViewStateMachine,
    region: PinnedRegion,
    clock: f64,
    intent: Option<Intent>,
    mounted: bool,
}

impl Showcase {
    /// Validate inputs, pin the region and style `stage` for the overview.
    #[tracing::instrument(skip(items, elements, config, stage), fields(items = items.len(), variant = ?config.variant))]
    pub fn mount(
        items: Vec<Item>,
        elements: &ElementMap,
        config: ShowcaseConfig,
        viewport: Viewport,
        region_top: f64,
        stage: &mut Stage,
    ) -> VitrineResult<Self> {
        validate_items(&items)?;
        config.validate_for(items.len())?;
        let slots = elements.resolve(&items)?;

        let mut pin = config.pin.clone();
        if config.variant == Variant::Hybrid && pin.thresholds.is_empty() && items.len() > 1 {
            let n = items.len();
            pin.thresholds = (1..n).map(|k| k as f64 / n as f64).collect();
        }
        let region = PinnedRegion::pin(region_top, viewport, pin)?;
        let machine = ViewStateMachine::new(config.motion.clone(), config.carousel.clone())?;
        show_overview(stage, &slots);
        tracing::debug!(geometry = ?region.geometry(), "showcase mounted");

        Ok(Self {
            items,
            slots,
            config,
            machine,
            region,
            clock: 0.0,
            intent: None,
            mounted: true,
        })
    }

    /// Items in display order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Elements of every item, in display order.
    pub fn slots(&self) -> &[ItemSlots] {
        &self.slots
    }

    /// Configuration in use.
    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    /// Current view state.
    pub fn state(&self) -> ViewState {
        self.machine.state()
    }

    /// The state machine.
    pub fn machine(&self) -> &ViewStateMachine {
        &self.machine
    }

    /// The pinned region.
    pub fn region(&self) -> &PinnedRegion {
        &self.region
    }

    /// Carousel of the item in detail.
    pub fn carousel_state(&self) -> Option<CarouselState> {
        self.machine.carousel_state()
    }

    /// Scroll intent waiting for the transition lock.
    pub fn pending_intent(&self) -> Option<Intent> {
        self.intent
    }

    /// Seconds of frame time seen so far.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// False after [`Showcase::unmount`].
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Feed one input and return what happened.
    pub fn handle(
        &mut self,
        input: Input,
        stage: &mut Stage,
        probe: &dyn LayoutProbe,
    ) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        if !self.mounted {
            return out;
        }
        let mut ctx = EngineCtx::new(stage, probe, &self.slots);
        match input {
            Input::Activate { index } => {
                self.intent = None;
                self.machine.enter_detail(index, &mut ctx);
            }
            Input::Close | Input::Escape => {
                self.intent = None;
                self.machine.exit_detail(&mut ctx);
            }
            Input::Scroll(y) => {
                let scrolls = self.region.update(y);
                self.intent = self.follow_scroll(scrolls, self.intent, &mut out);
            }
            Input::Resize {
                viewport,
                region_top,
            } => self.region.resize(viewport, region_top, self.clock),
            Input::Frame(dt) => {
                if finite_non_negative(dt) {
                    self.clock += dt;
                }
                self.machine.frame(dt, &mut ctx);
                if let Some(scrolls) = self.region.poll(self.clock, !self.machine.is_transitioning())
                {
                    tracing::debug!(geometry = ?self.region.geometry(), "region re-measured");
                    self.intent = self.follow_scroll(scrolls, self.intent, &mut out);
                }
            }
            Input::Navigate => {
                self.intent = None;
                self.machine.reset(&mut ctx);
                self.region.unpin();
            }
        }
        pursue(&mut self.machine, &mut self.intent, &mut ctx);
        out.extend(self.machine.drain_events());
        out
    }

    /// Kill every animation and timer and release the region.
    pub fn unmount(&mut self) {
        self.machine.unmount();
        self.region.unpin();
        self.intent = None;
        self.mounted = false;
    }

    // Record scroll events and fold the intents they imply into `pending`;
    // the last intent wins.
    fn follow_scroll(
        &self,
        scrolls: Vec<ScrollEvent>,
        mut pending: Option<Intent>,
        out: &mut Vec<EngineEvent>,
    ) -> Option<Intent> {
        for scroll in scrolls {
            if !matches!(scroll, ScrollEvent::Progress(_)) {
                tracing::trace!(?scroll, "scroll region edge");
            }
            if let Some(intent) = self.scroll_intent(scroll, pending) {
                pending = Some(intent);
            }
            out.push(EngineEvent::Scroll { scroll });
        }
        pending
    }

    fn scroll_intent(&self, scroll: ScrollEvent, pending: Option<Intent>) -> Option<Intent> {
        let n = self.items.len();
        if n == 0 {
            return None;
        }
        match (self.config.variant, scroll) {
            (_, ScrollEvent::LeaveBack) => Some(Intent::Close),
            (_, ScrollEvent::Leave) => self.config.exit_on_leave.then_some(Intent::Close),
            (Variant::SingleReveal, ScrollEvent::Enter | ScrollEvent::EnterBack) => {
                Some(Intent::Show(self.config.reveal_index))
            }
            (Variant::PinnedSections, ScrollEvent::Enter | ScrollEvent::EnterBack) => {
                Some(Intent::Show(section_for(self.region.progress(), n)))
            }
            (Variant::PinnedSections, ScrollEvent::Progress(p)) if self.region.is_active() => {
                Some(Intent::Show(section_for(p, n)))
            }
            (Variant::Hybrid, ScrollEvent::Threshold { direction, .. })
                if self.region.is_active() =>
            {
                let current = match pending {
                    Some(Intent::Show(k)) => Some(k),
                    Some(Intent::Close) => None,
                    None => self.machine.destination(),
                }?;
                let next = match direction {
                    ScrollDirection::Down => (current + 1).min(n - 1),
                    ScrollDirection::Up => current.saturating_sub(1),
                };
                Some(Intent::Show(next))
            }
            _ => None,
        }
    }
}

// Issue the pending intent once nothing is in flight.
fn pursue(machine: &mut ViewStateMachine, intent: &mut Option<Intent>, ctx: &mut EngineCtx<'_>) {
    let Some(want) = *intent else {
        return;
    };
    if !machine.is_mounted() || machine.is_transitioning() {
        return;
    }
    let outcome = match (want, machine.state()) {
        (Intent::Show(k), ViewState::Overview) => machine.enter_detail(k, ctx),
        (Intent::Show(k), ViewState::Detail(j)) if j != k => {
            machine.handle_scroll_driven_advance(k, ctx)
        }
        (Intent::Close, ViewState::Detail(_)) => machine.exit_detail(ctx),
        _ => {
            *intent = None;
            return;
        }
    };
    tracing::debug!(?want, ?outcome, "scroll intent issued");
    if outcome != RequestOutcome::Rejected(Rejection::InFlight) {
        *intent = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/presentation/showcase.rs"]
mod tests;
