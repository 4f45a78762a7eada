use crate::{
    animation::props::VisualProps,
    animation::timeline::{Timeline, TimelineTick},
    config::model::{CarouselConfig, MotionConfig},
    engine::carousel::{CarouselEvent, CarouselState, DetailCarousel},
    engine::flip::{HANDOFF_LABEL, advance_timeline, enter_timeline},
    engine::state::{EngineEvent, Rejection, Request, RequestOutcome, TransitionPlan, ViewState},
    foundation::core::Side,
    foundation::error::{VitrineError, VitrineResult},
    layout::snapshot::{DeferredMeasure, LayoutProbe, LayoutSnapshot, measure_sized},
    scene::elements::{ItemSlots, all_elements},
    scene::stage::{Stage, StageSnapshot},
};

/// Host resources borrowed for one engine call.
pub struct EngineCtx<'a> {
    /// Style table the engine writes into.
    pub stage: &'a mut Stage,
    /// Committed layout.
    pub probe: &'a dyn LayoutProbe,
    /// Elements of every item, in item order.
    pub slots: &'a [ItemSlots],
}

impl<'a> EngineCtx<'a> {
    /// Bundle host resources.
    pub fn new(stage: &'a mut Stage, probe: &'a dyn LayoutProbe, slots: &'a [ItemSlots]) -> Self {
        Self {
            stage,
            probe,
            slots,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Origin {
    item: usize,
    source: LayoutSnapshot,
    side: Side,
}

#[derive(Clone, Copy, Debug)]
enum FlightKind {
    Enter {
        item: usize,
    },
    Exit {
        item: usize,
    },
    Advance {
        from: usize,
        to: usize,
        outgoing: TransitionPlan,
    },
}

impl FlightKind {
    fn item(&self) -> usize {
        match *self {
            Self::Enter { item } | Self::Exit { item } => item,
            Self::Advance { to, .. } => to,
        }
    }
}

#[derive(Debug)]
enum FlightPhase {
    // Destination panel was just shown; its dock is measured after the next layout.
    AwaitingLayout {
        pending: DeferredMeasure,
        source: LayoutSnapshot,
    },
    Animating {
        timeline: Timeline,
        plan: TransitionPlan,
    },
}

#[derive(Debug)]
struct Flight {
    kind: FlightKind,
    phase: FlightPhase,
    before: StageSnapshot,
}

/// Overview/detail state machine driving FLIP flights.
///
/// Single-threaded and tick-driven: requests either start a flight or are
/// rejected immediately, and [`ViewStateMachine::frame`] advances whatever is
/// in flight. Notifications accumulate until [`ViewStateMachine::drain_events`].
#[derive(Debug)]
pub struct ViewStateMachine {
    state: ViewState,
    flight: Option<Flight>,
    origin: Option<Origin>,
    carousel: Option<DetailCarousel>,
    motion: MotionConfig,
    carousel_config: CarouselConfig,
    mounted: bool,
    events: Vec<EngineEvent>,
}

impl ViewStateMachine {
    /// New machine in [`ViewState::Overview`].
    pub fn new(motion: MotionConfig, carousel: CarouselConfig) -> VitrineResult<Self> {
        motion.validate()?;
        carousel.validate()?;
        Ok(Self {
            state: ViewState::Overview,
            flight: None,
            origin: None,
            carousel: None,
            motion,
            carousel_config: carousel,
            mounted: true,
            events: Vec::new(),
        })
    }

    /// Current state.
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// True while a flight holds the transition lock.
    pub fn is_transitioning(&self) -> bool {
        self.flight.is_some()
    }

    /// Item that will be in detail once the running flight lands, or the
    /// item in detail when nothing is in flight. `None` while exiting.
    pub fn destination(&self) -> Option<usize> {
        match self.flight.as_ref().map(|f| f.kind) {
            Some(FlightKind::Enter { item }) => Some(item),
            Some(FlightKind::Advance { to, .. }) => Some(to),
            Some(FlightKind::Exit { .. }) => None,
            None => self.state.detail_item(),
        }
    }

    /// False after [`ViewStateMachine::unmount`].
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Normalized progress of the running flight timeline.
    pub fn flight_progress(&self) -> Option<f64> {
        match &self.flight.as_ref()?.phase {
            FlightPhase::Animating { timeline, .. } => Some(timeline.progress()),
            FlightPhase::AwaitingLayout { .. } => None,
        }
    }

    /// Carousel of the item in detail.
    pub fn carousel_state(&self) -> Option<CarouselState> {
        self.carousel.as_ref().map(DetailCarousel::state)
    }

    /// Overview rectangle recorded when the current detail item flew in.
    pub fn detail_origin(&self) -> Option<LayoutSnapshot> {
        self.origin.map(|o| o.source)
    }

    /// Motion settings.
    pub fn motion(&self) -> &MotionConfig {
        &self.motion
    }

    /// Take accumulated notifications.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Dispatch `request`.
    pub fn request(&mut self, request: Request, ctx: &mut EngineCtx<'_>) -> RequestOutcome {
        match request {
            Request::Enter(item) => self.enter_detail(item, ctx),
            Request::Exit => self.exit_detail(ctx),
            Request::Advance(item) => self.handle_scroll_driven_advance(item, ctx),
        }
    }

    /// Start the overview-to-detail flight of `item`.
    #[tracing::instrument(skip(self, ctx), fields(state = %self.state))]
    pub fn enter_detail(&mut self, item: usize, ctx: &mut EngineCtx<'_>) -> RequestOutcome {
        let request = Request::Enter(item);
        if let Err(reason) = self.admit(request, ctx.slots.len()) {
            return self.reject(request, reason);
        }
        let all = ctx.slots;
        let slots = &all[item];
        let source = match measure_sized(ctx.probe, slots.overview) {
            Ok(s) => s,
            Err(err) => return self.abort_request(item, err),
        };

        let before = ctx.stage.capture(all_elements(all));
        self.set_state(ViewState::EnteringDetail(item));
        for s in all {
            ctx.stage.set_interactive(s.overview, false);
        }
        show_panel(ctx.stage, slots, true);
        ctx.stage.set_interactive(slots.panel, false);
        ctx.stage.set_opacity(slots.panel, 0.0);

        let pending = DeferredMeasure::request(ctx.probe, slots.dock);
        tracing::debug!(?source, epoch = pending.requested_epoch(), "enter requested");
        self.flight = Some(Flight {
            kind: FlightKind::Enter { item },
            phase: FlightPhase::AwaitingLayout { pending, source },
            before,
        });
        RequestOutcome::Started
    }

    /// Start the detail-to-overview flight: the enter flight played backward
    /// from the current dock position.
    #[tracing::instrument(skip(self, ctx), fields(state = %self.state))]
    pub fn exit_detail(&mut self, ctx: &mut EngineCtx<'_>) -> RequestOutcome {
        let request = Request::Exit;
        if let Err(reason) = self.admit(request, ctx.slots.len()) {
            return self.reject(request, reason);
        }
        let Some(item) = self.state.detail_item() else {
            return self.reject(request, Rejection::NotInDetail);
        };
        let all = ctx.slots;
        let slots = &all[item];

        let built = self
            .origin_of(item)
            .and_then(|origin| {
                let dock = measure_sized(ctx.probe, slots.dock)?;
                Ok(TransitionPlan::with_side(item, origin.source, dock, origin.side))
            })
            .and_then(|plan| Ok((enter_timeline(&plan, all, &self.motion)?, plan)));
        let (mut timeline, plan) = match built {
            Ok(v) => v,
            Err(err) => {
                // Without a dock there is nothing to fly back from.
                self.stop_carousel();
                self.set_state(ViewState::ExitingDetail(item));
                self.set_state(ViewState::Overview);
                self.origin = None;
                show_overview(ctx.stage, all);
                return self.abort_request(item, err);
            }
        };

        self.stop_carousel();
        let before = ctx.stage.capture(all_elements(all));
        timeline.seek(1.0);
        timeline.reverse();
        timeline.apply(ctx.stage);
        self.set_state(ViewState::ExitingDetail(item));
        ctx.stage.set_interactive(slots.panel, false);
        self.flight = Some(Flight {
            kind: FlightKind::Exit { item },
            phase: FlightPhase::Animating { timeline, plan },
            before,
        });
        RequestOutcome::Started
    }

    /// Replace the item in detail with `to` in a single flight.
    ///
    /// The state reads `ExitingDetail(from)` until the handoff label, then
    /// `EnteringDetail(to)`, then `Detail(to)`.
    #[tracing::instrument(skip(self, ctx), fields(state = %self.state))]
    pub fn handle_scroll_driven_advance(
        &mut self,
        to: usize,
        ctx: &mut EngineCtx<'_>,
    ) -> RequestOutcome {
        let request = Request::Advance(to);
        if let Err(reason) = self.admit(request, ctx.slots.len()) {
            return self.reject(request, reason);
        }
        let Some(from) = self.state.detail_item() else {
            return self.reject(request, Rejection::NotInDetail);
        };
        let all = ctx.slots;
        let measured = measure_sized(ctx.probe, all[to].overview).and_then(|source| {
            let origin = self.origin_of(from)?;
            let dock = measure_sized(ctx.probe, all[from].dock)?;
            Ok((
                source,
                TransitionPlan::with_side(from, origin.source, dock, origin.side),
            ))
        });
        let (source, outgoing) = match measured {
            Ok(v) => v,
            Err(err) => return self.abort_request(to, err),
        };

        self.stop_carousel();
        let before = ctx.stage.capture(all_elements(all));
        self.set_state(ViewState::ExitingDetail(from));
        ctx.stage.set_interactive(all[from].panel, false);
        show_panel(ctx.stage, &all[to], true);
        ctx.stage.set_interactive(all[to].panel, false);
        ctx.stage.set_opacity(all[to].panel, 0.0);

        let pending = DeferredMeasure::request(ctx.probe, all[to].dock);
        self.flight = Some(Flight {
            kind: FlightKind::Advance { from, to, outgoing },
            phase: FlightPhase::AwaitingLayout { pending, source },
            before,
        });
        RequestOutcome::Started
    }

    /// Advance the carousel of the item in detail right away.
    pub fn advance_carousel(&mut self, ctx: &mut EngineCtx<'_>) -> Option<(usize, usize)> {
        if !self.mounted || self.flight.is_some() {
            return None;
        }
        let carousel = self.carousel.as_mut()?;
        let item = carousel.item();
        match carousel.advance_now(ctx.stage) {
            Ok(Some((from, to))) => {
                self.events
                    .push(EngineEvent::CarouselAdvanced { item, from, to });
                Some((from, to))
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(item, error = %err, "carousel advance failed");
                None
            }
        }
    }

    /// Advance the carousel and any flight by `dt` seconds.
    pub fn frame(&mut self, dt: f64, ctx: &mut EngineCtx<'_>) {
        if !self.mounted {
            return;
        }
        // Carousel first: one started by a settling flight waits for the next frame.
        self.tick_carousel(dt, ctx.stage);
        if let Some(flight) = self.flight.take() {
            self.flight = self.step_flight(flight, dt, ctx);
        }
    }

    /// Stop the running flight and snap to the nearest terminal state.
    /// Returns the state it settled in, or `None` if nothing was in flight.
    #[tracing::instrument(skip(self, ctx), fields(state = %self.state))]
    pub fn interrupt(&mut self, ctx: &mut EngineCtx<'_>) -> Option<ViewState> {
        if !self.mounted {
            return None;
        }
        let flight = self.flight.take()?;
        let snapped = self.snap(flight, ctx);
        self.events.push(EngineEvent::TransitionInterrupted {
            snapped_to: snapped,
        });
        Some(snapped)
    }

    /// Drop everything and show the overview, as on route navigation.
    #[tracing::instrument(skip(self, ctx), fields(state = %self.state))]
    pub fn reset(&mut self, ctx: &mut EngineCtx<'_>) {
        if !self.mounted {
            return;
        }
        if let Some(mut flight) = self.flight.take()
            && let FlightPhase::Animating { timeline, .. } = &mut flight.phase
        {
            timeline.kill();
        }
        self.stop_carousel();
        self.origin = None;
        if self.state != ViewState::Overview {
            let from = std::mem::replace(&mut self.state, ViewState::Overview);
            self.events.push(EngineEvent::StateChanged {
                from,
                to: ViewState::Overview,
            });
        }
        show_overview(ctx.stage, ctx.slots);
    }

    /// Kill all animation and timers. Nothing is written or reported afterward.
    pub fn unmount(&mut self) {
        if let Some(mut flight) = self.flight.take()
            && let FlightPhase::Animating { timeline, .. } = &mut flight.phase
        {
            timeline.kill();
        }
        if let Some(mut carousel) = self.carousel.take() {
            carousel.stop();
        }
        self.state = ViewState::Overview;
        self.origin = None;
        self.events.clear();
        self.mounted = false;
        tracing::debug!("view state machine unmounted");
    }

    fn admit(&self, request: Request, item_count: usize) -> Result<(), Rejection> {
        if !self.mounted {
            return Err(Rejection::Unmounted);
        }
        if self.flight.is_some() {
            return Err(Rejection::InFlight);
        }
        match request {
            Request::Enter(item) => {
                if self.state != ViewState::Overview {
                    return Err(Rejection::NotInOverview);
                }
                if item >= item_count {
                    return Err(Rejection::UnknownItem(item));
                }
            }
            Request::Exit => {
                if self.state.detail_item().is_none() {
                    return Err(Rejection::NotInDetail);
                }
            }
            Request::Advance(to) => {
                let Some(from) = self.state.detail_item() else {
                    return Err(Rejection::NotInDetail);
                };
                if to >= item_count {
                    return Err(Rejection::UnknownItem(to));
                }
                if to == from {
                    return Err(Rejection::AlreadyActive(to));
                }
            }
        }
        Ok(())
    }

    fn reject(&mut self, request: Request, reason: Rejection) -> RequestOutcome {
        tracing::debug!(?request, %reason, "transition request rejected");
        if self.mounted {
            self.events
                .push(EngineEvent::TransitionRejected { request, reason });
        }
        RequestOutcome::Rejected(reason)
    }

    fn abort_request(&mut self, item: usize, err: VitrineError) -> RequestOutcome {
        tracing::warn!(item, error = %err, "transition aborted");
        let reason = err.to_string();
        self.events.push(EngineEvent::TransitionAborted {
            item,
            reason: reason.clone(),
        });
        RequestOutcome::Aborted(reason)
    }

    fn origin_of(&self, item: usize) -> VitrineResult<Origin> {
        self.origin.filter(|o| o.item == item).ok_or_else(|| {
            VitrineError::measurement(format!("no overview rectangle recorded for item {item}"))
        })
    }

    fn set_state(&mut self, next: ViewState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {next}",
            self.state
        );
        let from = std::mem::replace(&mut self.state, next);
        tracing::debug!(%from, to = %next, "view state changed");
        self.events.push(EngineEvent::StateChanged { from, to: next });
    }

    fn step_flight(
        &mut self,
        flight: Flight,
        dt: f64,
        ctx: &mut EngineCtx<'_>,
    ) -> Option<Flight> {
        let Flight {
            kind,
            phase,
            before,
        } = flight;
        match phase {
            FlightPhase::AwaitingLayout { pending, source } => {
                let dest = match pending.poll(ctx.probe) {
                    Ok(None) => {
                        return Some(Flight {
                            kind,
                            phase: FlightPhase::AwaitingLayout { pending, source },
                            before,
                        });
                    }
                    Ok(Some(dest)) => dest,
                    Err(err) => {
                        self.rollback(kind, &before, err, ctx);
                        return None;
                    }
                };
                let item = kind.item();
                self.events.push(EngineEvent::DestinationMeasured {
                    item,
                    requested_epoch: pending.requested_epoch(),
                    measured_epoch: ctx.probe.layout_epoch(),
                });
                let plan = TransitionPlan::new(item, source, dest, ctx.probe.viewport());
                let built = match kind {
                    FlightKind::Enter { .. } => enter_timeline(&plan, ctx.slots, &self.motion),
                    FlightKind::Advance { outgoing, .. } => {
                        advance_timeline(&outgoing, &plan, ctx.slots, &self.motion)
                    }
                    FlightKind::Exit { .. } => Err(VitrineError::timeline(
                        "exit flights never wait for layout",
                    )),
                };
                let mut timeline = match built {
                    Ok(t) => t,
                    Err(err) => {
                        self.rollback(kind, &before, err, ctx);
                        return None;
                    }
                };
                tracing::debug!(item, ?dest, duration = timeline.duration(), "flight started");
                timeline.play();
                timeline.apply(ctx.stage);
                Some(Flight {
                    kind,
                    phase: FlightPhase::Animating { timeline, plan },
                    before,
                })
            }
            FlightPhase::Animating { mut timeline, plan } => {
                if let Some(dead) = timeline
                    .targets()
                    .into_iter()
                    .find(|el| !ctx.probe.is_live(*el))
                {
                    tracing::warn!(element = %dead, "animated element unmounted mid-flight");
                    let snapped = self.snap(
                        Flight {
                            kind,
                            phase: FlightPhase::Animating { timeline, plan },
                            before,
                        },
                        ctx,
                    );
                    self.events.push(EngineEvent::TransitionInterrupted {
                        snapped_to: snapped,
                    });
                    return None;
                }

                let tick = timeline.tick(dt);
                timeline.apply(ctx.stage);
                if let FlightKind::Advance { from, to, .. } = kind
                    && self.state == ViewState::ExitingDetail(from)
                    && timeline
                        .label_time(HANDOFF_LABEL)
                        .is_some_and(|h| timeline.time() >= h)
                {
                    self.set_state(ViewState::EnteringDetail(to));
                }

                if let TimelineTick::Completed(_) = tick {
                    timeline.kill();
                    self.settle(kind, plan, ctx);
                    return None;
                }
                Some(Flight {
                    kind,
                    phase: FlightPhase::Animating { timeline, plan },
                    before,
                })
            }
        }
    }

    // Forward terminal of `kind`.
    fn settle(&mut self, kind: FlightKind, plan: TransitionPlan, ctx: &mut EngineCtx<'_>) {
        match kind {
            FlightKind::Enter { item } => {
                self.set_state(ViewState::Detail(item));
                self.origin = Some(Origin {
                    item,
                    source: plan.source,
                    side: plan.side,
                });
                self.show_detail(item, ctx);
            }
            FlightKind::Exit { .. } => {
                self.set_state(ViewState::Overview);
                self.origin = None;
                show_overview(ctx.stage, ctx.slots);
            }
            FlightKind::Advance { to, .. } => {
                if self.state != ViewState::EnteringDetail(to) {
                    self.set_state(ViewState::EnteringDetail(to));
                }
                self.set_state(ViewState::Detail(to));
                self.origin = Some(Origin {
                    item: to,
                    source: plan.source,
                    side: plan.side,
                });
                self.show_detail(to, ctx);
            }
        }
    }

    fn snap(&mut self, flight: Flight, ctx: &mut EngineCtx<'_>) -> ViewState {
        let Flight {
            kind,
            phase,
            before,
        } = flight;
        match phase {
            FlightPhase::AwaitingLayout { .. } => {
                ctx.stage.restore(&before);
                self.retreat(kind, ctx);
            }
            FlightPhase::Animating { mut timeline, plan } => {
                let threshold = self.motion.snap_threshold;
                let forward = match kind {
                    FlightKind::Enter { .. } => timeline.progress() >= threshold,
                    FlightKind::Exit { .. } => 1.0 - timeline.progress() >= threshold,
                    FlightKind::Advance { to, .. } => {
                        self.state == ViewState::EnteringDetail(to)
                    }
                };
                // Exit plays the enter timeline backward, so its forward end is 0.
                let at_exit_start = matches!(kind, FlightKind::Exit { .. });
                let terminal = if forward != at_exit_start { 1.0 } else { 0.0 };
                timeline.seek(terminal);
                timeline.apply(ctx.stage);
                timeline.kill();
                tracing::debug!(?kind, forward, "flight snapped");
                if forward {
                    self.settle(kind, plan, ctx);
                } else {
                    self.retreat(kind, ctx);
                }
            }
        }
        self.state
    }

    // Backward terminal of `kind`: the state the flight started from.
    fn retreat(&mut self, kind: FlightKind, ctx: &mut EngineCtx<'_>) {
        match kind {
            FlightKind::Enter { .. } => {
                self.set_state(ViewState::Overview);
                self.origin = None;
                show_overview(ctx.stage, ctx.slots);
            }
            FlightKind::Exit { item } => {
                self.set_state(ViewState::Detail(item));
                self.show_detail(item, ctx);
            }
            FlightKind::Advance { from, .. } => {
                self.set_state(ViewState::Detail(from));
                self.show_detail(from, ctx);
            }
        }
    }

    fn rollback(
        &mut self,
        kind: FlightKind,
        before: &StageSnapshot,
        err: VitrineError,
        ctx: &mut EngineCtx<'_>,
    ) {
        ctx.stage.restore(before);
        let item = kind.item();
        tracing::warn!(item, error = %err, "flight rolled back");
        self.events.push(EngineEvent::TransitionAborted {
            item,
            reason: err.to_string(),
        });
        self.retreat(kind, ctx);
    }

    fn show_detail(&mut self, item: usize, ctx: &mut EngineCtx<'_>) {
        for (k, s) in ctx.slots.iter().enumerate() {
            ctx.stage.set_interactive(s.overview, false);
            if k == item {
                show_panel(ctx.stage, s, true);
                ctx.stage.set_interactive(s.panel, true);
            } else {
                show_panel(ctx.stage, s, false);
                ctx.stage.set_props(s.panel, VisualProps::with_opacity(0.0));
                for el in &s.assets {
                    ctx.stage.set_visible(*el, false);
                }
            }
        }

        let side = self.origin.map_or(Side::Left, |o| o.side);
        let assets = ctx.slots.get(item).map(|s| s.assets.clone()).unwrap_or_default();
        match DetailCarousel::start(item, assets, side, self.carousel_config.clone(), ctx.stage) {
            Ok(carousel) => {
                self.carousel = Some(carousel);
                self.events.push(EngineEvent::CarouselStarted { item });
            }
            Err(err) => tracing::warn!(item, error = %err, "carousel failed to start"),
        }
    }

    fn stop_carousel(&mut self) {
        if let Some(mut carousel) = self.carousel.take() {
            carousel.stop();
            self.events.push(EngineEvent::CarouselStopped {
                item: carousel.item(),
            });
        }
    }

    fn tick_carousel(&mut self, dt: f64, stage: &mut Stage) {
        let Some(carousel) = self.carousel.as_mut() else {
            return;
        };
        let item = carousel.item();
        match carousel.tick(dt, stage) {
            Ok(events) => {
                self.events.extend(events.into_iter().map(|ev| match ev {
                    CarouselEvent::Ready => EngineEvent::CarouselReady { item },
                    CarouselEvent::Advanced { from, to } => {
                        EngineEvent::CarouselAdvanced { item, from, to }
                    }
                    CarouselEvent::Skipped => EngineEvent::CarouselTickSkipped { item },
                }));
            }
            Err(err) => {
                tracing::warn!(item, error = %err, "carousel tick failed");
                self.stop_carousel();
            }
        }
    }
}

fn show_panel(stage: &mut Stage, slots: &ItemSlots, visible: bool) {
    stage.set_visible(slots.panel, visible);
    stage.set_visible(slots.dock, visible);
    if !visible {
        stage.set_interactive(slots.panel, false);
    }
}

/// Settled overview styling: every card shown and clickable, every panel hidden.
pub(crate) fn show_overview(stage: &mut Stage, slots: &[ItemSlots]) {
    for s in slots {
        stage.set_visible(s.overview, true);
        stage.set_props(s.overview, VisualProps::IDENTITY);
        stage.set_interactive(s.overview, true);
        show_panel(stage, s, false);
        stage.set_props(s.panel, VisualProps::with_opacity(0.0));
        for el in &s.assets {
            stage.set_visible(*el, false);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/machine.rs"]
mod tests;
