use crate::{
    animation::props::{Tween, VisualProps},
    animation::timeline::{At, Timeline, TimelineBuilder, TimelineTick},
    config::model::CarouselConfig,
    foundation::core::{ElementId, Side, Vec2},
    foundation::error::VitrineResult,
    foundation::math::finite_non_negative,
    scene::stage::Stage,
};

/// Observable carousel state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CarouselState {
    /// Index of the asset currently shown.
    pub active_asset_index: usize,
    /// True while an entrance or cross-fade is playing.
    pub is_animating: bool,
}

/// What happened during one [`DetailCarousel::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarouselEvent {
    /// The first asset finished entering; the interval timer is now running.
    Ready,
    /// A cross-fade started.
    Advanced {
        /// Outgoing asset index.
        from: usize,
        /// Incoming asset index.
        to: usize,
    },
    /// The interval fired during a cross-fade and was ignored.
    Skipped,
}

#[derive(Debug)]
enum Motion {
    Entrance(Timeline),
    CrossFade { timeline: Timeline, from: usize },
}

impl Motion {
    fn timeline_mut(&mut self) -> &mut Timeline {
        match self {
            Self::Entrance(t) | Self::CrossFade { timeline: t, .. } => t,
        }
    }
}

/// Auto-advancing secondary-asset carousel of the item in detail.
///
/// The interval timer only starts once the entrance animation completed, so
/// the first automatic advance never overlaps it.
#[derive(Debug)]
pub struct DetailCarousel {
    item: usize,
    assets: Vec<ElementId>,
    side: Side,
    config: CarouselConfig,
    active: usize,
    motion: Option<Motion>,
    timer: Option<f64>,
    stopped: bool,
}

impl DetailCarousel {
    /// Show the first asset of `item` and start its entrance.
    #[tracing::instrument(skip(assets, config, stage), fields(assets = assets.len()))]
    pub fn start(
        item: usize,
        assets: Vec<ElementId>,
        side: Side,
        config: CarouselConfig,
        stage: &mut Stage,
    ) -> VitrineResult<Self> {
        config.validate()?;
        for (k, el) in assets.iter().enumerate() {
            stage.set_visible(*el, k == 0);
            stage.set_props(*el, VisualProps::with_opacity(0.0));
        }
        let mut carousel = Self {
            item,
            assets,
            side,
            config,
            active: 0,
            motion: None,
            timer: None,
            stopped: false,
        };
        match carousel.assets.first().copied() {
            Some(first) => {
                let offset = carousel.incoming_offset();
                let mut timeline = TimelineBuilder::new()
                    .tween(
                        [first],
                        Tween::translate(offset, Vec2::ZERO).with_opacity(0.0, 1.0),
                        carousel.config.entrance_secs,
                        carousel.config.ease,
                        At::Start(0.0),
                    )
                    .build()?;
                timeline.play();
                timeline.apply(stage);
                carousel.motion = Some(Motion::Entrance(timeline));
            }
            None => carousel.timer = Some(0.0),
        }
        Ok(carousel)
    }

    /// Item the carousel belongs to.
    pub fn item(&self) -> usize {
        self.item
    }

    /// Current state.
    pub fn state(&self) -> CarouselState {
        CarouselState {
            active_asset_index: self.active,
            is_animating: self.motion.is_some(),
        }
    }

    /// True once [`DetailCarousel::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// True once the entrance completed and automatic advancing runs.
    pub fn is_cycling(&self) -> bool {
        self.timer.is_some()
    }

    /// Advance timers and animations by `dt` seconds.
    pub fn tick(&mut self, dt: f64, stage: &mut Stage) -> VitrineResult<Vec<CarouselEvent>> {
        let mut events = Vec::new();
        if self.stopped {
            return Ok(events);
        }
        let dt = if finite_non_negative(dt) { dt } else { 0.0 };

        // Interval first: a timer armed by this tick's entrance completion
        // starts counting on the next tick.
        if let Some(mut elapsed) = self.timer {
            elapsed += dt;
            while elapsed >= self.config.interval_secs {
                elapsed -= self.config.interval_secs;
                if self.motion.is_some() {
                    tracing::trace!(item = self.item, "carousel tick during cross-fade ignored");
                    events.push(CarouselEvent::Skipped);
                } else if let Some((from, to)) = self.begin_advance(stage)? {
                    events.push(CarouselEvent::Advanced { from, to });
                }
            }
            self.timer = Some(elapsed);
        }

        let Some(motion) = self.motion.as_mut() else {
            return Ok(events);
        };
        let tick = motion.timeline_mut().tick(dt);
        motion.timeline_mut().apply(stage);
        if matches!(tick, TimelineTick::Completed(_)) {
            match self.motion.take() {
                Some(Motion::Entrance(_)) => {
                    tracing::debug!(item = self.item, "carousel entrance completed");
                    self.timer = Some(0.0);
                    events.push(CarouselEvent::Ready);
                }
                Some(Motion::CrossFade { from, .. }) => {
                    if let Some(el) = self.assets.get(from) {
                        stage.set_visible(*el, false);
                    }
                }
                None => {}
            }
        }
        Ok(events)
    }

    /// Advance immediately. Returns `None` while animating, before the
    /// entrance completed, or with fewer than two assets.
    pub fn advance_now(&mut self, stage: &mut Stage) -> VitrineResult<Option<(usize, usize)>> {
        if self.stopped || self.timer.is_none() || self.motion.is_some() {
            return Ok(None);
        }
        let moved = self.begin_advance(stage)?;
        if moved.is_some()
            && let Some(elapsed) = self.timer.as_mut()
        {
            *elapsed = 0.0;
        }
        Ok(moved)
    }

    /// Kill any running animation and the interval timer. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut motion) = self.motion.take() {
            motion.timeline_mut().kill();
        }
        self.timer = None;
        if !self.stopped {
            tracing::debug!(item = self.item, "carousel stopped");
        }
        self.stopped = true;
    }

    fn begin_advance(&mut self, stage: &mut Stage) -> VitrineResult<Option<(usize, usize)>> {
        if self.assets.len() < 2 {
            return Ok(None);
        }
        let from = self.active;
        let to = (from + 1) % self.assets.len();
        let (outgoing, incoming) = (self.assets[from], self.assets[to]);
        stage.set_visible(incoming, true);

        let mut timeline = TimelineBuilder::new()
            .tween(
                [outgoing],
                Tween::translate(Vec2::ZERO, -self.incoming_offset()).with_opacity(1.0, 0.0),
                self.config.crossfade_secs,
                self.config.ease,
                At::Start(0.0),
            )
            .tween(
                [incoming],
                Tween::translate(self.incoming_offset(), Vec2::ZERO).with_opacity(0.0, 1.0),
                self.config.crossfade_secs,
                self.config.ease,
                At::Start(0.0),
            )
            .build()?;
        timeline.play();
        timeline.apply(stage);
        self.active = to;
        self.motion = Some(Motion::CrossFade { timeline, from });
        tracing::debug!(item = self.item, from, to, "carousel advance");
        Ok(Some((from, to)))
    }

    // Assets slide in from the side opposite the one the item docked from.
    fn incoming_offset(&self) -> Vec2 {
        Vec2::new(-self.side.sign() * self.config.slide_px, 0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/carousel.rs"]
mod tests;
