use crate::{
    foundation::core::Viewport,
    foundation::error::{VitrineError, VitrineResult},
    foundation::math::{finite_non_negative, unit},
};

/// Pinned-region settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Scroll distance reserved while pinned, in viewport heights.
    pub size_in_viewport_heights: f64,
    /// How far past the region top (in viewport heights) the enter edge sits.
    pub enter_offset_vh: f64,
    /// Shift of the leave edge relative to the end of the reserved distance.
    pub leave_offset_vh: f64,
    /// Quiet period before a resize is applied.
    pub resize_debounce_secs: f64,
    /// Progress marks in `[0, 1]` reported as [`ScrollEvent::Threshold`].
    pub thresholds: Vec<f64>,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            size_in_viewport_heights: 3.0,
            enter_offset_vh: 0.5,
            leave_offset_vh: 0.0,
            resize_debounce_secs: 0.2,
            thresholds: Vec::new(),
        }
    }
}

impl PinConfig {
    /// Check numeric ranges.
    pub fn validate(&self) -> VitrineResult<()> {
        if !self.size_in_viewport_heights.is_finite() || self.size_in_viewport_heights <= 0.0 {
            return Err(VitrineError::validation(
                "pin size_in_viewport_heights must be finite and > 0",
            ));
        }
        if !finite_non_negative(self.enter_offset_vh) {
            return Err(VitrineError::validation(
                "pin enter_offset_vh must be finite and >= 0",
            ));
        }
        if !self.leave_offset_vh.is_finite() {
            return Err(VitrineError::validation("pin leave_offset_vh must be finite"));
        }
        if !finite_non_negative(self.resize_debounce_secs) {
            return Err(VitrineError::validation(
                "pin resize_debounce_secs must be finite and >= 0",
            ));
        }
        if self
            .thresholds
            .iter()
            .any(|t| !t.is_finite() || !(0.0..=1.0).contains(t))
        {
            return Err(VitrineError::validation("pin thresholds must lie in [0, 1]"));
        }
        Ok(())
    }
}

/// Resolved scroll offsets of a pinned region, in document pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PinGeometry {
    /// Scroll offset at which the region top meets the viewport top.
    pub start: f64,
    /// Scroll offset at which the reserved distance is used up.
    pub end: f64,
    /// Reserved distance (`end - start`).
    pub distance: f64,
    /// Enter / leave-back edge.
    pub enter_at: f64,
    /// Leave / enter-back edge.
    pub leave_at: f64,
}

impl PinGeometry {
    fn compute(region_top: f64, viewport: Viewport, config: &PinConfig) -> Self {
        let distance = config.size_in_viewport_heights * viewport.height;
        let start = region_top;
        let end = start + distance;
        let enter_at = (start + config.enter_offset_vh * viewport.height).min(end);
        let leave_at = (end + config.leave_offset_vh * viewport.height).max(enter_at);
        Self {
            start,
            end,
            distance,
            enter_at,
            leave_at,
        }
    }
}

/// How the region is currently positioned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinState {
    /// Normal document flow (before the region, or unpinned).
    Flow,
    /// Held fixed at the viewport top.
    Fixed,
    /// Past the reserved distance; scrolls away with the page.
    Released,
}

/// Scroll direction of a threshold crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    /// Scrolling toward the end of the document.
    Down,
    /// Scrolling toward the top.
    Up,
}

/// Output of [`PinnedRegion::update`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollEvent {
    /// Crossed the enter edge scrolling down.
    Enter,
    /// Crossed the leave edge scrolling up.
    EnterBack,
    /// Crossed the leave edge scrolling down.
    Leave,
    /// Crossed the enter edge scrolling up.
    LeaveBack,
    /// Crossed a configured progress mark.
    Threshold {
        /// Index into [`PinConfig::thresholds`].
        index: usize,
        /// Crossing direction.
        direction: ScrollDirection,
    },
    /// Normalized progress through the reserved distance changed.
    Progress(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Zone {
    Before,
    Active,
    After,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingResize {
    viewport: Viewport,
    region_top: f64,
    due: f64,
}

/// Scroll region controller: maps scroll offsets onto a pinned region.
#[derive(Clone, Debug)]
pub struct PinnedRegion {
    config: PinConfig,
    region_top: f64,
    viewport: Viewport,
    geometry: PinGeometry,
    pinned: bool,
    zone: Option<Zone>,
    last_scroll: Option<f64>,
    last_progress: Option<f64>,
    pending_resize: Option<PendingResize>,
}

impl PinnedRegion {
    /// Reserve scroll distance for a region whose top sits at `region_top`.
    pub fn pin(region_top: f64, viewport: Viewport, config: PinConfig) -> VitrineResult<Self> {
        config.validate()?;
        viewport.validate()?;
        if !region_top.is_finite() {
            return Err(VitrineError::validation("region_top must be finite"));
        }
        let geometry = PinGeometry::compute(region_top, viewport, &config);
        tracing::debug!(?geometry, "pinned scroll region");
        Ok(Self {
            config,
            region_top,
            viewport,
            geometry,
            pinned: true,
            zone: None,
            last_scroll: None,
            last_progress: None,
            pending_resize: None,
        })
    }

    /// Current geometry.
    pub fn geometry(&self) -> PinGeometry {
        self.geometry
    }

    /// Configuration in use.
    pub fn config(&self) -> &PinConfig {
        &self.config
    }

    /// Viewport the geometry was computed for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the region still holds scroll distance.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Progress for an arbitrary scroll offset.
    pub fn progress_at(&self, scroll_y: f64) -> f64 {
        let g = self.geometry;
        if g.distance <= 0.0 {
            return if scroll_y >= g.end { 1.0 } else { 0.0 };
        }
        unit((scroll_y - g.start) / g.distance)
    }

    /// Progress at the last update (0 before any update).
    pub fn progress(&self) -> f64 {
        self.last_progress.unwrap_or(0.0)
    }

    /// Whether the last update fell between the enter and leave edges.
    pub fn is_active(&self) -> bool {
        self.zone == Some(Zone::Active)
    }

    /// Last scroll offset fed to [`PinnedRegion::update`].
    pub fn last_scroll(&self) -> Option<f64> {
        self.last_scroll
    }

    /// Positioning of the region at the last update.
    pub fn pin_state(&self) -> PinState {
        if !self.pinned {
            return PinState::Flow;
        }
        match self.last_scroll {
            Some(y) if y >= self.geometry.end => PinState::Released,
            Some(y) if y >= self.geometry.start => PinState::Fixed,
            _ => PinState::Flow,
        }
    }

    /// Extra document height inserted below the region while pinned.
    pub fn spacer_height(&self) -> f64 {
        if self.pinned { self.geometry.distance } else { 0.0 }
    }

    /// Visual offset of the region top from the viewport top.
    pub fn region_offset(&self) -> f64 {
        let y = self.last_scroll.unwrap_or(0.0);
        match self.pin_state() {
            PinState::Fixed => 0.0,
            PinState::Released => self.geometry.end - y,
            PinState::Flow => self.region_top - y,
        }
    }

    /// Feed a new scroll offset and collect the resulting events.
    pub fn update(&mut self, scroll_y: f64) -> Vec<ScrollEvent> {
        if !self.pinned || !scroll_y.is_finite() {
            return Vec::new();
        }

        let zone = self.zone_for(scroll_y);
        let progress = self.progress_at(scroll_y);
        let events = self.crossings(zone, progress);

        self.zone = Some(zone);
        self.last_scroll = Some(scroll_y);
        self.last_progress = Some(progress);
        if !events.is_empty() {
            tracing::trace!(scroll_y, ?events, "scroll region update");
        }
        events
    }

    /// Record a viewport change. Applied by [`PinnedRegion::poll`] once the
    /// debounce window has passed.
    pub fn resize(&mut self, viewport: Viewport, region_top: f64, now: f64) {
        if viewport.validate().is_err() || !region_top.is_finite() {
            tracing::warn!(?viewport, region_top, "ignoring invalid resize");
            return;
        }
        self.pending_resize = Some(PendingResize {
            viewport,
            region_top,
            due: now + self.config.resize_debounce_secs,
        });
    }

    /// Whether a resize is waiting to be applied.
    pub fn has_pending_resize(&self) -> bool {
        self.pending_resize.is_some()
    }

    /// Apply a pending resize if it is due and `settled` (no transition in
    /// flight). Returns `None` while nothing was applied, otherwise the edges,
    /// threshold crossings and progress implied by the new geometry at the
    /// last scroll offset.
    pub fn poll(&mut self, now: f64, settled: bool) -> Option<Vec<ScrollEvent>> {
        let pending = self.pending_resize?;
        if now < pending.due || !settled {
            return None;
        }
        self.pending_resize = None;
        self.viewport = pending.viewport;
        self.region_top = pending.region_top;
        self.geometry = PinGeometry::compute(self.region_top, self.viewport, &self.config);
        let mut events = Vec::new();
        if let Some(y) = self.last_scroll {
            let zone = self.zone_for(y);
            let progress = self.progress_at(y);
            events = self.crossings(zone, progress);
            self.zone = Some(zone);
            self.last_progress = Some(progress);
        }
        tracing::debug!(geometry = ?self.geometry, ?events, "recomputed pinned region after resize");
        Some(events)
    }

    /// Release the reserved distance and return to normal flow.
    pub fn unpin(&mut self) {
        if !self.pinned {
            return;
        }
        self.pinned = false;
        self.pending_resize = None;
        self.zone = None;
        tracing::debug!("unpinned scroll region");
    }

    // Entering edges lead and leaving edges trail, so a consumer that acts on
    // the last event sees the leave after any threshold crossings.
    fn crossings(&self, zone: Zone, progress: f64) -> Vec<ScrollEvent> {
        let mut events = Vec::new();
        let mut trailing = Vec::new();
        match (self.zone, zone) {
            (None | Some(Zone::Before), Zone::Active) => events.push(ScrollEvent::Enter),
            (None | Some(Zone::Before), Zone::After) => {
                events.push(ScrollEvent::Enter);
                trailing.push(ScrollEvent::Leave);
            }
            (Some(Zone::Active), Zone::Before) => trailing.push(ScrollEvent::LeaveBack),
            (Some(Zone::Active), Zone::After) => trailing.push(ScrollEvent::Leave),
            (Some(Zone::After), Zone::Active) => events.push(ScrollEvent::EnterBack),
            (Some(Zone::After), Zone::Before) => {
                events.push(ScrollEvent::EnterBack);
                trailing.push(ScrollEvent::LeaveBack);
            }
            _ => {}
        }

        if let Some(prev) = self.last_progress {
            for (index, mark) in self.config.thresholds.iter().enumerate() {
                if prev < *mark && progress >= *mark {
                    events.push(ScrollEvent::Threshold {
                        index,
                        direction: ScrollDirection::Down,
                    });
                } else if prev >= *mark && progress < *mark {
                    events.push(ScrollEvent::Threshold {
                        index,
                        direction: ScrollDirection::Up,
                    });
                }
            }
        }
        if self.last_progress != Some(progress) {
            events.push(ScrollEvent::Progress(progress));
        }
        events.append(&mut trailing);
        events
    }

    fn zone_for(&self, scroll_y: f64) -> Zone {
        if scroll_y < self.geometry.enter_at {
            Zone::Before
        } else if scroll_y < self.geometry.leave_at {
            Zone::Active
        } else {
            Zone::After
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/region.rs"]
mod tests;
