use std::collections::BTreeMap;

use crate::{
    config::model::ShowcaseConfig,
    engine::carousel::CarouselState,
    engine::state::{EngineEvent, ViewState},
    foundation::core::{ItemId, Viewport},
    foundation::error::{VitrineError, VitrineResult},
    layout::snapshot::{LayoutProbe, LayoutSnapshot},
    presentation::item::Item,
    presentation::showcase::{Input, Showcase},
    scene::elements::ElementMap,
    scene::stage::Stage,
    sim::layout::SimLayout,
};

/// Declared layout boxes of one item.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemLayout {
    /// Overview card.
    pub overview: LayoutSnapshot,
    /// Dock inside the detail panel.
    pub dock: LayoutSnapshot,
    /// Detail panel; the whole viewport when omitted.
    #[serde(default)]
    pub panel: Option<LayoutSnapshot>,
    /// Carousel asset box; the dock when omitted.
    #[serde(default)]
    pub assets: Option<LayoutSnapshot>,
}

impl ItemLayout {
    /// Default grid: overview cards side by side in the lower half, the dock
    /// on the right of a full-viewport panel.
    pub fn grid(index: usize, count: usize, viewport: Viewport) -> Self {
        let (w, h) = (viewport.width, viewport.height);
        let cell = w / count.max(1) as f64;
        let x = cell * index as f64;
        Self {
            overview: LayoutSnapshot::new(x + cell * 0.1, h * 0.55, cell * 0.8, h * 0.4),
            dock: LayoutSnapshot::new(w * 0.5, h * 0.15, w * 0.4, h * 0.7),
            panel: None,
            assets: None,
        }
    }
}

/// One timed input.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptStep {
    /// Seconds since the start.
    pub at: f64,
    /// Input delivered before the frame at `at`.
    pub input: Input,
}

/// A scripted session against a simulated layout.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    /// Showcase configuration.
    #[serde(default)]
    pub config: ShowcaseConfig,
    /// Initial viewport.
    pub viewport: Viewport,
    /// Document offset of the pinned region.
    #[serde(default)]
    pub region_top: f64,
    /// Items in display order.
    pub items: Vec<Item>,
    /// Layout per item; missing items use [`ItemLayout::grid`].
    #[serde(default)]
    pub layout: BTreeMap<ItemId, ItemLayout>,
    /// Timed inputs.
    #[serde(default)]
    pub script: Vec<ScriptStep>,
    /// Unmount the showcase at this time.
    #[serde(default)]
    pub unmount_at: Option<f64>,
    /// Total simulated time; defaults to three seconds past the last input.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Scenario {
    /// Scenario with grid layout and no script.
    pub fn new(config: ShowcaseConfig, viewport: Viewport, items: Vec<Item>) -> Self {
        Self {
            config,
            viewport,
            region_top: 0.0,
            items,
            layout: BTreeMap::new(),
            script: Vec::new(),
            unmount_at: None,
            duration: None,
        }
    }

    /// Append a timed input.
    pub fn at(mut self, at: f64, input: Input) -> Self {
        self.script.push(ScriptStep { at, input });
        self
    }

    /// Parse JSON and validate.
    pub fn from_json_str(s: &str) -> VitrineResult<Self> {
        let scenario: Self = serde_json::from_str(s)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check timings and layout references.
    pub fn validate(&self) -> VitrineResult<()> {
        self.viewport.validate()?;
        self.config.validate_for(self.items.len())?;
        if !self.region_top.is_finite() {
            return Err(VitrineError::validation("region_top must be finite"));
        }
        for step in &self.script {
            if !step.at.is_finite() || step.at < 0.0 {
                return Err(VitrineError::validation(format!(
                    "script time {} must be finite and >= 0",
                    step.at
                )));
            }
            if let Input::Resize {
                viewport,
                region_top,
            } = step.input
            {
                viewport.validate().map_err(|err| {
                    VitrineError::validation(format!("resize at {}: {err}", step.at))
                })?;
                if !region_top.is_finite() {
                    return Err(VitrineError::validation(format!(
                        "resize at {}: region_top must be finite",
                        step.at
                    )));
                }
            }
        }
        for t in [self.unmount_at, self.duration].into_iter().flatten() {
            if !t.is_finite() || t < 0.0 {
                return Err(VitrineError::validation(
                    "unmount_at and duration must be finite and >= 0",
                ));
            }
        }
        if let Some(id) = self
            .layout
            .keys()
            .find(|id| !self.items.iter().any(|item| &item.id == *id))
        {
            return Err(VitrineError::validation(format!(
                "layout given for unknown item '{id}'"
            )));
        }
        Ok(())
    }

    /// Simulated time span.
    pub fn end_time(&self) -> f64 {
        self.duration.unwrap_or_else(|| {
            let last = self
                .script
                .iter()
                .map(|s| s.at)
                .chain(self.unmount_at)
                .fold(0.0, f64::max);
            last + 3.0
        })
    }

    fn layout_of(&self, index: usize, item: &Item) -> ItemLayout {
        self.layout
            .get(&item.id)
            .copied()
            .unwrap_or_else(|| ItemLayout::grid(index, self.items.len(), self.viewport))
    }
}

/// One traced event.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TraceEntry {
    /// Simulated time.
    pub time: f64,
    /// Frame counter.
    pub frame: u64,
    /// The event.
    #[serde(flatten)]
    pub event: EngineEvent,
}

/// Result of a simulated session.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Trace {
    /// Every event in order.
    pub entries: Vec<TraceEntry>,
    /// Frames rendered.
    pub frames: u64,
    /// View state at the end.
    pub final_state: ViewState,
    /// Carousel at the end.
    pub carousel: Option<CarouselState>,
}

impl Trace {
    /// Events without timestamps.
    pub fn events(&self) -> impl Iterator<Item = &EngineEvent> + '_ {
        self.entries.iter().map(|e| &e.event)
    }

    /// Initial state followed by every state entered.
    pub fn state_path(&self) -> Vec<ViewState> {
        std::iter::once(ViewState::Overview)
            .chain(self.events().filter_map(|e| match e {
                EngineEvent::StateChanged { to, .. } => Some(*to),
                _ => None,
            }))
            .collect()
    }

    /// Time of the first event matching `f`.
    pub fn first_time(&self, f: impl Fn(&EngineEvent) -> bool) -> Option<f64> {
        self.entries.iter().find(|e| f(&e.event)).map(|e| e.time)
    }
}

/// Showcase wired to a [`SimLayout`] and a [`Stage`], committing a layout
/// pass after every frame.
#[derive(Debug)]
pub struct Harness {
    showcase: Showcase,
    stage: Stage,
    layout: SimLayout,
    time: f64,
    frame: u64,
    trace: Vec<TraceEntry>,
}

impl Harness {
    /// Mount the scenario's items with their declared layout.
    pub fn new(scenario: &Scenario) -> VitrineResult<Self> {
        let elements = ElementMap::allocate(&scenario.items);
        let slots = elements.resolve(&scenario.items)?;
        let mut layout = SimLayout::new(scenario.viewport);
        let full = LayoutSnapshot::new(0.0, 0.0, scenario.viewport.width, scenario.viewport.height);
        for (index, (item, s)) in scenario.items.iter().zip(&slots).enumerate() {
            let l = scenario.layout_of(index, item);
            layout.insert(s.overview, l.overview.rect());
            layout.insert(s.panel, l.panel.unwrap_or(full).rect());
            layout.insert(s.dock, l.dock.rect());
            for el in &s.assets {
                layout.insert(*el, l.assets.unwrap_or(l.dock).rect());
            }
        }

        let mut stage = Stage::new();
        let showcase = Showcase::mount(
            scenario.items.clone(),
            &elements,
            scenario.config.clone(),
            scenario.viewport,
            scenario.region_top,
            &mut stage,
        )?;
        layout.commit(&stage);
        Ok(Self {
            showcase,
            stage,
            layout,
            time: 0.0,
            frame: 0,
            trace: Vec::new(),
        })
    }

    /// The showcase.
    pub fn showcase(&self) -> &Showcase {
        &self.showcase
    }

    /// Current styles.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The simulated layout, for tests that move or remove elements.
    pub fn layout_mut(&mut self) -> &mut SimLayout {
        &mut self.layout
    }

    /// Simulated time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Deliver `input` and record its events.
    pub fn input(&mut self, input: Input) -> Vec<EngineEvent> {
        if let Input::Resize { viewport, .. } = input
            && viewport.validate().is_ok()
        {
            let old = self.layout.viewport();
            self.layout
                .scale(viewport.width / old.width, viewport.height / old.height);
            self.layout.set_viewport(viewport);
        }
        let events = self.showcase.handle(input, &mut self.stage, &self.layout);
        self.trace
            .extend(events.iter().cloned().map(|event| TraceEntry {
                time: self.time,
                frame: self.frame,
                event,
            }));
        events
    }

    /// Render one frame of `dt` seconds and commit layout.
    pub fn step(&mut self, dt: f64) -> Vec<EngineEvent> {
        let events = self.input(Input::Frame(dt));
        self.layout.commit(&self.stage);
        self.time += dt;
        self.frame += 1;
        events
    }

    /// Render frames at `fps` for `secs` seconds.
    pub fn run_for(&mut self, secs: f64, fps: u32) {
        let dt = 1.0 / f64::from(fps.max(1));
        for _ in 0..(secs / dt).round() as u64 {
            self.step(dt);
        }
    }

    /// Unmount the showcase and every element.
    pub fn unmount(&mut self) {
        self.showcase.unmount();
        self.layout.clear();
    }

    /// Finish and return the trace.
    pub fn into_trace(self) -> Trace {
        Trace {
            entries: self.trace,
            frames: self.frame,
            final_state: self.showcase.state(),
            carousel: self.showcase.carousel_state(),
        }
    }
}

/// Play `scenario` at `fps` frames per second.
#[tracing::instrument(skip(scenario), fields(items = scenario.items.len(), inputs = scenario.script.len()))]
pub fn run_scenario(scenario: &Scenario, fps: u32) -> VitrineResult<Trace> {
    if fps == 0 {
        return Err(VitrineError::validation("fps must be > 0"));
    }
    scenario.validate()?;
    let mut harness = Harness::new(scenario)?;
    let dt = 1.0 / f64::from(fps);
    let half_frame = dt / 2.0;

    let mut script: Vec<&ScriptStep> = scenario.script.iter().collect();
    script.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut script = script.into_iter().peekable();
    let mut unmount_at = scenario.unmount_at;

    let frames = (scenario.end_time() * f64::from(fps)).ceil() as u64;
    for _ in 0..frames {
        let now = harness.time();
        while let Some(step) = script.next_if(|s| s.at <= now + half_frame) {
            harness.input(step.input);
        }
        if unmount_at.is_some_and(|t| t <= now + half_frame) {
            unmount_at = None;
            harness.unmount();
        }
        harness.step(dt);
    }
    let trace = harness.into_trace();
    tracing::debug!(
        frames = trace.frames,
        events = trace.entries.len(),
        final_state = %trace.final_state,
        "scenario finished"
    );
    Ok(trace)
}

#[cfg(test)]
#[path = "../../tests/unit/sim/scenario.rs"]
mod tests;
