use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::{
    animation::ease::Ease,
    animation::props::{ChannelValues, Tween},
    foundation::core::ElementId,
    foundation::error::{VitrineError, VitrineResult},
    foundation::math::{finite_non_negative, unit},
    scene::stage::Stage,
};

/// Label every timeline defines at time zero.
pub const START_LABEL: &str = "start";

/// Placement of a step or label on the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum At {
    /// Absolute seconds from the timeline start.
    Start(f64),
    /// Seconds relative to a previously declared label.
    Label {
        /// Label name.
        name: String,
        /// Offset in seconds (may be negative).
        offset: f64,
    },
    /// Relative to the end of the previous step.
    AfterPrevious(f64),
    /// Relative to the start of the previous step.
    WithPrevious(f64),
    /// Relative to the current end of the whole timeline.
    End(f64),
}

impl At {
    /// Relative to a named label.
    pub fn label(name: impl Into<String>, offset: f64) -> Self {
        Self::Label {
            name: name.into(),
            offset,
        }
    }

    /// Parse a position expression.
    ///
    /// Accepted forms: `1.5`, `start`, `start+=0.2`, `intro-=0.1`, `<`, `<0.1`,
    /// `>`, `>-0.2`, `+=0.3` (relative to the timeline end) and the empty
    /// string (timeline end).
    pub fn parse(expr: &str) -> VitrineResult<Self> {
        let s = expr.trim();
        if s.is_empty() {
            return Ok(Self::End(0.0));
        }
        if let Some(rest) = s.strip_prefix('<') {
            return Ok(Self::WithPrevious(parse_offset(rest, expr)?));
        }
        if let Some(rest) = s.strip_prefix('>') {
            return Ok(Self::AfterPrevious(parse_offset(rest, expr)?));
        }
        if let Some((sign, rest)) = split_relative(s) {
            let (name, amount) = (s[..rest].trim(), parse_number(&s[rest + 2..], expr)?);
            let offset = sign * amount;
            if name.is_empty() {
                return Ok(Self::End(offset));
            }
            return Ok(Self::label(name, offset));
        }
        if let Ok(v) = s.parse::<f64>() {
            if !v.is_finite() {
                return Err(VitrineError::timeline(format!(
                    "position '{expr}' must be finite"
                )));
            }
            return Ok(Self::Start(v));
        }
        Ok(Self::label(s, 0.0))
    }
}

fn split_relative(s: &str) -> Option<(f64, usize)> {
    if let Some(i) = s.find("+=") {
        return Some((1.0, i));
    }
    s.find("-=").map(|i| (-1.0, i))
}

fn parse_offset(rest: &str, expr: &str) -> VitrineResult<f64> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(0.0);
    }
    parse_number(rest, expr)
}

fn parse_number(s: &str, expr: &str) -> VitrineResult<f64> {
    let v = s
        .trim()
        .parse::<f64>()
        .map_err(|_| VitrineError::timeline(format!("invalid position '{expr}'")))?;
    if !v.is_finite() {
        return Err(VitrineError::timeline(format!(
            "position '{expr}' must be finite"
        )));
    }
    Ok(v)
}

/// One declarative interpolation over a set of elements.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineStep {
    /// Elements receiving the tween.
    pub targets: Vec<ElementId>,
    /// Animated channels.
    pub tween: Tween,
    /// Duration in seconds.
    pub duration: f64,
    /// Easing applied to local progress.
    pub ease: Ease,
    /// Start position.
    pub at: At,
}

/// Declaration consumed by [`compose`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEntry {
    /// Named time marker.
    Label {
        /// Label name.
        name: String,
        /// Label position.
        at: At,
    },
    /// Interpolation step.
    Step(TimelineStep),
}

/// Builder for [`Timeline`].
#[derive(Clone, Debug, Default)]
pub struct TimelineBuilder {
    entries: Vec<TimelineEntry>,
}

impl TimelineBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a label.
    pub fn label(mut self, name: impl Into<String>, at: At) -> Self {
        self.entries.push(TimelineEntry::Label {
            name: name.into(),
            at,
        });
        self
    }

    /// Append a step.
    pub fn step(mut self, step: TimelineStep) -> Self {
        self.entries.push(TimelineEntry::Step(step));
        self
    }

    /// Append a tween over `targets`.
    pub fn tween<I>(self, targets: I, tween: Tween, duration: f64, ease: Ease, at: At) -> Self
    where
        I: IntoIterator<Item = ElementId>,
    {
        self.step(TimelineStep {
            targets: targets.into_iter().collect(),
            tween,
            duration,
            ease,
            at,
        })
    }

    /// Number of declared entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve positions and build the timeline (paused at time zero).
    pub fn build(self) -> VitrineResult<Timeline> {
        compose(self.entries)
    }
}

/// Resolve step positions against labels and produce a paused [`Timeline`].
pub fn compose(entries: Vec<TimelineEntry>) -> VitrineResult<Timeline> {
    let mut labels = BTreeMap::from([(START_LABEL.to_owned(), 0.0)]);
    let mut steps = Vec::<ResolvedStep>::new();
    let mut prev_start = 0.0f64;
    let mut prev_end = 0.0f64;
    let mut end = 0.0f64;

    for entry in entries {
        match entry {
            TimelineEntry::Label { name, at } => {
                if name.trim().is_empty() {
                    return Err(VitrineError::timeline("label name must be non-empty"));
                }
                let t = resolve(&at, &labels, prev_start, prev_end, end)?;
                labels.insert(name, t.max(0.0));
            }
            TimelineEntry::Step(step) => {
                if step.targets.is_empty() {
                    return Err(VitrineError::timeline("step must target at least one element"));
                }
                if !finite_non_negative(step.duration) {
                    return Err(VitrineError::timeline(
                        "step duration must be finite and >= 0",
                    ));
                }
                if step.tween.is_empty() {
                    return Err(VitrineError::timeline("step must animate at least one channel"));
                }
                if !step.tween.is_finite() {
                    return Err(VitrineError::timeline("step values must be finite"));
                }
                let start = resolve(&step.at, &labels, prev_start, prev_end, end)?;
                if start < 0.0 {
                    return Err(VitrineError::timeline(format!(
                        "step resolves to negative start time {start}"
                    )));
                }
                prev_start = start;
                prev_end = start + step.duration;
                end = end.max(prev_end);
                steps.push(ResolvedStep {
                    targets: step.targets,
                    tween: step.tween,
                    start,
                    duration: step.duration,
                    ease: step.ease,
                });
            }
        }
    }

    // Later starts win when sampling; ties keep declaration order.
    steps.sort_by(|a, b| a.start.total_cmp(&b.start));

    Ok(Timeline {
        steps,
        labels,
        duration: end,
        position: 0.0,
        direction: Direction::Forward,
        status: TimelineStatus::Paused,
        on_complete: None,
    })
}

fn resolve(
    at: &At,
    labels: &BTreeMap<String, f64>,
    prev_start: f64,
    prev_end: f64,
    end: f64,
) -> VitrineResult<f64> {
    let t = match at {
        At::Start(o) => *o,
        At::Label { name, offset } => {
            let base = labels
                .get(name)
                .ok_or_else(|| VitrineError::timeline(format!("unknown label '{name}'")))?;
            base + offset
        }
        At::AfterPrevious(o) => prev_end + o,
        At::WithPrevious(o) => prev_start + o,
        At::End(o) => end + o,
    };
    if !t.is_finite() {
        return Err(VitrineError::timeline("position must be finite"));
    }
    Ok(t)
}

#[derive(Clone, Debug, PartialEq)]
struct ResolvedStep {
    targets: Vec<ElementId>,
    tween: Tween,
    start: f64,
    duration: f64,
    ease: Ease,
}

impl ResolvedStep {
    /// `None` before the step starts.
    fn local_progress(&self, t: f64, at_end: bool) -> Option<f64> {
        if t < self.start {
            return None;
        }
        if self.duration <= 0.0 {
            return Some(if t > self.start || at_end { 1.0 } else { 0.0 });
        }
        Some(unit((t - self.start) / self.duration))
    }
}

/// Playback direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Time increases toward the end.
    Forward,
    /// Time decreases toward zero.
    Backward,
}

/// Lifecycle of a [`Timeline`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineStatus {
    /// Built or paused; ticks do nothing.
    Paused,
    /// Advancing on every tick.
    Playing,
    /// Reached an end in the given direction.
    Completed(Direction),
    /// Cancelled; no further ticks or callbacks.
    Killed,
}

/// Result of [`Timeline::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineTick {
    /// Not playing; nothing happened.
    Idle,
    /// Advanced and still playing.
    Running,
    /// Reached the end of playback during this tick.
    Completed(Direction),
}

type CompleteFn = Box<dyn FnMut(Direction)>;

/// Cancelable, scrubbable handle over a composed step list.
///
/// Sampling is a pure function of timeline time: for every element channel
/// the latest-started step wins, and before any step on that channel has
/// started the first step's `from` value is rendered. Playing backward
/// therefore retraces the forward motion exactly.
pub struct Timeline {
    steps: Vec<ResolvedStep>,
    labels: BTreeMap<String, f64>,
    duration: f64,
    position: f64, // normalized 0..1
    direction: Direction,
    status: TimelineStatus,
    on_complete: Option<CompleteFn>,
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("steps", &self.steps.len())
            .field("labels", &self.labels)
            .field("duration", &self.duration)
            .field("position", &self.position)
            .field("direction", &self.direction)
            .field("status", &self.status)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Timeline {
    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Current time in seconds.
    pub fn time(&self) -> f64 {
        self.position * self.duration
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.position
    }

    /// Playback direction of the last `play`/`reverse`.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current status.
    pub fn status(&self) -> TimelineStatus {
        self.status
    }

    /// True while ticks advance time.
    pub fn is_active(&self) -> bool {
        self.status == TimelineStatus::Playing
    }

    /// True once [`Timeline::kill`] was called.
    pub fn is_killed(&self) -> bool {
        self.status == TimelineStatus::Killed
    }

    /// Time of a label, if declared.
    pub fn label_time(&self, name: &str) -> Option<f64> {
        self.labels.get(name).copied()
    }

    /// Every element any step targets.
    pub fn targets(&self) -> BTreeSet<ElementId> {
        self.steps
            .iter()
            .flat_map(|s| s.targets.iter().copied())
            .collect()
    }

    /// Register the completion callback. It fires at most once per completed
    /// playback and never after [`Timeline::kill`].
    pub fn on_complete(&mut self, f: impl FnMut(Direction) + 'static) {
        self.on_complete = Some(Box::new(f));
    }

    /// Play toward the end from the current position.
    pub fn play(&mut self) {
        if self.is_killed() {
            return;
        }
        self.direction = Direction::Forward;
        self.status = TimelineStatus::Playing;
    }

    /// Play toward zero from the current position. A timeline that has not
    /// moved yet starts from its end.
    pub fn reverse(&mut self) {
        if self.is_killed() {
            return;
        }
        if self.status == TimelineStatus::Paused && self.position <= 0.0 {
            self.position = 1.0;
        }
        self.direction = Direction::Backward;
        self.status = TimelineStatus::Playing;
    }

    /// Stop immediately. Safe at any point, including after completion.
    pub fn kill(&mut self) {
        self.status = TimelineStatus::Killed;
        self.on_complete = None;
    }

    /// Jump to normalized `progress` without changing the play state.
    pub fn seek(&mut self, progress: f64) {
        if self.is_killed() {
            return;
        }
        self.position = unit(progress);
    }

    /// Advance by `dt` seconds in the current direction.
    pub fn tick(&mut self, dt: f64) -> TimelineTick {
        if self.status != TimelineStatus::Playing {
            return TimelineTick::Idle;
        }
        let dt = if finite_non_negative(dt) { dt } else { 0.0 };
        let step = if self.duration > 0.0 {
            dt / self.duration
        } else {
            1.0
        };

        let done = match self.direction {
            Direction::Forward => {
                self.position = (self.position + step).min(1.0);
                self.position >= 1.0
            }
            Direction::Backward => {
                self.position = (self.position - step).max(0.0);
                self.position <= 0.0
            }
        };
        if !done {
            return TimelineTick::Running;
        }

        let dir = self.direction;
        self.status = TimelineStatus::Completed(dir);
        if let Some(cb) = self.on_complete.as_mut() {
            cb(dir);
        }
        TimelineTick::Completed(dir)
    }

    /// Sample every target at time `t` (seconds).
    pub fn sample_at(&self, t: f64) -> BTreeMap<ElementId, ChannelValues> {
        self.sample_with(t, self.duration > 0.0 && t >= self.duration)
    }

    /// Sample at the current position.
    pub fn sample(&self) -> BTreeMap<ElementId, ChannelValues> {
        self.sample_with(self.time(), self.position >= 1.0)
    }

    fn sample_with(&self, t: f64, at_end: bool) -> BTreeMap<ElementId, ChannelValues> {
        let mut out = BTreeMap::<ElementId, ChannelValues>::new();
        for step in &self.steps {
            let local = step.local_progress(t, at_end);
            let eased = local.map(|p| step.ease.apply(p));
            for target in &step.targets {
                let values = out.entry(*target).or_default();
                overlay(values, &step.tween, eased);
            }
        }
        out
    }

    /// Write the current sample into `stage`.
    pub fn apply(&self, stage: &mut Stage) {
        for (el, values) in self.sample() {
            let props = values.apply_to(stage.props(el));
            stage.set_props(el, props);
        }
    }
}

fn overlay(values: &mut ChannelValues, tween: &Tween, eased: Option<f64>) {
    match eased {
        Some(p) => {
            if let Some(s) = &tween.translate {
                values.translate = Some(s.at(p));
            }
            if let Some(s) = &tween.scale {
                values.scale = Some(s.at(p));
            }
            if let Some(s) = &tween.rotation_deg {
                values.rotation_deg = Some(s.at(p));
            }
            if let Some(s) = &tween.opacity {
                values.opacity = Some(s.at(p));
            }
        }
        None => {
            if let Some(s) = &tween.translate {
                values.translate.get_or_insert(s.from);
            }
            if let Some(s) = &tween.scale {
                values.scale.get_or_insert(s.from);
            }
            if let Some(s) = &tween.rotation_deg {
                values.rotation_deg.get_or_insert(s.from);
            }
            if let Some(s) = &tween.opacity {
                values.opacity.get_or_insert(s.from);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
