use crate::{
    foundation::core::{ElementId, Point, Rect, Side, Vec2, Viewport},
    foundation::error::{VitrineError, VitrineResult},
};

/// Smallest extent treated as "laid out".
const MIN_EXTENT: f64 = 0.5;

/// Read-only view of the host's committed layout.
///
/// Rectangles are untransformed layout boxes in viewport coordinates.
pub trait LayoutProbe {
    /// Layout box of `el`, or `None` if the element is not mounted.
    fn bounding_rect(&self, el: ElementId) -> Option<Rect>;

    /// Counter bumped every time the host commits a new layout (one per
    /// rendered frame).
    fn layout_epoch(&self) -> u64;

    /// Current viewport.
    fn viewport(&self) -> Viewport;

    /// Whether `el` is still mounted.
    fn is_live(&self, el: ElementId) -> bool {
        self.bounding_rect(el).is_some()
    }
}

/// Rectangle of an element captured at one instant. Never reuse across frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutSnapshot {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl LayoutSnapshot {
    /// Build from explicit components.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from a `kurbo` rectangle.
    pub fn from_rect(r: Rect) -> Self {
        let r = r.abs();
        Self::new(r.x0, r.y0, r.width(), r.height())
    }

    /// As a `kurbo` rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Center point.
    pub fn center(self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// True for zero-size or non-finite rectangles.
    pub fn is_degenerate(self) -> bool {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        !finite || self.width < MIN_EXTENT || self.height < MIN_EXTENT
    }

    /// Which half of the viewport the center falls in.
    pub fn side_in(self, viewport: Viewport) -> Side {
        if self.center().x < viewport.center_x() {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Center-to-center offset toward `dest`.
    pub fn offset_to(self, dest: LayoutSnapshot) -> Vec2 {
        dest.center() - self.center()
    }

    /// Uniform scale that fits `self` inside `dest`.
    pub fn fit_scale_to(self, dest: LayoutSnapshot) -> f64 {
        if self.is_degenerate() || dest.is_degenerate() {
            return 1.0;
        }
        (dest.width / self.width).min(dest.height / self.height)
    }
}

/// Measure `el` right now.
pub fn measure(probe: &dyn LayoutProbe, el: ElementId) -> VitrineResult<LayoutSnapshot> {
    probe
        .bounding_rect(el)
        .map(LayoutSnapshot::from_rect)
        .ok_or_else(|| VitrineError::measurement(format!("element {el} is not mounted")))
}

/// Measure `el` and require a laid-out (non-zero) rectangle.
pub fn measure_sized(probe: &dyn LayoutProbe, el: ElementId) -> VitrineResult<LayoutSnapshot> {
    let snap = measure(probe, el)?;
    if snap.is_degenerate() {
        return Err(VitrineError::measurement(format!(
            "element {el} has a zero-size rectangle ({}x{})",
            snap.width, snap.height
        )));
    }
    Ok(snap)
}

/// A measurement that may only be taken after the next committed layout.
///
/// Used for elements that were just flipped into the flow: their rectangle
/// is meaningless until the host has laid them out at least once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeferredMeasure {
    element: ElementId,
    requested_epoch: u64,
}

impl DeferredMeasure {
    /// Record the request against the probe's current epoch.
    pub fn request(probe: &dyn LayoutProbe, element: ElementId) -> Self {
        Self {
            element,
            requested_epoch: probe.layout_epoch(),
        }
    }

    /// Element to measure.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Epoch the request was made in.
    pub fn requested_epoch(&self) -> u64 {
        self.requested_epoch
    }

    /// True once a layout newer than the request has been committed.
    pub fn is_ready(&self, probe: &dyn LayoutProbe) -> bool {
        probe.layout_epoch() > self.requested_epoch
    }

    /// `Ok(None)` while waiting; otherwise the sized measurement.
    pub fn poll(&self, probe: &dyn LayoutProbe) -> VitrineResult<Option<LayoutSnapshot>> {
        if !self.is_ready(probe) {
            return Ok(None);
        }
        measure_sized(probe, self.element).map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/snapshot.rs"]
mod tests;
