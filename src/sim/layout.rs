use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::core::{ElementId, Rect, Size, Viewport},
    layout::snapshot::LayoutProbe,
    scene::stage::Stage,
};

/// In-memory [`LayoutProbe`] with declared layout boxes.
///
/// Visibility is only picked up on [`SimLayout::commit`]: an element hidden
/// at the last commit measures as a zero-size box at its origin, the way a
/// `display: none` element does until the browser lays it out again.
#[derive(Clone, Debug)]
pub struct SimLayout {
    viewport: Viewport,
    rects: BTreeMap<ElementId, Rect>,
    shown: BTreeSet<ElementId>,
    epoch: u64,
}

impl SimLayout {
    /// Empty layout for `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: BTreeMap::new(),
            shown: BTreeSet::new(),
            epoch: 0,
        }
    }

    /// Mount `el` with layout box `rect`, shown.
    pub fn insert(&mut self, el: ElementId, rect: Rect) {
        self.rects.insert(el, rect);
        self.shown.insert(el);
    }

    /// Change the layout box of a mounted element.
    pub fn set_rect(&mut self, el: ElementId, rect: Rect) {
        if let Some(r) = self.rects.get_mut(&el) {
            *r = rect;
        }
    }

    /// Unmount `el`.
    pub fn remove(&mut self, el: ElementId) {
        self.rects.remove(&el);
        self.shown.remove(&el);
    }

    /// Unmount everything.
    pub fn clear(&mut self) {
        self.rects.clear();
        self.shown.clear();
    }

    /// Replace the viewport; layout boxes are left to the caller.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Scale every layout box, as a fluid layout does on resize.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        for r in self.rects.values_mut() {
            *r = Rect::new(r.x0 * sx, r.y0 * sy, r.x1 * sx, r.y1 * sy);
        }
    }

    /// Commit a new layout pass using the stage's visibility flags.
    pub fn commit(&mut self, stage: &Stage) {
        for el in self.rects.keys() {
            if stage.is_visible(*el) {
                self.shown.insert(*el);
            } else {
                self.shown.remove(el);
            }
        }
        self.epoch += 1;
    }
}

impl LayoutProbe for SimLayout {
    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        let r = self.rects.get(&el)?;
        if self.shown.contains(&el) {
            Some(*r)
        } else {
            Some(Rect::from_origin_size(r.origin(), Size::ZERO))
        }
    }

    fn layout_epoch(&self) -> u64 {
        self.epoch
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/layout.rs"]
mod tests;
