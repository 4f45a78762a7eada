use std::collections::BTreeMap;

use crate::{animation::props::VisualProps, foundation::core::ElementId};

/// Render-relevant style of one element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementStyle {
    /// Animated transform and opacity.
    pub props: VisualProps,
    /// Whether the element participates in layout (`display` other than `none`).
    pub visible: bool,
    /// Whether the element receives pointer input.
    pub interactive: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            props: VisualProps::IDENTITY,
            visible: true,
            interactive: true,
        }
    }
}

/// Presentation-owned style table the engine writes into.
///
/// The stage holds no layout; positions come from a
/// [`LayoutProbe`](crate::LayoutProbe). Elements never written read back as
/// [`ElementStyle::default`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stage {
    styles: BTreeMap<ElementId, ElementStyle>,
}

impl Stage {
    /// Empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current style of `el`.
    pub fn style(&self, el: ElementId) -> ElementStyle {
        self.styles.get(&el).copied().unwrap_or_default()
    }

    /// Current animated props of `el`.
    pub fn props(&self, el: ElementId) -> VisualProps {
        self.style(el).props
    }

    /// Replace the style of `el`.
    pub fn set_style(&mut self, el: ElementId, style: ElementStyle) {
        self.styles.insert(el, style);
    }

    /// Replace the animated props of `el`.
    pub fn set_props(&mut self, el: ElementId, props: VisualProps) {
        self.entry(el).props = props;
    }

    /// Set only the opacity of `el`.
    pub fn set_opacity(&mut self, el: ElementId, opacity: f64) {
        self.entry(el).props.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Toggle layout participation.
    pub fn set_visible(&mut self, el: ElementId, visible: bool) {
        self.entry(el).visible = visible;
    }

    /// Toggle hit-testing.
    pub fn set_interactive(&mut self, el: ElementId, interactive: bool) {
        self.entry(el).interactive = interactive;
    }

    /// Whether `el` participates in layout.
    pub fn is_visible(&self, el: ElementId) -> bool {
        self.style(el).visible
    }

    /// Visible and not fully transparent.
    pub fn is_rendered(&self, el: ElementId) -> bool {
        let s = self.style(el);
        s.visible && s.props.opacity > 0.0
    }

    /// Elements with an explicit style, in id order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &ElementStyle)> + '_ {
        self.styles.iter().map(|(id, s)| (*id, s))
    }

    /// Capture the styles of `elements` for a later [`Stage::restore`].
    pub fn capture<I>(&self, elements: I) -> StageSnapshot
    where
        I: IntoIterator<Item = ElementId>,
    {
        let entries = elements
            .into_iter()
            .map(|el| (el, self.styles.get(&el).copied()))
            .collect();
        StageSnapshot { entries }
    }

    /// Put every captured element back exactly as it was, including elements
    /// that had no explicit style at capture time.
    pub fn restore(&mut self, snapshot: &StageSnapshot) {
        for (el, style) in &snapshot.entries {
            match style {
                Some(s) => {
                    self.styles.insert(*el, *s);
                }
                None => {
                    self.styles.remove(el);
                }
            }
        }
    }

    fn entry(&mut self, el: ElementId) -> &mut ElementStyle {
        self.styles.entry(el).or_default()
    }
}

/// Saved element styles, used to roll back an aborted transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageSnapshot {
    entries: Vec<(ElementId, Option<ElementStyle>)>,
}

impl StageSnapshot {
    /// Number of captured elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/stage.rs"]
mod tests;
