use std::fmt;

use crate::foundation::error::{VitrineError, VitrineResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Opaque handle to a presentation-owned element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identifier of a showcased item, as supplied by the content layer.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create an item id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Horizontal side an item sits on in the overview layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Left half of the viewport.
    Left,
    /// Right half of the viewport.
    Right,
}

impl Side {
    /// `-1.0` for left, `1.0` for right.
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Visible viewport dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Viewport width.
    pub width: f64,
    /// Viewport height.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport.
    pub fn new(width: f64, height: f64) -> VitrineResult<Self> {
        let vp = Self { width, height };
        vp.validate()?;
        Ok(vp)
    }

    /// Viewport dimensions must be finite and strictly positive.
    pub fn validate(&self) -> VitrineResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(VitrineError::validation("viewport dimensions must be finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(VitrineError::validation("viewport dimensions must be > 0"));
        }
        Ok(())
    }

    /// Horizontal center line.
    pub fn center_x(self) -> f64 {
        self.width * 0.5
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
