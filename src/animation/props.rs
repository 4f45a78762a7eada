use crate::foundation::core::Vec2;
use crate::foundation::math::{approx_eq, lerp};

/// Values that can be interpolated by a timeline step.
pub trait Lerp: Sized {
    /// Interpolate between `a` and `b` at `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp(*a, *b, t)
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
    }
}

/// Animated visual properties of one element, relative to its layout box.
///
/// Transforms are applied around the element's center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualProps {
    /// Offset from the layout position, in pixels.
    pub translate: Vec2,
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation in degrees, clockwise.
    pub rotation_deg: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for VisualProps {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl VisualProps {
    /// Untransformed and fully opaque.
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
        rotation_deg: 0.0,
        opacity: 1.0,
    };

    /// Identity transform at the given opacity.
    pub fn with_opacity(opacity: f64) -> Self {
        Self {
            opacity,
            ..Self::IDENTITY
        }
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        approx_eq(self.translate.x, other.translate.x, eps)
            && approx_eq(self.translate.y, other.translate.y, eps)
            && approx_eq(self.scale, other.scale, eps)
            && approx_eq(self.rotation_deg, other.rotation_deg, eps)
            && approx_eq(self.opacity, other.opacity, eps)
    }
}

impl Lerp for VisualProps {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            translate: <Vec2 as Lerp>::lerp(&a.translate, &b.translate, t),
            scale: <f64 as Lerp>::lerp(&a.scale, &b.scale, t),
            rotation_deg: <f64 as Lerp>::lerp(&a.rotation_deg, &b.rotation_deg, t),
            opacity: <f64 as Lerp>::lerp(&a.opacity, &b.opacity, t),
        }
    }
}

/// One animated channel with its start and end value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Span<T> {
    /// Value at local progress 0.
    pub from: T,
    /// Value at local progress 1.
    pub to: T,
}

impl<T: Lerp> Span<T> {
    /// Create a span.
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }

    /// Value at eased local progress `t`.
    pub fn at(&self, t: f64) -> T {
        T::lerp(&self.from, &self.to, t)
    }
}

/// Property delta of a timeline step. Channels left as `None` are untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tween {
    /// Translation channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<Span<Vec2>>,
    /// Scale channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Span<f64>>,
    /// Rotation channel (degrees).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_deg: Option<Span<f64>>,
    /// Opacity channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Span<f64>>,
}

impl Tween {
    /// Tween only the opacity channel.
    pub fn opacity(from: f64, to: f64) -> Self {
        Self {
            opacity: Some(Span::new(from, to)),
            ..Self::default()
        }
    }

    /// Tween only the translation channel.
    pub fn translate(from: Vec2, to: Vec2) -> Self {
        Self {
            translate: Some(Span::new(from, to)),
            ..Self::default()
        }
    }

    /// Tween only the rotation channel.
    pub fn rotation(from: f64, to: f64) -> Self {
        Self {
            rotation_deg: Some(Span::new(from, to)),
            ..Self::default()
        }
    }

    /// Tween every channel between two full property sets.
    pub fn between(from: VisualProps, to: VisualProps) -> Self {
        Self {
            translate: Some(Span::new(from.translate, to.translate)),
            scale: Some(Span::new(from.scale, to.scale)),
            rotation_deg: Some(Span::new(from.rotation_deg, to.rotation_deg)),
            opacity: Some(Span::new(from.opacity, to.opacity)),
        }
    }

    /// Add a scale channel.
    pub fn with_scale(mut self, from: f64, to: f64) -> Self {
        self.scale = Some(Span::new(from, to));
        self
    }

    /// Add an opacity channel.
    pub fn with_opacity(mut self, from: f64, to: f64) -> Self {
        self.opacity = Some(Span::new(from, to));
        self
    }

    /// Add a translation channel.
    pub fn with_translate(mut self, from: Vec2, to: Vec2) -> Self {
        self.translate = Some(Span::new(from, to));
        self
    }

    /// True when no channel is animated.
    pub fn is_empty(&self) -> bool {
        self.translate.is_none()
            && self.scale.is_none()
            && self.rotation_deg.is_none()
            && self.opacity.is_none()
    }

    pub(crate) fn is_finite(&self) -> bool {
        let vec_ok = |s: &Span<Vec2>| s.from.is_finite() && s.to.is_finite();
        let f_ok = |s: &Span<f64>| s.from.is_finite() && s.to.is_finite();
        self.translate.as_ref().is_none_or(vec_ok)
            && self.scale.as_ref().is_none_or(f_ok)
            && self.rotation_deg.as_ref().is_none_or(f_ok)
            && self.opacity.as_ref().is_none_or(f_ok)
    }
}

/// Per-channel sampled values for one element; `None` means "not animated".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelValues {
    /// Sampled translation.
    pub translate: Option<Vec2>,
    /// Sampled scale.
    pub scale: Option<f64>,
    /// Sampled rotation.
    pub rotation_deg: Option<f64>,
    /// Sampled opacity.
    pub opacity: Option<f64>,
}

impl ChannelValues {
    /// Overlay sampled channels onto `base`.
    pub fn apply_to(&self, base: VisualProps) -> VisualProps {
        VisualProps {
            translate: self.translate.unwrap_or(base.translate),
            scale: self.scale.unwrap_or(base.scale),
            rotation_deg: self.rotation_deg.unwrap_or(base.rotation_deg),
            opacity: self.opacity.unwrap_or(base.opacity).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/props.rs"]
mod tests;
