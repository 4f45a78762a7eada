use std::str::FromStr;

use crate::foundation::error::VitrineError;

/// Easing curve applied to a step's local progress.
///
/// Identifiers follow the familiar `family.direction` naming (`power1` is
/// quadratic, `power2` cubic, `power3` quartic).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Identity curve.
    #[serde(rename = "linear", alias = "none")]
    Linear,
    /// Quadratic ease-in.
    #[serde(rename = "power1.in", alias = "in_quad")]
    InQuad,
    /// Quadratic ease-out.
    #[serde(rename = "power1.out", alias = "out_quad")]
    OutQuad,
    /// Quadratic ease-in-out.
    #[serde(rename = "power1.inOut", alias = "in_out_quad")]
    InOutQuad,
    /// Cubic ease-in.
    #[serde(rename = "power2.in", alias = "in_cubic")]
    InCubic,
    /// Cubic ease-out.
    #[default]
    #[serde(rename = "power2.out", alias = "out_cubic")]
    OutCubic,
    /// Cubic ease-in-out.
    #[serde(rename = "power2.inOut", alias = "in_out_cubic")]
    InOutCubic,
    /// Quartic ease-out.
    #[serde(rename = "power3.out", alias = "out_quart")]
    OutQuart,
    /// Quartic ease-in-out.
    #[serde(rename = "power3.inOut", alias = "in_out_quart")]
    InOutQuart,
    /// Exponential ease-out.
    #[serde(rename = "expo.out", alias = "out_expo")]
    OutExpo,
    /// Sinusoidal ease-in-out.
    #[serde(rename = "sine.inOut", alias = "in_out_sine")]
    InOutSine,
}

impl Ease {
    /// Every supported curve, in declaration order.
    pub const ALL: [Ease; 11] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::OutQuart,
        Ease::InOutQuart,
        Ease::OutExpo,
        Ease::InOutSine,
    ];

    /// Map local progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = crate::foundation::math::unit(t);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::OutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::InOutSine => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }

    /// Canonical identifier, e.g. `"power2.out"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InQuad => "power1.in",
            Self::OutQuad => "power1.out",
            Self::InOutQuad => "power1.inOut",
            Self::InCubic => "power2.in",
            Self::OutCubic => "power2.out",
            Self::InOutCubic => "power2.inOut",
            Self::OutQuart => "power3.out",
            Self::InOutQuart => "power3.inOut",
            Self::OutExpo => "expo.out",
            Self::InOutSine => "sine.inOut",
        }
    }

    /// Resolve an easing identifier. Matching is case-insensitive and accepts
    /// the snake_case aliases as well.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        if wanted == "none" {
            return Some(Self::Linear);
        }
        Self::ALL.into_iter().find(|e| {
            e.name().to_ascii_lowercase() == wanted || e.alias() == wanted.as_str()
        })
    }

    fn alias(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InQuad => "in_quad",
            Self::OutQuad => "out_quad",
            Self::InOutQuad => "in_out_quad",
            Self::InCubic => "in_cubic",
            Self::OutCubic => "out_cubic",
            Self::InOutCubic => "in_out_cubic",
            Self::OutQuart => "out_quart",
            Self::InOutQuart => "in_out_quart",
            Self::OutExpo => "out_expo",
            Self::InOutSine => "in_out_sine",
        }
    }
}

impl FromStr for Ease {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| VitrineError::validation(format!("unknown easing identifier '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
