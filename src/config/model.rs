use crate::{
    animation::ease::Ease,
    foundation::error::{VitrineError, VitrineResult},
    foundation::math::finite_non_negative,
    scroll::region::PinConfig,
};

/// How scroll position and clicks map onto detail transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Entering the pinned region reveals one fixed item; leaving back closes it.
    SingleReveal,
    /// Scroll progress through the region selects the item in detail.
    PinnedSections,
    /// Items are opened by activation; threshold crossings step to the
    /// neighbouring item.
    #[default]
    Hybrid,
}

/// Timings and shape of the FLIP transitions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Duration of the overview-to-detail flight (also used, reversed, on exit).
    pub enter_secs: f64,
    /// Duration of a scroll-driven advance between two detail items.
    pub advance_secs: f64,
    /// Easing of the flight.
    pub ease: Ease,
    /// How long non-selected overview items take to fade out.
    pub sibling_fade_secs: f64,
    /// Delay of the detail backdrop fade relative to the flight start.
    pub backdrop_delay_secs: f64,
    /// Duration of the detail backdrop fade.
    pub backdrop_fade_secs: f64,
    /// Peak tilt of the flying element, signed by the side it started on.
    pub tilt_deg: f64,
    /// Fraction of an advance after which the incoming item owns the state.
    pub handoff_at: f64,
    /// Completion fraction at or above which an interrupted transition
    /// snaps forward instead of back.
    pub snap_threshold: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enter_secs: 1.0,
            advance_secs: 0.9,
            ease: Ease::InOutCubic,
            sibling_fade_secs: 0.4,
            backdrop_delay_secs: 0.2,
            backdrop_fade_secs: 0.6,
            tilt_deg: 6.0,
            handoff_at: 0.5,
            snap_threshold: 0.5,
        }
    }
}

impl MotionConfig {
    /// Check numeric ranges.
    pub fn validate(&self) -> VitrineResult<()> {
        positive("motion.enter_secs", self.enter_secs)?;
        positive("motion.advance_secs", self.advance_secs)?;
        non_negative("motion.sibling_fade_secs", self.sibling_fade_secs)?;
        non_negative("motion.backdrop_delay_secs", self.backdrop_delay_secs)?;
        non_negative("motion.backdrop_fade_secs", self.backdrop_fade_secs)?;
        if !self.tilt_deg.is_finite() {
            return Err(VitrineError::validation("motion.tilt_deg must be finite"));
        }
        fraction("motion.handoff_at", self.handoff_at)?;
        fraction("motion.snap_threshold", self.snap_threshold)?;
        Ok(())
    }
}

/// Secondary-asset carousel shown while an item is in detail.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Seconds between automatic advances.
    pub interval_secs: f64,
    /// Duration of the first asset's entrance.
    pub entrance_secs: f64,
    /// Duration of a cross-fade between assets.
    pub crossfade_secs: f64,
    /// Horizontal travel of entering and leaving assets, in pixels.
    pub slide_px: f64,
    /// Easing of entrance and cross-fades.
    pub ease: Ease,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_secs: 4.0,
            entrance_secs: 0.8,
            crossfade_secs: 0.7,
            slide_px: 48.0,
            ease: Ease::OutCubic,
        }
    }
}

impl CarouselConfig {
    /// Check numeric ranges.
    pub fn validate(&self) -> VitrineResult<()> {
        positive("carousel.interval_secs", self.interval_secs)?;
        non_negative("carousel.entrance_secs", self.entrance_secs)?;
        non_negative("carousel.crossfade_secs", self.crossfade_secs)?;
        if self.crossfade_secs >= self.interval_secs {
            return Err(VitrineError::validation(
                "carousel.crossfade_secs must be shorter than carousel.interval_secs",
            ));
        }
        if !self.slide_px.is_finite() {
            return Err(VitrineError::validation("carousel.slide_px must be finite"));
        }
        Ok(())
    }
}

/// Top-level showcase configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Interaction variant.
    pub variant: Variant,
    /// Item revealed by [`Variant::SingleReveal`].
    pub reveal_index: usize,
    /// Close the detail view when scrolling past the end of the region.
    pub exit_on_leave: bool,
    /// Transition timings.
    pub motion: MotionConfig,
    /// Carousel timings.
    pub carousel: CarouselConfig,
    /// Pinned-region geometry.
    pub pin: PinConfig,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            reveal_index: 0,
            exit_on_leave: false,
            motion: MotionConfig::default(),
            carousel: CarouselConfig::default(),
            pin: PinConfig::default(),
        }
    }
}

impl ShowcaseConfig {
    /// Defaults for `variant`.
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::SingleReveal => Self {
                variant,
                pin: PinConfig {
                    size_in_viewport_heights: 1.5,
                    ..PinConfig::default()
                },
                ..Self::default()
            },
            Variant::PinnedSections => Self {
                variant,
                exit_on_leave: true,
                ..Self::default()
            },
            Variant::Hybrid => Self {
                variant,
                ..Self::default()
            },
        }
    }

    /// [`Variant::SingleReveal`] preset.
    pub fn single_reveal() -> Self {
        Self::preset(Variant::SingleReveal)
    }

    /// [`Variant::PinnedSections`] preset.
    pub fn pinned_sections() -> Self {
        Self::preset(Variant::PinnedSections)
    }

    /// [`Variant::Hybrid`] preset.
    pub fn hybrid() -> Self {
        Self::preset(Variant::Hybrid)
    }

    /// Parse JSON and validate.
    pub fn from_json_str(s: &str) -> VitrineResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate everything that does not depend on the item collection.
    pub fn validate(&self) -> VitrineResult<()> {
        self.motion.validate()?;
        self.carousel.validate()?;
        self.pin.validate()?;
        Ok(())
    }

    /// Validate against a collection of `item_count` items.
    pub fn validate_for(&self, item_count: usize) -> VitrineResult<()> {
        self.validate()?;
        if self.variant == Variant::SingleReveal && self.reveal_index >= item_count {
            return Err(VitrineError::validation(format!(
                "reveal_index {} out of range for {item_count} items",
                self.reveal_index
            )));
        }
        Ok(())
    }
}

fn positive(name: &str, v: f64) -> VitrineResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(VitrineError::validation(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

fn non_negative(name: &str, v: f64) -> VitrineResult<()> {
    if !finite_non_negative(v) {
        return Err(VitrineError::validation(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn fraction(name: &str, v: f64) -> VitrineResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(VitrineError::validation(format!("{name} must lie in [0, 1]")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
