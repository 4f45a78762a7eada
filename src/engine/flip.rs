//! Timeline recipes for the overview/detail flights.
//!
//! Every recipe starts from the element's untransformed layout box: the
//! overview image moves by the center offset to its dock and scales by the
//! fit ratio, so at the end it sits exactly over the dock.

use crate::{
    animation::ease::Ease,
    animation::props::Tween,
    animation::timeline::{At, START_LABEL, Timeline, TimelineBuilder},
    config::model::MotionConfig,
    engine::state::TransitionPlan,
    foundation::core::{ElementId, Vec2},
    foundation::error::{VitrineError, VitrineResult},
    scene::elements::ItemSlots,
};

/// Label marking the instant an advance hands the detail view to the
/// incoming item.
pub const HANDOFF_LABEL: &str = "handoff";

/// Label at which the detail backdrop starts fading in.
pub const BACKDROP_LABEL: &str = "backdrop";

fn slots_of<'a>(slots: &'a [ItemSlots], item: usize) -> VitrineResult<&'a ItemSlots> {
    slots
        .get(item)
        .ok_or_else(|| VitrineError::timeline(format!("no elements for item {item}")))
}

fn from_start(offset: f64) -> At {
    At::label(START_LABEL, offset)
}

/// Overview to detail. Played backward it is the exit.
pub(crate) fn enter_timeline(
    plan: &TransitionPlan,
    slots: &[ItemSlots],
    motion: &MotionConfig,
) -> VitrineResult<Timeline> {
    let selected = slots_of(slots, plan.item_index)?;
    let siblings: Vec<ElementId> = slots
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != plan.item_index)
        .map(|(_, s)| s.overview)
        .collect();
    let docked = plan.docked();
    let tilt = plan.tilt(motion.tilt_deg);
    let half = motion.enter_secs / 2.0;

    let mut builder = TimelineBuilder::new();
    if !siblings.is_empty() {
        builder = builder.tween(
            siblings,
            Tween::opacity(1.0, 0.0),
            motion.sibling_fade_secs,
            Ease::OutQuad,
            from_start(0.0),
        );
    }
    builder
        .tween(
            [selected.overview],
            Tween::translate(Vec2::ZERO, docked.translate).with_scale(1.0, docked.scale),
            motion.enter_secs,
            motion.ease,
            from_start(0.0),
        )
        .tween(
            [selected.overview],
            Tween::rotation(0.0, tilt),
            half,
            Ease::OutQuad,
            from_start(0.0),
        )
        .tween(
            [selected.overview],
            Tween::rotation(tilt, 0.0),
            half,
            Ease::InOutQuad,
            At::AfterPrevious(0.0),
        )
        .label(BACKDROP_LABEL, from_start(motion.backdrop_delay_secs))
        .tween(
            [selected.panel],
            Tween::opacity(0.0, 1.0),
            motion.backdrop_fade_secs,
            Ease::Linear,
            At::label(BACKDROP_LABEL, 0.0),
        )
        .build()
}

/// Detail of `outgoing` to detail of `incoming` in one timeline.
///
/// Both panels fade linearly over the same window so their opacities always
/// sum to one.
pub(crate) fn advance_timeline(
    outgoing: &TransitionPlan,
    incoming: &TransitionPlan,
    slots: &[ItemSlots],
    motion: &MotionConfig,
) -> VitrineResult<Timeline> {
    let out = slots_of(slots, outgoing.item_index)?;
    let inc = slots_of(slots, incoming.item_index)?;
    let out_docked = outgoing.docked();
    let in_docked = incoming.docked();
    let d = motion.advance_secs;
    let tilt = incoming.tilt(motion.tilt_deg);

    TimelineBuilder::new()
        .label(HANDOFF_LABEL, from_start(d * motion.handoff_at))
        .tween(
            [out.overview],
            Tween::translate(out_docked.translate, Vec2::ZERO)
                .with_scale(out_docked.scale, 1.0)
                .with_opacity(1.0, 0.0),
            d,
            motion.ease,
            from_start(0.0),
        )
        .tween(
            [out.panel],
            Tween::opacity(1.0, 0.0),
            d,
            Ease::Linear,
            from_start(0.0),
        )
        .tween(
            [inc.panel],
            Tween::opacity(0.0, 1.0),
            d,
            Ease::Linear,
            from_start(0.0),
        )
        .tween(
            [inc.overview],
            Tween::translate(Vec2::ZERO, in_docked.translate)
                .with_scale(1.0, in_docked.scale)
                .with_opacity(0.0, 1.0),
            d,
            motion.ease,
            from_start(0.0),
        )
        .tween(
            [inc.overview],
            Tween::rotation(0.0, tilt),
            d / 2.0,
            Ease::OutQuad,
            from_start(0.0),
        )
        .tween(
            [inc.overview],
            Tween::rotation(tilt, 0.0),
            d / 2.0,
            Ease::InOutQuad,
            At::AfterPrevious(0.0),
        )
        .build()
}

#[cfg(test)]
#[path = "../../tests/unit/engine/flip.rs"]
mod tests;
