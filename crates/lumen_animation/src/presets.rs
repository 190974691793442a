//! Animation presets for common effects
//!
//! Pre-built timelines for fades, bounces, color pulses and slides. Each
//! preset has one track with literal boundary keyframes; the engine's
//! convenience methods build these and start them in one call.

use lumen_core::Value;

use crate::easing::Easing;
use crate::timeline::Timeline;

/// Default duration for one-shot presets
pub const DEFAULT_DURATION_MS: f64 = 500.0;
/// Default duration of one color pulse cycle
pub const DEFAULT_PULSE_MS: f64 = 1000.0;

/// Pre-built timelines for common patterns
pub struct AnimationPreset;

impl AnimationPreset {
    // ========================================================================
    // Fade animations
    // ========================================================================

    /// `alpha` from 0.0 to 1.0, decelerating
    pub fn fade_in(duration_ms: f64) -> Timeline {
        let mut timeline = Timeline::new("fade_in", duration_ms);
        timeline
            .add_track("alpha")
            .add_keyframe(0.0, 0.0, Easing::Linear)
            .add_keyframe(1.0, 1.0, Easing::EaseOutCubic);
        timeline
    }

    /// `alpha` from 1.0 to 0.0, accelerating
    pub fn fade_out(duration_ms: f64) -> Timeline {
        let mut timeline = Timeline::new("fade_out", duration_ms);
        timeline
            .add_track("alpha")
            .add_keyframe(0.0, 1.0, Easing::Linear)
            .add_keyframe(1.0, 0.0, Easing::EaseInCubic);
        timeline
    }

    // ========================================================================
    // Scale animations
    // ========================================================================

    /// `scale` from `start` to `end` with an elastic overshoot
    pub fn scale_bounce(start: f64, end: f64, duration_ms: f64) -> Timeline {
        let mut timeline = Timeline::new("scale_bounce", duration_ms);
        timeline
            .add_track("scale")
            .add_keyframe(0.0, start, Easing::Linear)
            .add_keyframe(1.0, end, Easing::EaseOutElastic);
        timeline
    }

    // ========================================================================
    // Color animations
    // ========================================================================

    /// Looping `color` pulse `from -> to -> from`
    pub fn color_pulse(from: impl Into<Value>, to: impl Into<Value>, duration_ms: f64) -> Timeline {
        let from = from.into();
        let mut timeline = Timeline::new("color_pulse", duration_ms).looping(true);
        timeline
            .add_track("color")
            .add_keyframe(0.0, from.clone(), Easing::Linear)
            .add_keyframe(0.5, to, Easing::EaseInOutSine)
            .add_keyframe(1.0, from, Easing::EaseInOutSine);
        timeline
    }

    // ========================================================================
    // Slide animations
    // ========================================================================

    /// `position` from `start` to `end` with the given easing
    ///
    /// `Easing::EaseOutCubic` is the conventional choice.
    pub fn slide(
        start: impl Into<Value>,
        end: impl Into<Value>,
        duration_ms: f64,
        easing: Easing,
    ) -> Timeline {
        let mut timeline = Timeline::new("slide", duration_ms);
        timeline
            .add_track("position")
            .add_keyframe(0.0, start, Easing::Linear)
            .add_keyframe(1.0, end, easing);
        timeline
    }
}
