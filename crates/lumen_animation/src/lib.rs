//! Lumen Animation System
//!
//! Easing curves, keyframe tracks, timelines and a tick-driven animation engine.
//!
//! # Features
//!
//! - **Easing**: 31 standard curves, addressable by enum or by name
//! - **Keyframe Tracks**: Per-property keyframes over normalized time, with
//!   type-aware interpolation of numbers, vectors, colors and mappings
//! - **Timelines**: Play/pause/stop/seek, looping, speed and sequencing
//! - **Engine**: Named animations with groups, priorities and lifecycle events
//!
//! # Example
//!
//! ```rust
//! use lumen_animation::{AnimationEngine, Easing, PlayOptions, Timeline};
//!
//! let mut timeline = Timeline::new("slide", 400.0);
//! timeline
//!     .add_track("x")
//!     .add_keyframe(0.0, 0.0, Easing::Linear)
//!     .add_keyframe(1.0, 100.0, Easing::EaseOutCubic);
//!
//! let mut engine = AnimationEngine::new();
//! let name = engine.play(timeline, PlayOptions::new());
//!
//! let frame = engine.update(200.0);
//! let x = frame[&name]["x"].as_f64().unwrap();
//! assert!((x - 87.5).abs() < 1e-9);
//! ```

pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod interpolate;
pub mod keyframe;
pub mod presets;
pub mod timeline;

pub use config::EngineConfig;
pub use easing::Easing;
pub use engine::{
    AnimationEngine, AnimationId, AnimationPriority, EndReason, EngineEvent, EngineValues,
    PlayOptions,
};
pub use error::{AnimationError, Result};
pub use interpolate::{interpolate_or_start, try_interpolate};
pub use keyframe::{Keyframe, Track};
pub use lumen_core::Value;
pub use presets::AnimationPreset;
pub use timeline::{PlayState, Timeline, TrackValues};
