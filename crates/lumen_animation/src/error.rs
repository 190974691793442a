//! Animation error types

use thiserror::Error;

/// Errors produced by the animation system
///
/// Only the first two variants can surface from per-frame work, and only
/// through the explicit `try_*`/`from_name` entry points. Track evaluation
/// degrades to a documented fallback instead of failing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    /// An easing name that is not in the registry
    #[error("Unknown easing kind: {0}")]
    UnknownEasingKind(String),

    /// Two vectors of different lengths were interpolated
    #[error("Shape mismatch: cannot interpolate a {expected}-component vector into a {found}-component vector")]
    ShapeMismatch { expected: usize, found: usize },

    /// Engine configuration could not be parsed or serialized
    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
