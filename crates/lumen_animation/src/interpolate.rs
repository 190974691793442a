//! Type-dispatched interpolation between two [`Value`]s
//!
//! The keyframe's easing is applied once to the segment-local progress; the
//! eased progress is then fed linearly into every nested component.

use lumen_core::{Mapping, Value};

use crate::easing::Easing;
use crate::error::{AnimationError, Result};

/// Interpolate `start -> end` at local progress `t` using `easing`
///
/// Fails with [`AnimationError::ShapeMismatch`] when two top-level vectors
/// have different lengths. A mismatch nested inside a composite holds only
/// that component at its start value; its siblings keep animating. Callers
/// on the render path should use [`interpolate_or_start`] instead.
pub fn try_interpolate(start: &Value, end: &Value, t: f64, easing: Easing) -> Result<Value> {
    lerp(start, end, easing.apply(t))
}

/// Like [`try_interpolate`], but a shape mismatch yields `start` unchanged
///
/// The mismatch is logged at `warn` level. Variable-length content (e.g.
/// captions) legitimately hits this, so it must never abort a frame.
pub fn interpolate_or_start(start: &Value, end: &Value, t: f64, easing: Easing) -> Value {
    match try_interpolate(start, end, t, easing) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("Falling back to start value: {}", err);
            start.clone()
        }
    }
}

/// Linear blend at an already-eased progress
fn lerp(start: &Value, end: &Value, t: f64) -> Result<Value> {
    match (start, end) {
        (Value::Int(a), Value::Int(b)) => {
            let v = *a as f64 + (*b as f64 - *a as f64) * t;
            // Truncates toward zero
            Ok(Value::Int(v as i64))
        }
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            // Both arms are numeric here
            let a = start.as_f64().unwrap_or_default();
            let b = end.as_f64().unwrap_or_default();
            Ok(Value::Float(a + (b - a) * t))
        }
        (Value::Vector(a), Value::Vector(b)) => {
            if a.len() != b.len() {
                return Err(AnimationError::ShapeMismatch {
                    expected: a.len(),
                    found: b.len(),
                });
            }
            let components = a.iter().zip(b).map(|(s, e)| lerp_nested(s, e, t)).collect();
            Ok(Value::Vector(components))
        }
        (Value::Sequence(a), Value::Sequence(b)) => {
            if a.len() != b.len() {
                return Ok(start.clone());
            }
            let items = a.iter().zip(b).map(|(s, e)| lerp_nested(s, e, t)).collect();
            Ok(Value::Sequence(items))
        }
        (Value::Mapping(a), Value::Mapping(b)) => {
            let mut out = Mapping::with_capacity(a.len());
            for (key, s) in a {
                let value = match b.get(key) {
                    Some(e) => lerp_nested(s, e, t),
                    None => s.clone(),
                };
                out.insert(key.clone(), value);
            }
            Ok(Value::Mapping(out))
        }
        // Flags, text and mismatched kinds step at the midpoint
        _ => Ok(step(start, end, t)),
    }
}

/// Blend one component of a composite; a mismatch only holds that component
fn lerp_nested(start: &Value, end: &Value, t: f64) -> Value {
    lerp(start, end, t).unwrap_or_else(|err| {
        tracing::warn!("Holding nested component at its start value: {}", err);
        start.clone()
    })
}

fn step(start: &Value, end: &Value, t: f64) -> Value {
    if t >= 0.5 {
        end.clone()
    } else {
        start.clone()
    }
}
