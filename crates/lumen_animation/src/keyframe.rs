//! Keyframes and tracks
//!
//! A [`Track`] owns the keyframes for one named property. Keyframes may be
//! appended in any order; the track sorts them lazily on the next read and
//! caches the sorted order until the next append.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;

use lumen_core::Value;

use crate::easing::Easing;
use crate::error::Result;
use crate::interpolate::interpolate_or_start;

/// Clamp normalized time to `[0, 1]`, mapping NaN to the end
pub(crate) fn clamp_unit(t: f64) -> f64 {
    if t.is_nan() {
        1.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

/// A single keyframe in a track
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    time: f64,
    value: Value,
    easing: Easing,
}

impl Keyframe {
    /// Create a keyframe; `time` is clamped to `[0, 1]` (NaN becomes 1)
    pub fn new(time: f64, value: impl Into<Value>, easing: Easing) -> Self {
        Self {
            time: clamp_unit(time),
            value: value.into(),
            easing,
        }
    }

    /// Time position (0.0 to 1.0)
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Value at this keyframe
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Easing used for the segment arriving at this keyframe
    pub fn easing(&self) -> Easing {
        self.easing
    }
}

/// The keyframes for one animated property
pub struct Track {
    name: String,
    /// Opaque property path for the consumer (e.g. `"sprite.x"`)
    target: String,
    keyframes: RefCell<Vec<Keyframe>>,
    /// Set on append, cleared by the next sort
    dirty: Cell<bool>,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_target(name, "")
    }

    pub fn with_target(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            keyframes: RefCell::new(Vec::new()),
            dirty: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Append a keyframe (builder-style chaining on `&mut`)
    pub fn add_keyframe(&mut self, time: f64, value: impl Into<Value>, easing: Easing) -> &mut Self {
        self.keyframes
            .get_mut()
            .push(Keyframe::new(time, value, easing));
        self.dirty.set(true);
        self
    }

    /// Append a keyframe whose easing is given by name
    ///
    /// Fails with `UnknownEasingKind` without touching the track.
    pub fn add_keyframe_named(
        &mut self,
        time: f64,
        value: impl Into<Value>,
        easing: &str,
    ) -> Result<&mut Self> {
        let easing = Easing::from_name(easing)?;
        Ok(self.add_keyframe(time, value, easing))
    }

    /// Keyframes in ascending time order
    pub fn keyframes(&self) -> Ref<'_, [Keyframe]> {
        self.ensure_sorted();
        Ref::map(self.keyframes.borrow(), Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.keyframes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.borrow().is_empty()
    }

    /// Get the interpolated value at normalized time `t`
    ///
    /// `t` is clamped like a keyframe time, so NaN reads the end of the
    /// track. Returns `None` for a track without keyframes. Before the first
    /// keyframe the first value is held, after the last keyframe the last
    /// value is held.
    pub fn get_value_at(&self, t: f64) -> Option<Value> {
        self.ensure_sorted();
        let keyframes = self.keyframes.borrow();

        let first = keyframes.first()?;
        let last = keyframes.last()?;
        let t = clamp_unit(t);

        if t <= first.time {
            return Some(first.value.clone());
        }
        if t >= last.time {
            return Some(last.value.clone());
        }

        // First keyframe strictly after t; never 0 or len given the checks above
        let next_idx = keyframes.partition_point(|kf| kf.time <= t);
        let prev = &keyframes[next_idx - 1];
        let next = &keyframes[next_idx];

        let segment = next.time - prev.time;
        if segment <= 0.0 {
            return Some(prev.value.clone());
        }

        let local_t = (t - prev.time) / segment;
        Some(interpolate_or_start(
            &prev.value,
            &next.value,
            local_t,
            next.easing,
        ))
    }

    fn ensure_sorted(&self) {
        if self.dirty.get() {
            // Stable: equal times keep insertion order
            self.keyframes
                .borrow_mut()
                .sort_by(|a, b| a.time.total_cmp(&b.time));
            self.dirty.set(false);
        }
    }
}

impl Clone for Track {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            target: self.target.clone(),
            keyframes: RefCell::new(self.keyframes.borrow().clone()),
            dirty: Cell::new(self.dirty.get()),
        }
    }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("keyframes", &self.keyframes.borrow().len())
            .finish()
    }
}
