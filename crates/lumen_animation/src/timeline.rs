//! Timelines
//!
//! A [`Timeline`] bundles named tracks under one clock with its own playback
//! state machine:
//!
//! ```text
//! Stopped --play--> Playing --pause--> Paused --play--> Playing
//!                      |                                   |
//!                      +--(end, not looping)--> Finished --+ (play)
//! any --stop--> Stopped (time reset to 0)
//! ```

use std::fmt;

use indexmap::IndexMap;
use lumen_core::Value;

use crate::keyframe::{clamp_unit, Track};

/// Current value of every track in a timeline, keyed by track name
pub type TrackValues = IndexMap<String, Value>;

/// Callback fired when a non-looping timeline reaches its end
pub type CompleteCallback = Box<dyn FnMut(&Timeline)>;

/// Playback state of a timeline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
    Paused,
    /// Reached the end without looping
    Finished,
}

/// A playable bundle of tracks sharing one clock
pub struct Timeline {
    name: String,
    duration_ms: f64,
    tracks: IndexMap<String, Track>,
    looping: bool,
    state: PlayState,
    current_time: f64,
    speed: f64,
    on_complete: Option<CompleteCallback>,
}

impl Timeline {
    /// Create a stopped timeline; negative durations are treated as zero
    pub fn new(name: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            name: name.into(),
            duration_ms: duration_ms.max(0.0),
            tracks: IndexMap::new(),
            looping: false,
            state: PlayState::Stopped,
            current_time: 0.0,
            speed: 1.0,
            on_complete: None,
        }
    }

    /// Builder: enable or disable looping
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Builder: set the playback speed multiplier
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.set_speed(speed);
        self
    }

    /// Builder: set the completion callback
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Timeline) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn set_on_complete<F>(&mut self, callback: F)
    where
        F: FnMut(&Timeline) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    // =========================================================================
    // Tracks
    // =========================================================================

    /// Create a track, replacing any existing track with the same name
    pub fn add_track(&mut self, name: impl Into<String>) -> &mut Track {
        self.add_track_with_target(name, "")
    }

    pub fn add_track_with_target(
        &mut self,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> &mut Track {
        let name = name.into();
        let track = Track::with_target(name.clone(), target);
        // Replacing keeps the original slot so track order is stable
        let (index, _) = self.tracks.insert_full(name, track);
        &mut self.tracks[index]
    }

    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.get(name)
    }

    pub fn track_mut(&mut self, name: &str) -> Option<&mut Track> {
        self.tracks.get_mut(name)
    }

    pub fn remove_track(&mut self, name: &str) -> bool {
        self.tracks.shift_remove(name).is_some()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn track_names(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    // =========================================================================
    // Playback control
    // =========================================================================

    /// Start or resume playback
    pub fn play(&mut self, from_start: bool) {
        if from_start {
            self.current_time = 0.0;
        }
        self.state = PlayState::Playing;
    }

    /// Pause; only has an effect while playing
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    /// Stop and rewind to the beginning
    pub fn stop(&mut self) {
        self.state = PlayState::Stopped;
        self.current_time = 0.0;
    }

    /// Jump to `time_ms` (clamped) without changing the playback state
    ///
    /// NaN seeks to the end, like a NaN keyframe time.
    pub fn seek(&mut self, time_ms: f64) {
        self.current_time = if time_ms.is_nan() {
            self.duration_ms
        } else {
            time_ms.clamp(0.0, self.duration_ms)
        };
    }

    /// Jump to normalized time `t` (clamped) without changing the playback state
    pub fn seek_normalized(&mut self, t: f64) {
        self.current_time = clamp_unit(t) * self.duration_ms;
    }

    /// Advance the clock and return the current track values
    ///
    /// Only a playing timeline advances. On reaching the end a looping
    /// timeline wraps around; a non-looping one clamps, becomes `Finished`
    /// and fires its completion callback once.
    pub fn update(&mut self, delta_ms: f64) -> TrackValues {
        if self.state == PlayState::Playing {
            self.advance(delta_ms);
        }
        self.values()
    }

    fn advance(&mut self, delta_ms: f64) {
        let step = delta_ms * self.speed;
        // A NaN or infinite step would poison the clock; skip it
        if !step.is_finite() {
            tracing::warn!("Ignoring non-finite time step on '{}': {}", self.name, step);
            return;
        }
        self.current_time = (self.current_time + step).max(0.0);

        if self.current_time < self.duration_ms {
            return;
        }

        if self.looping {
            self.current_time = if self.duration_ms > 0.0 {
                self.current_time % self.duration_ms
            } else {
                0.0
            };
        } else {
            self.current_time = self.duration_ms;
            self.state = PlayState::Finished;
            if let Some(mut callback) = self.on_complete.take() {
                callback(self);
                self.on_complete = Some(callback);
            }
        }
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Values of all tracks at the current progress, without advancing
    ///
    /// Tracks without keyframes are omitted.
    pub fn values(&self) -> TrackValues {
        let t = self.progress();
        self.tracks
            .iter()
            .filter_map(|(name, track)| Some((name.clone(), track.get_value_at(t)?)))
            .collect()
    }

    /// Value of one track at the current progress, in any playback state
    pub fn get_value(&self, track_name: &str) -> Option<Value> {
        self.tracks.get(track_name)?.get_value_at(self.progress())
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Current time in milliseconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Normalized progress; `0.0` for a zero-length timeline
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            return 0.0;
        }
        self.current_time / self.duration_ms
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Set the speed multiplier; negative values are clamped to zero
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlayState::Finished
    }

    // =========================================================================
    // Sequencing
    // =========================================================================

    /// Merge timelines into one that plays them back to back
    ///
    /// The combined duration is the sum of the durations plus `gap_ms`
    /// between consecutive timelines. Each keyframe is re-inserted at
    /// `offset + time * scale`, where offset and scale are the source
    /// timeline's start and length relative to the combined duration. Tracks
    /// with the same name are merged into one combined track.
    pub fn sequence(timelines: &[Timeline], name: impl Into<String>, gap_ms: f64) -> Timeline {
        let name = name.into();
        if timelines.is_empty() {
            return Timeline::new(name, 0.0);
        }

        let gaps = gap_ms * (timelines.len() - 1) as f64;
        let total: f64 = timelines.iter().map(Timeline::duration_ms).sum::<f64>() + gaps;
        let mut combined = Timeline::new(name, total);

        let mut start = 0.0;
        for timeline in timelines {
            let (offset, scale) = if total > 0.0 {
                (start / total, timeline.duration_ms / total)
            } else {
                (0.0, 0.0)
            };

            for (track_name, track) in &timeline.tracks {
                if !combined.tracks.contains_key(track_name) {
                    combined.add_track_with_target(track_name.clone(), track.target());
                }
                let merged = &mut combined.tracks[track_name.as_str()];
                for kf in track.keyframes().iter() {
                    merged.add_keyframe(offset + kf.time() * scale, kf.value().clone(), kf.easing());
                }
            }

            start += timeline.duration_ms + gap_ms;
        }

        tracing::debug!(
            "Built sequence '{}' from {} timelines ({} ms)",
            combined.name,
            timelines.len(),
            total
        );
        combined
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("name", &self.name)
            .field("duration_ms", &self.duration_ms)
            .field("tracks", &self.tracks.len())
            .field("looping", &self.looping)
            .field("state", &self.state)
            .field("current_time", &self.current_time)
            .field("speed", &self.speed)
            .finish()
    }
}
