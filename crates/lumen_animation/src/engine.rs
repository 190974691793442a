//! Animation engine
//!
//! Owns a registry of named active animations and advances all of them once
//! per [`AnimationEngine::update`] call. The engine is a plain value; each
//! owner (a screen, a mode, a widget tree) holds its own instance.
//!
//! Callbacks run synchronously inside `update`. A completion callback gets
//! `&mut AnimationEngine` and may start or stop animations: finished entries
//! are swept only after every registered animation has been advanced, and
//! entries started during a tick first advance on the next tick.

use std::collections::VecDeque;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use lumen_core::Value;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::config::EngineConfig;
use crate::easing::Easing;
use crate::presets::AnimationPreset;
use crate::timeline::{PlayState, Timeline, TrackValues};

new_key_type! {
    /// Registry slot of an active animation
    pub struct AnimationId;
}

/// Values produced by one engine tick, keyed by animation name
pub type EngineValues = IndexMap<String, TrackValues>;

/// Called with the animation's track values after each tick
pub type UpdateCallback = Box<dyn FnMut(&TrackValues)>;

/// Called once when a non-looping animation finishes
pub type EngineCallback = Box<dyn FnMut(&mut AnimationEngine)>;

/// Scheduling priority of an animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPriority {
    Background = 0,
    #[default]
    Normal = 50,
    High = 75,
    Critical = 100,
}

impl AnimationPriority {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Why an animation left the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// Removed by `stop`, `stop_group`, `stop_all` or a replacing `play`
    Stopped,
    /// Reached its end during `update`
    Completed,
}

/// Lifecycle notifications, drained by the owner with [`AnimationEngine::drain_events`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    Started { name: String },
    Ended { name: String, reason: EndReason },
}

// ============================================================================
// Play options
// ============================================================================

/// Optional parameters for [`AnimationEngine::play`]
///
/// Anything left unset falls back to the engine's [`EngineConfig`].
#[derive(Default)]
pub struct PlayOptions {
    name: Option<String>,
    priority: Option<AnimationPriority>,
    group: Option<String>,
    on_update: Option<UpdateCallback>,
    on_complete: Option<EngineCallback>,
    replace_same_name: Option<bool>,
}

impl PlayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with just a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().name(name)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn priority(mut self, priority: AnimationPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&TrackValues) + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut AnimationEngine) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn replace_same_name(mut self, replace: bool) -> Self {
        self.replace_same_name = Some(replace);
        self
    }
}

impl fmt::Debug for PlayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayOptions")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("group", &self.group)
            .field("on_update", &self.on_update.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("replace_same_name", &self.replace_same_name)
            .finish()
    }
}

// ============================================================================
// Registry entry
// ============================================================================

/// A timeline wrapped with its scheduling metadata
struct ActiveAnimation {
    name: String,
    timeline: Timeline,
    priority: AnimationPriority,
    group: String,
    on_update: Option<UpdateCallback>,
    on_complete: Option<EngineCallback>,
    /// Finished during the current tick, swept after the loop
    marked_for_removal: bool,
}

// ============================================================================
// Engine
// ============================================================================

/// Registry and driver of named animations
pub struct AnimationEngine {
    animations: SlotMap<AnimationId, ActiveAnimation>,
    /// Name index in registration order
    names: IndexMap<String, AnimationId>,
    groups: FxHashMap<String, IndexSet<String>>,
    /// Engine-wide pause; see [`AnimationEngine::pause`]
    paused: bool,
    global_speed: f64,
    auto_names: u64,
    /// Oldest first, at most `config.event_capacity` long
    events: VecDeque<EngineEvent>,
    config: EngineConfig,
}

impl AnimationEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut groups = FxHashMap::default();
        groups.insert(config.default_group.clone(), IndexSet::new());
        tracing::debug!("Creating animation engine: {:?}", config);

        Self {
            animations: SlotMap::with_key(),
            names: IndexMap::new(),
            groups,
            paused: false,
            global_speed: config.global_speed.max(0.0),
            auto_names: 0,
            events: VecDeque::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register `timeline`, start it from the beginning and return its name
    ///
    /// The name is the one in `options`, else the timeline's own name, else
    /// a generated `anim_<n>`. If an animation with that name is already
    /// registered it is stopped first when replacing is enabled; otherwise
    /// the new animation gets the smallest free suffix (`name_1`, `name_2`, ...).
    pub fn play(&mut self, mut timeline: Timeline, options: PlayOptions) -> String {
        let PlayOptions {
            name,
            priority,
            group,
            on_update,
            on_complete,
            replace_same_name,
        } = options;

        let replace = replace_same_name.unwrap_or(self.config.replace_same_name);
        let name = self.resolve_name(name, &timeline, replace);
        let priority = priority.unwrap_or(self.config.default_priority);
        let group = group.unwrap_or_else(|| self.config.default_group.clone());

        timeline.play(true);

        let id = self.animations.insert(ActiveAnimation {
            name: name.clone(),
            timeline,
            priority,
            group: group.clone(),
            on_update,
            on_complete,
            marked_for_removal: false,
        });
        self.names.insert(name.clone(), id);
        self.groups.entry(group).or_default().insert(name.clone());

        tracing::debug!("Started animation '{}' ({:?})", name, priority);
        self.record(EngineEvent::Started { name: name.clone() });
        name
    }

    fn resolve_name(&mut self, requested: Option<String>, timeline: &Timeline, replace: bool) -> String {
        let base = match requested {
            Some(name) => name,
            None if !timeline.name().is_empty() => timeline.name().to_string(),
            None => {
                let name = format!("anim_{}", self.auto_names);
                self.auto_names += 1;
                name
            }
        };

        let Some(&existing) = self.names.get(&base) else {
            return base;
        };

        if replace {
            // An entry that finished this tick is still awaiting its sweep
            let reason = match self.animations.get(existing) {
                Some(entry) if entry.marked_for_removal => EndReason::Completed,
                _ => EndReason::Stopped,
            };
            self.remove_entry(existing, reason);
            return base;
        }

        // Among len + 1 candidates at least one is free
        let free = (1..=self.names.len() + 1)
            .map(|i| format!("{}_{}", base, i))
            .find(|candidate| !self.names.contains_key(candidate));
        free.unwrap_or(base)
    }

    /// Stop and remove an animation; `false` if no such name is registered
    pub fn stop(&mut self, name: &str) -> bool {
        match self.names.get(name) {
            Some(&id) => self.remove_entry(id, EndReason::Stopped),
            None => false,
        }
    }

    /// Stop every animation in `group`, returning how many were stopped
    pub fn stop_group(&mut self, group: &str) -> usize {
        let members: Vec<String> = match self.groups.get(group) {
            Some(members) => members.iter().cloned().collect(),
            None => return 0,
        };
        let stopped = members.iter().filter(|name| self.stop(name)).count();
        tracing::debug!("Stopped {} animations in group '{}'", stopped, group);
        stopped
    }

    /// Stop every animation, returning how many were stopped
    pub fn stop_all(&mut self) -> usize {
        let ids: Vec<AnimationId> = self.names.values().copied().collect();
        let stopped = ids
            .into_iter()
            .filter(|&id| self.remove_entry(id, EndReason::Stopped))
            .count();
        tracing::debug!("Stopped all {} animations", stopped);
        stopped
    }

    fn remove_entry(&mut self, id: AnimationId, reason: EndReason) -> bool {
        let Some(mut entry) = self.animations.remove(id) else {
            return false;
        };
        if reason == EndReason::Stopped {
            entry.timeline.stop();
        }

        if self.names.get(&entry.name) == Some(&id) {
            self.names.shift_remove(&entry.name);
        }
        if let Some(members) = self.groups.get_mut(&entry.group) {
            members.shift_remove(&entry.name);
        }

        tracing::debug!("Removed animation '{}' ({:?})", entry.name, reason);
        self.record(EngineEvent::Ended {
            name: entry.name,
            reason,
        });
        true
    }

    fn record(&mut self, event: EngineEvent) {
        let capacity = self.config.event_capacity;
        if capacity == 0 {
            return;
        }
        while self.events.len() >= capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    // =========================================================================
    // Pause / resume
    // =========================================================================

    /// Pause one animation, or everything when `name` is `None`
    ///
    /// These are two different switches. `pause(None)` sets the engine-wide
    /// paused flag, which makes [`update`](Self::update) return nothing
    /// without touching any timeline, and additionally pauses every
    /// registered timeline. `pause(Some(name))` only pauses that timeline;
    /// the engine keeps ticking and the flag is left alone.
    ///
    /// Returns `false` if a named animation is not registered.
    pub fn pause(&mut self, name: Option<&str>) -> bool {
        match name {
            None => {
                self.paused = true;
                for entry in self.animations.values_mut() {
                    entry.timeline.pause();
                }
                tracing::debug!("Paused all animations");
                true
            }
            Some(name) => match self.entry_mut(name) {
                Some(entry) => {
                    entry.timeline.pause();
                    true
                }
                None => false,
            },
        }
    }

    /// Resume one animation, or everything when `name` is `None`
    ///
    /// `resume(None)` clears the engine-wide flag and resumes every paused
    /// timeline. `resume(Some(name))` resumes only that timeline and does
    /// not clear the flag, so it has no visible effect while the engine
    /// itself is paused.
    pub fn resume(&mut self, name: Option<&str>) -> bool {
        match name {
            None => {
                self.paused = false;
                for entry in self.animations.values_mut() {
                    resume_timeline(&mut entry.timeline);
                }
                tracing::debug!("Resumed all animations");
                true
            }
            Some(name) => match self.entry_mut(name) {
                Some(entry) => {
                    resume_timeline(&mut entry.timeline);
                    true
                }
                None => false,
            },
        }
    }

    /// Engine-wide pause flag
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // =========================================================================
    // Frame update
    // =========================================================================

    /// Advance every registered animation by `delta_ms` scaled by the global speed
    ///
    /// Animations are advanced in registration order, each exactly once,
    /// and the returned map holds each one's track values. Finished
    /// animations report their final values, fire their completion
    /// callback and are removed after the loop. Returns an empty map while
    /// the engine is paused.
    pub fn update(&mut self, delta_ms: f64) -> EngineValues {
        let mut results = EngineValues::new();
        if self.paused {
            return results;
        }

        let scaled = delta_ms * self.global_speed;
        let ids: SmallVec<[AnimationId; 16]> = self.names.values().copied().collect();
        let mut completed: SmallVec<[AnimationId; 8]> = SmallVec::new();

        for id in ids {
            // Stopped by an earlier callback in this tick
            let Some(entry) = self.animations.get_mut(id) else {
                continue;
            };
            if entry.marked_for_removal {
                continue;
            }

            let values = entry.timeline.update(scaled);
            if let Some(on_update) = entry.on_update.as_mut() {
                on_update(&values);
            }

            let finished = entry.timeline.is_finished();
            let on_complete = if finished {
                entry.marked_for_removal = true;
                entry.on_complete.take()
            } else {
                None
            };
            results.insert(entry.name.clone(), values);

            if finished {
                tracing::trace!("Animation finished: {:?}", id);
                completed.push(id);
                if let Some(mut on_complete) = on_complete {
                    on_complete(self);
                }
            }
        }

        tracing::trace!(
            "Tick {:.2} ms: {} advanced, {} completed",
            scaled,
            results.len(),
            completed.len()
        );
        for id in completed {
            self.remove_entry(id, EndReason::Completed);
        }

        results
    }

    /// Take all lifecycle events recorded since the last drain
    ///
    /// Only the newest [`EngineConfig::event_capacity`] events are kept
    /// between drains; an owner that never drains holds a bounded buffer.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current value of one track of one animation
    pub fn get_value(&self, animation: &str, track: &str) -> Option<Value> {
        self.entry(animation)?.timeline.get_value(track)
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.entry(name)
            .is_some_and(|entry| entry.timeline.is_playing())
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn animation(&self, name: &str) -> Option<&Timeline> {
        self.entry(name).map(|entry| &entry.timeline)
    }

    pub fn animation_mut(&mut self, name: &str) -> Option<&mut Timeline> {
        self.entry_mut(name).map(|entry| &mut entry.timeline)
    }

    pub fn priority(&self, name: &str) -> Option<AnimationPriority> {
        self.entry(name).map(|entry| entry.priority)
    }

    pub fn group_of(&self, name: &str) -> Option<&str> {
        self.entry(name).map(|entry| entry.group.as_str())
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Names registered in `group`, in registration order
    pub fn animations_in_group(&self, group: &str) -> Vec<String> {
        self.groups
            .get(group)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every group ever used, sorted by name
    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = self.groups.keys().cloned().collect();
        groups.sort();
        groups
    }

    /// Animation names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn global_speed(&self) -> f64 {
        self.global_speed
    }

    /// Set the multiplier applied to every `update` delta; clamped to >= 0
    pub fn set_global_speed(&mut self, speed: f64) {
        self.global_speed = speed.max(0.0);
    }

    fn entry(&self, name: &str) -> Option<&ActiveAnimation> {
        self.animations.get(*self.names.get(name)?)
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut ActiveAnimation> {
        self.animations.get_mut(*self.names.get(name)?)
    }

    // =========================================================================
    // Convenience
    // =========================================================================

    /// Build one timeline playing `timelines` back to back
    pub fn create_sequence(timelines: &[Timeline], name: impl Into<String>, gap_ms: f64) -> Timeline {
        Timeline::sequence(timelines, name, gap_ms)
    }

    // Preset shortcuts: the name defaults to the preset's own (`"fade_in"`,
    // `"slide"`, ...) unless `options` sets one.

    pub fn fade_in(&mut self, duration_ms: f64, options: PlayOptions) -> String {
        self.play(AnimationPreset::fade_in(duration_ms), options)
    }

    pub fn fade_out(&mut self, duration_ms: f64, options: PlayOptions) -> String {
        self.play(AnimationPreset::fade_out(duration_ms), options)
    }

    pub fn scale_bounce(
        &mut self,
        start: f64,
        end: f64,
        duration_ms: f64,
        options: PlayOptions,
    ) -> String {
        self.play(AnimationPreset::scale_bounce(start, end, duration_ms), options)
    }

    pub fn color_pulse(
        &mut self,
        from: impl Into<Value>,
        to: impl Into<Value>,
        duration_ms: f64,
        options: PlayOptions,
    ) -> String {
        self.play(AnimationPreset::color_pulse(from, to, duration_ms), options)
    }

    pub fn slide(
        &mut self,
        start: impl Into<Value>,
        end: impl Into<Value>,
        duration_ms: f64,
        easing: Easing,
        options: PlayOptions,
    ) -> String {
        self.play(AnimationPreset::slide(start, end, duration_ms, easing), options)
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnimationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationEngine")
            .field("animations", &self.names.keys().collect::<Vec<_>>())
            .field("paused", &self.paused)
            .field("global_speed", &self.global_speed)
            .field("pending_events", &self.events.len())
            .finish()
    }
}

/// Paused timelines continue; other states are left as they are
fn resume_timeline(timeline: &mut Timeline) {
    if timeline.state() == PlayState::Paused {
        timeline.play(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const EPS: f64 = 1e-9;

    fn ramp(name: &str, duration_ms: f64) -> Timeline {
        let mut timeline = Timeline::new(name, duration_ms);
        timeline
            .add_track("x")
            .add_keyframe(0.0, 0.0, Easing::Linear)
            .add_keyframe(1.0, 100.0, Easing::Linear);
        timeline
    }

    fn x(engine: &AnimationEngine, name: &str) -> f64 {
        engine.get_value(name, "x").and_then(|v| v.as_f64()).unwrap()
    }

    #[test]
    fn test_priority_values() {
        assert_eq!(AnimationPriority::Background.value(), 0);
        assert_eq!(AnimationPriority::Normal.value(), 50);
        assert_eq!(AnimationPriority::High.value(), 75);
        assert_eq!(AnimationPriority::Critical.value(), 100);
        assert!(AnimationPriority::Critical > AnimationPriority::High);
        assert_eq!(AnimationPriority::default(), AnimationPriority::Normal);
    }

    #[test]
    fn test_play_registers_and_starts() {
        let mut engine = AnimationEngine::new();
        let name = engine.play(ramp("slide", 1000.0), PlayOptions::new());

        assert_eq!(name, "slide");
        assert!(engine.has_animation("slide"));
        assert!(engine.is_playing("slide"));
        assert_eq!(engine.priority("slide"), Some(AnimationPriority::Normal));
        assert_eq!(engine.group_of("slide"), Some("default"));
        assert_eq!(engine.animations_in_group("default"), vec!["slide"]);
    }

    #[test]
    fn test_generated_names() {
        let mut engine = AnimationEngine::new();
        let a = engine.play(ramp("", 100.0), PlayOptions::new());
        let b = engine.play(ramp("", 100.0), PlayOptions::new());
        assert_eq!(a, "anim_0");
        assert_eq!(b, "anim_1");
    }

    #[test]
    fn test_replace_same_name() {
        let mut engine = AnimationEngine::new();
        engine.play(ramp("first", 1000.0), PlayOptions::named("x"));
        engine.drain_events();

        let name = engine.play(
            ramp("second", 2000.0),
            PlayOptions::named("x").replace_same_name(true),
        );

        assert_eq!(name, "x");
        assert_eq!(engine.animation_count(), 1);
        assert_eq!(engine.animation("x").map(Timeline::name), Some("second"));
        assert_eq!(engine.animations_in_group("default"), vec!["x"]);
        assert_eq!(
            engine.drain_events(),
            vec![
                EngineEvent::Ended {
                    name: "x".to_string(),
                    reason: EndReason::Stopped
                },
                EngineEvent::Started {
                    name: "x".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_suffix_names_without_replace() {
        let mut engine = AnimationEngine::new();
        let options = || PlayOptions::named("x").replace_same_name(false);

        assert_eq!(engine.play(ramp("a", 100.0), options()), "x");
        assert_eq!(engine.play(ramp("b", 100.0), options()), "x_1");
        assert_eq!(engine.play(ramp("c", 100.0), options()), "x_2");

        // Smallest free suffix is reused
        engine.stop("x_1");
        assert_eq!(engine.play(ramp("d", 100.0), options()), "x_1");
        assert_eq!(engine.animation_count(), 3);
    }

    #[test]
    fn test_config_defaults_apply() {
        let config = EngineConfig {
            global_speed: 2.0,
            default_group: "ui".to_string(),
            default_priority: AnimationPriority::High,
            replace_same_name: false,
            ..EngineConfig::default()
        };
        let mut engine = AnimationEngine::with_config(config);
        engine.play(ramp("a", 1000.0), PlayOptions::new());
        let second = engine.play(ramp("a", 1000.0), PlayOptions::new());

        assert_eq!(second, "a_1");
        assert_eq!(engine.group_of("a"), Some("ui"));
        assert_eq!(engine.priority("a"), Some(AnimationPriority::High));

        engine.update(100.0);
        assert!((x(&engine, "a") - 20.0).abs() < EPS);
    }

    #[test]
    fn test_stop() {
        let mut engine = AnimationEngine::new();
        engine.play(ramp("a", 1000.0), PlayOptions::new());

        assert!(engine.stop("a"));
        assert!(!engine.has_animation("a"));
        assert!(engine.animations_in_group("default").is_empty());
        assert!(!engine.stop("a"));
    }

    #[test]
    fn test_missing_names_are_neutral() {
        let mut engine = AnimationEngine::new();
        assert!(!engine.stop("ghost"));
        assert!(!engine.is_playing("ghost"));
        assert!(engine.get_value("ghost", "x").is_none());
        assert!(!engine.pause(Some("ghost")));
        assert!(!engine.resume(Some("ghost")));
        assert_eq!(engine.stop_group("ghosts"), 0);

        engine.play(ramp("a", 1000.0), PlayOptions::new());
        assert!(engine.get_value("a", "missing_track").is_none());
    }

    #[test]
    fn test_stop_group_and_stop_all() {
        let mut engine = AnimationEngine::new();
        engine.play(ramp("a", 1000.0), PlayOptions::new().group("hud"));
        engine.play(ramp("b", 1000.0), PlayOptions::new().group("hud"));
        engine.play(ramp("c", 1000.0), PlayOptions::new());

        assert_eq!(engine.groups(), vec!["default", "hud"]);
        assert_eq!(engine.animations_in_group("hud"), vec!["a", "b"]);

        assert_eq!(engine.stop_group("hud"), 2);
        assert_eq!(engine.names().collect::<Vec<_>>(), vec!["c"]);

        engine.play(ramp("d", 1000.0), PlayOptions::new());
        assert_eq!(engine.stop_all(), 2);
        assert_eq!(engine.animation_count(), 0);
    }

    #[test]
    fn test_update_advances_in_order() {
        let mut engine = AnimationEngine::new();
        engine.play(ramp("b", 1000.0), PlayOptions::new());
        engine.play(ramp("a", 500.0), PlayOptions::new());

        let values = engine.update(250.0);
        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(values["b"]["x"], Value::Float(25.0));
        assert_eq!(values["a"]["x"], Value::Float(50.0));
    }

    #[test]
    fn test_global_pause_short_circuits_update() {
        let mut engine = AnimationEngine::new();
        engine.play(ramp("a", 1000.0), PlayOptions::new());

        engine.pause(None);
        assert!(engine.is_paused());
        assert!(!engine.is_playing("a"));
        assert!(engine.update(100.0).is_empty());

        engine.resume(None);
        assert!(!engine.is_paused());
        assert!(engine.is_playing("a"));
        engine.update(100.0);
        assert!((x(&engine, "a") - 10.0).abs() < EPS);
    }

    #[test]
    fn test_named_pause_leaves_engine_running() {
        let mut engine = AnimationEngine::new();
        engine.play(ramp("a", 1000.0), PlayOptions::new());
        engine.play(ramp("b", 1000.0), PlayOptions::new());

        engine.pause(Some("a"));
        assert!(!engine.is_paused());
        assert_eq!(engine.animation("a").map(Timeline::state), Some(PlayState::Paused));

        let values = engine.update(100.0);
        // Paused animations still report their values
        assert_eq!(values["a"]["x"], Value::Float(0.0));
        assert_eq!(values["b"]["x"], Value::Float(10.0));

        engine.resume(Some("a"));
        engine.update(100.0);
        assert!((x(&engine, "a") - 10.0).abs() < EPS);
    }

    #[test]
    fn test_named_resume_does_not_clear_global_pause() {
        let mut engine = AnimationEngine::new();
        engine.play(ramp("a", 1000.0), PlayOptions::new());

        engine.pause(None);
        engine.resume(Some("a"));
        assert!(engine.is_paused());
        assert!(engine.is_playing("a"));
        assert!(engine.update(100.0).is_empty());
        assert_eq!(x(&engine, "a"), 0.0);
    }

    #[test]
    fn test_global_speed_scales_delta() {
        let mut engine = AnimationEngine::new();
        engine.play(ramp("a", 1000.0), PlayOptions::new());

        engine.set_global_speed(0.5);
        engine.update(200.0);
        assert!((x(&engine, "a") - 10.0).abs() < EPS);

        engine.set_global_speed(-3.0);
        assert_eq!(engine.global_speed(), 0.0);
        engine.update(200.0);
        assert!((x(&engine, "a") - 10.0).abs() < EPS);
    }

    #[test]
    fn test_completion_removes_after_final_values() {
        let completed = Rc::new(Cell::new(0));
        let counter = completed.clone();
        let mut engine = AnimationEngine::new();
        engine.play(
            ramp("a", 100.0),
            PlayOptions::new().on_complete(move |_| counter.set(counter.get() + 1)),
        );

        let values = engine.update(150.0);
        assert_eq!(values["a"]["x"], Value::Float(100.0));
        assert_eq!(completed.get(), 1);
        assert!(!engine.has_animation("a"));

        engine.update(150.0);
        assert_eq!(completed.get(), 1);
    }

    #[test]
    fn test_on_update_receives_values() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut engine = AnimationEngine::new();
        engine.play(
            ramp("a", 1000.0),
            PlayOptions::new().on_update(move |values| {
                sink.borrow_mut().push(values["x"].as_f64().unwrap_or_default());
            }),
        );

        engine.update(100.0);
        engine.update(100.0);
        assert_eq!(*seen.borrow(), vec![10.0, 20.0]);
    }

    #[test]
    fn test_on_complete_can_chain_animations() {
        let mut engine = AnimationEngine::new();
        engine.play(
            ramp("first", 100.0),
            PlayOptions::new().on_complete(|engine| {
                engine.play(ramp("second", 100.0), PlayOptions::new());
            }),
        );

        let values = engine.update(100.0);
        assert!(values.contains_key("first"));
        // Started mid-tick: registered but not advanced yet
        assert!(!values.contains_key("second"));
        assert!(engine.has_animation("second"));
        assert!(!engine.has_animation("first"));
        assert_eq!(x(&engine, "second"), 0.0);

        engine.update(50.0);
        assert!((x(&engine, "second") - 50.0).abs() < EPS);
    }

    #[test]
    fn test_on_complete_can_stop_later_entries() {
        let mut engine = AnimationEngine::new();
        engine.play(
            ramp("short", 100.0),
            PlayOptions::new().on_complete(|engine| {
                engine.stop("long");
            }),
        );
        engine.play(ramp("long", 1000.0), PlayOptions::new());

        let values = engine.update(100.0);
        assert!(values.contains_key("short"));
        assert!(!values.contains_key("long"));
        assert_eq!(engine.animation_count(), 0);
    }

    #[test]
    fn test_on_complete_restart_same_name() {
        let mut engine = AnimationEngine::new();
        engine.play(
            ramp("blink", 100.0),
            PlayOptions::new().on_complete(|engine| {
                engine.play(ramp("blink", 200.0), PlayOptions::new());
            }),
        );
        engine.drain_events();

        engine.update(100.0);
        assert!(engine.has_animation("blink"));
        assert_eq!(engine.animation("blink").map(Timeline::duration_ms), Some(200.0));
        assert_eq!(
            engine.drain_events(),
            vec![
                EngineEvent::Ended {
                    name: "blink".to_string(),
                    reason: EndReason::Completed
                },
                EngineEvent::Started {
                    name: "blink".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_events_are_drained() {
        let mut engine = AnimationEngine::new();
        engine.play(ramp("a", 100.0), PlayOptions::new());
        engine.play(ramp("b", 1000.0), PlayOptions::new());
        engine.update(100.0);
        engine.stop("b");

        assert_eq!(
            engine.drain_events(),
            vec![
                EngineEvent::Started { name: "a".to_string() },
                EngineEvent::Started { name: "b".to_string() },
                EngineEvent::Ended {
                    name: "a".to_string(),
                    reason: EndReason::Completed
                },
                EngineEvent::Ended {
                    name: "b".to_string(),
                    reason: EndReason::Stopped
                },
            ]
        );
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_looping_animation_stays_registered() {
        let mut engine = AnimationEngine::new();
        engine.color_pulse((0, 0, 0), (100, 100, 100), 1000.0, PlayOptions::named("pulse"));
        engine.update(2500.0);
        assert!(engine.is_playing("pulse"));
        assert_eq!(engine.get_value("pulse", "color"), Some(Value::from((100, 100, 100))));
    }

    #[test]
    fn test_preset_shortcuts() {
        let mut engine = AnimationEngine::new();
        assert_eq!(engine.fade_in(300.0, PlayOptions::new()), "fade_in");
        assert_eq!(engine.fade_out(300.0, PlayOptions::named("out")), "out");
        assert_eq!(
            engine.scale_bounce(0.5, 1.0, 300.0, PlayOptions::named("pop")),
            "pop"
        );
        assert_eq!(
            engine.slide(
                (0.0, 0.0),
                (10.0, 0.0),
                300.0,
                Easing::EaseOutCubic,
                PlayOptions::new()
            ),
            "slide"
        );
        assert_eq!(engine.animation_count(), 4);

        engine.update(300.0);
        assert_eq!(engine.animation_count(), 0);
    }

    #[test]
    fn test_preset_shortcuts_forward_options() {
        let completed = Rc::new(Cell::new(0));
        let counter = completed.clone();
        let updates = Rc::new(Cell::new(0));
        let ticks = updates.clone();

        let mut engine = AnimationEngine::new();
        let name = engine.fade_in(
            100.0,
            PlayOptions::named("hud_fade")
                .group("hud")
                .priority(AnimationPriority::Critical)
                .on_update(move |_| ticks.set(ticks.get() + 1))
                .on_complete(move |_| counter.set(counter.get() + 1)),
        );
        assert_eq!(engine.group_of(&name), Some("hud"));
        assert_eq!(engine.priority(&name), Some(AnimationPriority::Critical));

        engine.fade_in(100.0, PlayOptions::named("hud_fade").replace_same_name(false));
        assert_eq!(engine.animations_in_group("default"), vec!["hud_fade_1"]);

        engine.update(100.0);
        assert_eq!(updates.get(), 1);
        assert_eq!(completed.get(), 1);
    }

    #[test]
    fn test_event_buffer_is_bounded() {
        let config = EngineConfig {
            event_capacity: 4,
            ..EngineConfig::default()
        };
        let mut engine = AnimationEngine::with_config(config);
        for _ in 0..1000 {
            engine.play(ramp("blip", 10.0), PlayOptions::new());
            engine.update(10.0);
        }
        assert_eq!(engine.animation_count(), 0);

        let events = engine.drain_events();
        assert_eq!(events.len(), 4);
        // Newest events survive
        assert_eq!(
            events[3],
            EngineEvent::Ended {
                name: "blip".to_string(),
                reason: EndReason::Completed
            }
        );
    }

    #[test]
    fn test_default_event_buffer_stays_small_without_drain() {
        let mut engine = AnimationEngine::new();
        for _ in 0..5000 {
            engine.play(ramp("blip", 10.0), PlayOptions::new());
            engine.update(10.0);
        }
        assert_eq!(
            engine.drain_events().len(),
            EngineConfig::default().event_capacity
        );
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let config = EngineConfig {
            event_capacity: 0,
            ..EngineConfig::default()
        };
        let mut engine = AnimationEngine::with_config(config);
        engine.play(ramp("a", 10.0), PlayOptions::new());
        engine.update(10.0);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_create_sequence() {
        let combined =
            AnimationEngine::create_sequence(&[ramp("a", 300.0), ramp("b", 200.0)], "ab", 0.0);
        assert_eq!(combined.duration_ms(), 500.0);
        assert_eq!(combined.name(), "ab");
    }
}
