//! Difficulty levels, scene crossfades and the day/night blend
//!
//! The level is a pure function of elapsed play time. Spawn parameters scale
//! linearly with it and are recomputed only when it changes.

use serde::{Deserialize, Serialize};

use crate::approach_factor;
use crate::settings::Features;
use crate::tuning::Tuning;

/// Level for a given amount of elapsed play time
pub fn level_for_elapsed(elapsed_secs: f32, tuning: &Tuning) -> u32 {
    if !(elapsed_secs > 0.0) {
        return 1;
    }
    let steps = (elapsed_secs / tuning.level_step_secs).floor();
    // Float-to-int casts saturate, so huge elapsed values stay in range
    (1u32.saturating_add(steps as u32)).clamp(1, tuning.max_level)
}

/// Spawn parameters derived from the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub level: u32,
    /// Fall speed range for collectibles (pixels/s)
    pub speed_min: f32,
    pub speed_max: f32,
    pub hazard_speed_min: f32,
    pub hazard_speed_max: f32,
    /// Seconds between regular primary spawns
    pub primary_interval: f32,
    /// Seconds between hazard spawns
    pub hazard_interval: f32,
    /// Range the next powerup arrival is drawn from (seconds)
    pub powerup_range: (f32, f32),
    pub bonus_range: (f32, f32),
}

impl Difficulty {
    pub fn for_level(level: u32, tuning: &Tuning) -> Self {
        let steps = level.saturating_sub(1) as f32;
        let speed_scale = 1.0 + tuning.speed_step_per_level * steps;

        let shrink = |min: f32, max: f32| {
            let lo = (min - tuning.arrival_step * steps).max(tuning.arrival_floor.min(min));
            let hi = (max - tuning.arrival_step * steps).max(lo);
            (lo, hi)
        };

        Self {
            level,
            speed_min: tuning.speed_min * speed_scale,
            speed_max: tuning.speed_max * speed_scale,
            hazard_speed_min: tuning.hazard_speed_min * speed_scale,
            hazard_speed_max: tuning.hazard_speed_max * speed_scale,
            primary_interval: (tuning.primary_interval - tuning.primary_interval_step * steps)
                .max(tuning.primary_min_interval),
            hazard_interval: (tuning.hazard_interval - tuning.hazard_interval_step * steps)
                .max(tuning.hazard_min_interval),
            powerup_range: shrink(tuning.powerup_interval_min, tuning.powerup_interval_max),
            bonus_range: shrink(tuning.bonus_interval_min, tuning.bonus_interval_max),
        }
    }
}

/// Crossfade between two background presentations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneTransition {
    pub from: u32,
    pub to: u32,
    /// 0 at the start of the fade, 1 when done
    pub progress: f32,
}

/// Level state machine plus the presentation state keyed to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelMachine {
    level: u32,
    difficulty: Difficulty,
    scene: u32,
    transition: Option<SceneTransition>,
    /// 0 = day, 1 = night
    night: f32,
    night_target: f32,
    scene_transitions: bool,
    day_night: bool,
}

impl LevelMachine {
    pub fn new(tuning: &Tuning, features: &Features) -> Self {
        let mut machine = Self {
            level: 1,
            difficulty: Difficulty::for_level(1, tuning),
            scene: 0,
            transition: None,
            night: 0.0,
            night_target: 0.0,
            scene_transitions: features.scene_transitions,
            day_night: features.day_night,
        };
        machine.night_target = machine.target_for(1, tuning);
        machine.night = machine.night_target;
        machine
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn scene(&self) -> u32 {
        self.scene
    }

    pub fn transition(&self) -> Option<SceneTransition> {
        self.transition
    }

    pub fn night(&self) -> f32 {
        self.night
    }

    /// Advance one frame. Returns the new level when it changed.
    pub fn update(&mut self, elapsed_secs: f32, dt: f32, tuning: &Tuning) -> Option<u32> {
        let computed = level_for_elapsed(elapsed_secs, tuning);
        let changed = if computed > self.level {
            self.enter_level(computed, tuning);
            Some(computed)
        } else {
            None
        };

        if let Some(t) = self.transition.as_mut() {
            t.progress = (t.progress + tuning.crossfade_rate * dt).min(1.0);
            if t.progress >= 1.0 {
                self.scene = t.to;
                self.transition = None;
            }
        }

        self.night += (self.night_target - self.night) * approach_factor(tuning.environment_rate, dt);

        changed
    }

    fn enter_level(&mut self, level: u32, tuning: &Tuning) {
        log::info!("Level {} -> {}", self.level, level);
        self.level = level;
        self.difficulty = Difficulty::for_level(level, tuning);

        if self.scene_transitions && tuning.scene_count > 1 {
            let to = (level - 1) % tuning.scene_count;
            // A fade still running snaps to its target before the next starts
            let from = self.transition.map(|t| t.to).unwrap_or(self.scene);
            self.scene = from;
            if to != from {
                self.transition = Some(SceneTransition { from, to, progress: 0.0 });
                log::info!("Scene {} -> {}", from, to);
            } else {
                self.transition = None;
            }
        }

        self.night_target = self.target_for(level, tuning);
    }

    /// Night on alternate pairs of levels (3-4, 7-8, ...) unless overridden
    fn target_for(&self, level: u32, tuning: &Tuning) -> f32 {
        if !self.day_night {
            return 0.0;
        }
        let night = tuning
            .night_overrides
            .iter()
            .find(|o| o.level == level)
            .map(|o| o.night)
            .unwrap_or(((level - 1) / 2) % 2 == 1);
        if night { 1.0 } else { 0.0 }
    }
}
