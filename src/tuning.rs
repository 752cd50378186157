//! Data-driven game balance
//!
//! Every magnitude the simulation uses (cadences, speeds, effect durations,
//! score deltas) lives here so variants differ only by data. Loadable from
//! JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::level::Difficulty;

/// Forces a level to day or night regardless of the alternating pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightOverride {
    pub level: u32,
    pub night: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Levels ===
    pub max_level: u32,
    /// Seconds of play per level
    pub level_step_secs: f32,
    /// Background presentations cycled through on level change
    pub scene_count: u32,
    /// Crossfade progress per second (1.4 = ~0.71 s fade)
    pub crossfade_rate: f32,
    /// Smoothing constant for the day/night blend
    pub environment_rate: f32,
    pub night_overrides: Vec<NightOverride>,

    // === Session ===
    pub initial_lives: u32,
    pub max_lives: u32,
    /// Cap for time remaining after bonus pickups (never below the session length)
    pub max_time_secs: f32,
    pub bonus_time_secs: f32,

    // === Scoring ===
    pub word_value: u32,
    pub star_value: u32,
    pub golden_star_value: u32,
    pub powerup_value: u32,
    pub hit_penalty: u32,

    // === Effects (milliseconds) ===
    pub magnet_ms: f64,
    pub shield_ms: f64,
    /// Collection block applied after a damaging hit
    pub hit_block_ms: f64,

    // === Magnet ===
    pub magnet_radius: f32,
    pub magnet_strength: f32,
    /// Fraction of the pull applied vertically
    pub magnet_vertical_factor: f32,
    /// Added to the player radius while the magnet is active
    pub magnet_catch_bonus: f32,

    // === Primary collectible cadence ===
    pub initial_primary: u32,
    pub primary_floor: u32,
    pub primary_ceiling: u32,
    pub primary_fast_interval: f32,
    pub primary_interval: f32,
    pub primary_interval_step: f32,
    pub primary_min_interval: f32,
    pub double_spawn_chance: f64,
    pub golden_star_chance: f64,

    // === Hazards ===
    pub hazard_interval: f32,
    pub hazard_interval_step: f32,
    pub hazard_min_interval: f32,
    pub hazard_speed_min: f32,
    pub hazard_speed_max: f32,

    // === Fall speeds ===
    pub speed_min: f32,
    pub speed_max: f32,
    /// Fractional speed increase per level above 1
    pub speed_step_per_level: f32,

    // === Randomized arrivals (seconds) ===
    pub powerup_interval_min: f32,
    pub powerup_interval_max: f32,
    pub bonus_interval_min: f32,
    pub bonus_interval_max: f32,
    /// Both arrival ranges shrink by this much per level
    pub arrival_step: f32,
    /// Lowest lower bound an arrival range may reach
    pub arrival_floor: f32,

    // === Content ===
    pub recent_window: usize,
    pub bag_retries: u32,
    /// Probability a word draw honours the expected role
    pub coherence: f64,

    // === Presentation ===
    pub offscreen_margin: f32,
    pub wobble_amplitude: f32,
    pub wobble_period_secs: f32,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_level: 5,
            level_step_secs: 12.0,
            scene_count: 4,
            crossfade_rate: 1.4,
            environment_rate: 2.5,
            night_overrides: Vec::new(),

            initial_lives: 3,
            max_lives: 5,
            max_time_secs: 90.0,
            bonus_time_secs: 5.0,

            word_value: 1,
            star_value: 1,
            golden_star_value: 5,
            powerup_value: 2,
            hit_penalty: 3,

            magnet_ms: 5000.0,
            shield_ms: 4000.0,
            hit_block_ms: 900.0,

            magnet_radius: 220.0,
            magnet_strength: 260.0,
            magnet_vertical_factor: 0.15,
            magnet_catch_bonus: 95.0,

            initial_primary: 12,
            primary_floor: 12,
            primary_ceiling: 16,
            primary_fast_interval: 0.18,
            primary_interval: 0.45,
            primary_interval_step: 0.04,
            primary_min_interval: 0.2,
            double_spawn_chance: 0.35,
            golden_star_chance: 0.1,

            hazard_interval: 1.6,
            hazard_interval_step: 0.2,
            hazard_min_interval: 0.5,
            hazard_speed_min: 140.0,
            hazard_speed_max: 230.0,

            speed_min: 125.0,
            speed_max: 220.0,
            speed_step_per_level: 0.12,

            powerup_interval_min: 8.0,
            powerup_interval_max: 14.0,
            bonus_interval_min: 12.0,
            bonus_interval_max: 20.0,
            arrival_step: 0.5,
            arrival_floor: 3.0,

            recent_window: 10,
            bag_retries: 8,
            coherence: 0.75,

            offscreen_margin: 60.0,
            wobble_amplitude: 3.0,
            wobble_period_secs: 0.42,
            max_particles: 256,
        }
    }
}

impl Tuning {
    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: &str| Err(ConfigError::InvalidTuning(msg.to_string()));

        if self.max_level == 0 {
            return fail("max_level must be at least 1");
        }
        if !(self.level_step_secs > 0.0) {
            return fail("level_step_secs must be positive");
        }
        if self.primary_floor > self.primary_ceiling {
            return fail("primary_floor exceeds primary_ceiling");
        }
        if !(self.speed_min > 0.0 && self.speed_min <= self.speed_max) {
            return fail("speed range is empty");
        }
        if !(self.hazard_speed_min > 0.0 && self.hazard_speed_min <= self.hazard_speed_max) {
            return fail("hazard speed range is empty");
        }
        if !(self.primary_min_interval > 0.0 && self.hazard_min_interval > 0.0) {
            return fail("spawn intervals must be positive");
        }
        if !(self.powerup_interval_min > 0.0 && self.powerup_interval_min <= self.powerup_interval_max)
        {
            return fail("powerup arrival range is empty");
        }
        if !(self.bonus_interval_min > 0.0 && self.bonus_interval_min <= self.bonus_interval_max) {
            return fail("bonus arrival range is empty");
        }
        if !(0.0..=1.0).contains(&self.coherence) {
            return fail("coherence must be within 0..=1");
        }
        if !(0.0..=1.0).contains(&self.double_spawn_chance)
            || !(0.0..=1.0).contains(&self.golden_star_chance)
        {
            return fail("spawn chances must be within 0..=1");
        }
        if self.bag_retries == 0 {
            return fail("bag_retries must be at least 1");
        }
        if self.initial_lives == 0 || self.initial_lives > self.max_lives {
            return fail("initial_lives must be within 1..=max_lives");
        }
        let steps = [
            self.speed_step_per_level,
            self.primary_interval_step,
            self.hazard_interval_step,
            self.arrival_step,
        ];
        if !steps.iter().all(|s| s.is_finite() && *s >= 0.0) {
            return fail("per-level steps must be finite and non-negative");
        }
        // Speeds scale with the level, so the top level must still sample
        let top = Difficulty::for_level(self.max_level, self);
        let sane = |min: f32, max: f32| min > 0.0 && min <= max && max.is_finite();
        if !sane(top.speed_min, top.speed_max) || !sane(top.hazard_speed_min, top.hazard_speed_max) {
            return fail("speed range is empty or unbounded at the top level");
        }
        Ok(())
    }

    /// Seconds of elapsed play after which the top level is reached
    pub fn max_level_elapsed(&self) -> f32 {
        (self.max_level - 1) as f32 * self.level_step_secs
    }
}
