//! Score, lives and clock for one run

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// A scoring consequence of something that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Collectible caught, worth `points`
    Collect { points: u32 },
    /// Damaging hazard contact
    Hit,
    /// Hazard contact while immune
    Bounce,
    /// Fell off the bottom untouched
    Expire,
    /// Extra seconds on the clock
    TimeBonus { seconds: f32 },
    /// One life back
    RestoreLife,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub score: u32,
    pub lives: u32,
    pub time_remaining: f32,
    /// Play time since start. Only grows, bonus time does not rewind it.
    pub elapsed: f32,
    pub level: u32,
    /// Collectibles caught this run
    pub caught: u32,
    initial_time: f32,
    time_cap: f32,
    max_lives: u32,
    hit_penalty: u32,
}

impl Session {
    pub fn new(duration_secs: f32, tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.initial_lives,
            time_remaining: duration_secs,
            elapsed: 0.0,
            level: 1,
            caught: 0,
            initial_time: duration_secs,
            time_cap: tuning.max_time_secs.max(duration_secs),
            max_lives: tuning.max_lives,
            hit_penalty: tuning.hit_penalty,
        }
    }

    pub fn initial_time(&self) -> f32 {
        self.initial_time
    }

    pub fn time_cap(&self) -> f32 {
        self.time_cap
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    /// Run the clock forward by `dt` seconds
    pub fn advance_clock(&mut self, dt: f32) {
        self.time_remaining = (self.time_remaining - dt).max(0.0);
        self.elapsed += dt;
    }

    /// Apply one outcome. Returns false when it changed nothing.
    pub fn apply_outcome(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Collect { points } => {
                self.score = self.score.saturating_add(points);
                self.caught += 1;
                true
            }
            Outcome::Hit => {
                self.score = self.score.saturating_sub(self.hit_penalty);
                self.lives = self.lives.saturating_sub(1);
                true
            }
            Outcome::Bounce | Outcome::Expire => false,
            Outcome::TimeBonus { seconds } => self.add_time(seconds),
            Outcome::RestoreLife => {
                let before = self.lives;
                self.lives = (self.lives + 1).min(self.max_lives);
                self.lives != before
            }
        }
    }

    /// Add bonus seconds, capped. Returns whether the clock moved.
    pub fn add_time(&mut self, seconds: f32) -> bool {
        if !(seconds > 0.0) {
            return false;
        }
        let before = self.time_remaining;
        self.time_remaining = (self.time_remaining + seconds).min(self.time_cap);
        self.time_remaining > before
    }

    pub fn is_terminal(&self) -> bool {
        self.time_remaining <= 0.0 || self.lives == 0
    }

    /// Clock ran out with lives to spare
    pub fn did_win(&self) -> bool {
        self.is_terminal() && self.lives > 0
    }
}
