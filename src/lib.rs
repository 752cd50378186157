//! Nuvecielas - catch falling words (or stars) before the clock runs out
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, collisions, session state)
//! - `settings`: Session configuration chosen by the host before `start`
//! - `tuning`: Data-driven game balance
//! - `audio`: Sound cues the host turns into actual playback
//! - `platform`: Browser bindings for the host page

pub mod audio;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, SimError};
pub use settings::{Features, GameMode, SessionConfig};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical playfield size, independent of device pixel ratio
    pub const WORLD_WIDTH: f32 = 900.0;
    pub const WORLD_HEIGHT: f32 = 520.0;

    /// Player avatar defaults
    pub const PLAYER_RADIUS: f32 = 46.0;
    pub const PLAYER_BASE_Y: f32 = WORLD_HEIGHT - 78.0;
    pub const PLAYER_SPEED: f32 = 560.0;
    /// Gap kept between the avatar and the side walls
    pub const PLAYER_SIDE_MARGIN: f32 = 10.0;

    /// Hop on catch (pixels/s, negative is up)
    pub const JUMP_VELOCITY: f32 = -320.0;
    /// Gravity pulling the avatar back to its base line (pixels/s²)
    pub const GRAVITY: f32 = 1200.0;

    /// Word bubble geometry
    pub const WORD_HEIGHT: f32 = 38.0;
    pub const WORD_PADDING_X: f32 = 14.0;
    /// Average advance of one glyph in the bubble font
    pub const GLYPH_WIDTH: f32 = 10.5;
    /// Minimum distance of a spawned bubble from the side walls
    pub const WORD_SIDE_MARGIN: f32 = 20.0;

    /// Radii of the round falling entities
    pub const STAR_RADIUS: f32 = 16.0;
    pub const GOLDEN_STAR_RADIUS: f32 = 20.0;
    pub const CLOUD_RADIUS: f32 = 30.0;
    pub const POWERUP_RADIUS: f32 = 18.0;
    pub const BONUS_RADIUS: f32 = 17.0;

    /// Largest frame delta accepted by the loop (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;
}

/// Clamp a point to the logical playfield
#[inline]
pub fn clamp_to_world(p: Vec2) -> Vec2 {
    Vec2::new(
        p.x.clamp(0.0, consts::WORLD_WIDTH),
        p.y.clamp(0.0, consts::WORLD_HEIGHT),
    )
}

/// Horizontal range the avatar centre may occupy
#[inline]
pub fn player_x_bounds(radius: f32) -> (f32, f32) {
    let min = radius + consts::PLAYER_SIDE_MARGIN;
    let max = consts::WORLD_WIDTH - radius - consts::PLAYER_SIDE_MARGIN;
    (min, max.max(min))
}

/// Exponential approach factor for frame-rate independent smoothing
#[inline]
pub fn approach_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}
