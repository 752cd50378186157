//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded (or injected) RNG only
//! - Effect timing from the simulation clock, never wall time
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod content;
pub mod effects;
pub mod input;
pub mod level;
pub mod particles;
pub mod physics;
pub mod session;
pub mod spawner;
pub mod state;
pub mod story;
pub mod tick;
pub mod wordbank;

pub use collision::{Contact, circle_circle, circle_rect, player_overlap};
pub use content::{ContentProvider, WordItem};
pub use effects::{EffectKind, StatusEffects};
pub use input::{InputEvent, InputState, Key};
pub use level::{Difficulty, LevelMachine, SceneTransition, level_for_elapsed};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use physics::{Resolution, Touch, advance};
pub use session::{Outcome, Session};
pub use spawner::{EntityFactory, SpawnContext, Spawner};
pub use state::{
    BonusKind, Entity, EntityKind, GameEvent, Phase, Player, PowerupKind, Shape,
};
pub use story::Story;
pub use tick::{ActiveEffect, EntityView, FrameResult, Hud, SessionSnapshot, Simulation};
pub use wordbank::{PROFILES, Profile, Role, profile};
