//! Per-frame integration and collision classification
//!
//! Every entity is tested against the player position taken at the top of
//! the frame, so the outcome never depends on iteration order. The entity
//! list is only replaced when the whole frame succeeds.

use glam::Vec2;

use super::collision::player_overlap;
use super::effects::{EffectKind, StatusEffects};
use super::state::{Entity, Player};
use crate::error::SimError;
use crate::tuning::Tuning;

/// An entity removed by touching the player
#[derive(Debug, Clone, PartialEq)]
pub struct Touch {
    pub entity: Entity,
    /// Where the contact happened
    pub point: Vec2,
}

/// What happened to the entities this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub collected: Vec<Touch>,
    pub hit: Vec<Touch>,
    pub bounced: Vec<Touch>,
    /// Collectibles that overlapped while collection was blocked (kept)
    pub blocked: Vec<u32>,
    pub expired: Vec<Entity>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.collected.is_empty()
            && self.hit.is_empty()
            && self.bounced.is_empty()
            && self.blocked.is_empty()
            && self.expired.is_empty()
    }
}

/// Move every entity by `dt` and classify player contacts
pub fn advance(
    entities: &mut Vec<Entity>,
    player: &Player,
    effects: &StatusEffects,
    now_ms: f64,
    dt: f32,
    tuning: &Tuning,
) -> Result<Resolution, SimError> {
    let player_pos = player.pos;
    if !player_pos.is_finite() {
        return Err(SimError::NonFinitePlayer);
    }

    let magnet = effects.is_active(EffectKind::Magnet, now_ms);
    let block = effects.is_active(EffectKind::Block, now_ms);
    let immune = effects.is_active(EffectKind::Immune, now_ms);

    let mut kept = Vec::with_capacity(entities.len());
    let mut out = Resolution::default();

    for entity in entities.iter() {
        let mut e = entity.clone();
        let collectible = e.kind.is_collectible();

        e.pos.y += e.vy * dt;
        if magnet && collectible {
            e.pos += magnet_nudge(e.pos, player_pos, dt, tuning);
        }
        if !e.pos.is_finite() {
            return Err(SimError::NonFiniteEntity { id: e.id });
        }

        let catch_radius = if magnet && collectible {
            player.radius + tuning.magnet_catch_bonus
        } else {
            player.radius
        };

        match player_overlap(player_pos, catch_radius, e.pos, e.shape) {
            Some(_) if collectible && block => {
                out.blocked.push(e.id);
                kept.push(e);
            }
            Some(contact) if collectible => out.collected.push(Touch {
                point: contact.point,
                entity: e,
            }),
            Some(contact) if immune => out.bounced.push(Touch {
                point: contact.point,
                entity: e,
            }),
            Some(contact) => out.hit.push(Touch {
                point: contact.point,
                entity: e,
            }),
            None if e.is_below(tuning.offscreen_margin) => out.expired.push(e),
            None => kept.push(e),
        }
    }

    *entities = kept;
    Ok(out)
}

/// Direct position nudge toward the player, weaker vertically
fn magnet_nudge(pos: Vec2, player: Vec2, dt: f32, tuning: &Tuning) -> Vec2 {
    let delta = player - pos;
    let dist = delta.length();
    if dist > tuning.magnet_radius || dist < 1e-3 {
        return Vec2::ZERO;
    }
    let dir = delta / dist;
    let strength = tuning.magnet_strength * dt;
    Vec2::new(dir.x * strength, dir.y * strength * tuning.magnet_vertical_factor)
}
