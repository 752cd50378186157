//! Demo steering: chase the nearest collectible, sidestep clouds
//!
//! Produces ordinary key events so a scripted run goes through the same input
//! path as a human one.

use super::input::{InputEvent, InputState, Key};
use super::state::{Entity, Player};

/// Hazards closer than this (vertically above the avatar) are dodged
const DANGER_HEIGHT: f32 = 160.0;
/// Horizontal dead zone around the target
const DEAD_ZONE: f32 = 8.0;

/// Keys the autopilot would hold this frame
pub fn steer(player: &Player, entities: &[Entity]) -> InputState {
    let px = player.pos.x;

    // Dodge first: nearest cloud about to land on the avatar
    let threat = entities
        .iter()
        .filter(|e| e.kind.is_hazard())
        .filter(|e| {
            let above = player.pos.y - e.pos.y;
            let reach = player.radius + e.shape.half_extents().x;
            above > 0.0 && above < DANGER_HEIGHT && (e.pos.x - px).abs() < reach
        })
        .min_by(|a, b| b.pos.y.total_cmp(&a.pos.y));
    if let Some(cloud) = threat {
        let go_right = cloud.pos.x <= px;
        return InputState {
            left: !go_right,
            right: go_right,
        };
    }

    // Lowest collectible still above the avatar, ties broken by distance
    let target = entities
        .iter()
        .filter(|e| e.kind.is_collectible() && e.pos.y < player.pos.y && e.pos.y > 0.0)
        .min_by(|a, b| {
            let score = |e: &Entity| (player.pos.y - e.pos.y) + (e.pos.x - px).abs() * 0.5;
            score(a).total_cmp(&score(b))
        });

    match target {
        Some(e) if e.pos.x > px + DEAD_ZONE => InputState { left: false, right: true },
        Some(e) if e.pos.x < px - DEAD_ZONE => InputState { left: true, right: false },
        _ => InputState::default(),
    }
}

/// Key transitions turning `held` into `want`
pub fn key_events(held: InputState, want: InputState) -> Vec<InputEvent> {
    let mut events = Vec::new();
    for (key, was, now) in [(Key::Left, held.left, want.left), (Key::Right, held.right, want.right)] {
        match (was, now) {
            (false, true) => events.push(InputEvent::KeyDown { key }),
            (true, false) => events.push(InputEvent::KeyUp { key }),
            _ => {}
        }
    }
    events
}
