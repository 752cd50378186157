//! Host input events
//!
//! Pointer coordinates arrive in logical playfield units (900×520); the host
//! converts from device pixels before handing them over. Out-of-range values
//! are clamped and non-finite ones dropped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Player;
use crate::clamp_to_world;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` / `code` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "d" | "D" | "KeyD" => Some(Key::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerCancel,
    KeyDown { key: Key },
    KeyUp { key: Key },
}

/// Held keys, consumed at the next tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// -1 left, 1 right, 0 for none or both
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Apply an event to the key state and the player's drag
    pub fn apply(&mut self, event: InputEvent, player: &mut Player) {
        match event {
            InputEvent::PointerDown { x, y } => {
                let Some(p) = sanitize(x, y) else { return };
                // Drag only starts on the avatar itself
                if player.contains(p) {
                    player.dragging = true;
                    player.drag_offset_x = p.x - player.pos.x;
                }
            }
            InputEvent::PointerMove { x, y } => {
                if !player.dragging {
                    return;
                }
                if let Some(p) = sanitize(x, y) {
                    player.drag_to(p.x);
                }
            }
            InputEvent::PointerUp | InputEvent::PointerCancel => {
                player.dragging = false;
            }
            InputEvent::KeyDown { key } => self.set(key, true),
            InputEvent::KeyUp { key } => self.set(key, false),
        }
    }

    fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.left = down,
            Key::Right => self.right = down,
        }
    }
}

fn sanitize(x: f32, y: f32) -> Option<Vec2> {
    let p = Vec2::new(x, y);
    if !p.is_finite() {
        log::debug!("Dropping non-finite pointer ({x}, {y})");
        return None;
    }
    Some(clamp_to_world(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_direction() {
        let mut input = InputState::default();
        let mut player = Player::default();
        assert_eq!(input.direction(), 0.0);
        input.apply(InputEvent::KeyDown { key: Key::Left }, &mut player);
        assert_eq!(input.direction(), -1.0);
        input.apply(InputEvent::KeyDown { key: Key::Right }, &mut player);
        assert_eq!(input.direction(), 0.0);
        input.apply(InputEvent::KeyUp { key: Key::Left }, &mut player);
        assert_eq!(input.direction(), 1.0);
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut input = InputState::default();
        let mut player = Player::default();
        let start = player.pos;
        input.apply(InputEvent::PointerDown { x: start.x + 20.0, y: start.y }, &mut player);
        assert!(player.dragging);
        input.apply(InputEvent::PointerMove { x: start.x + 120.0, y: start.y }, &mut player);
        assert_eq!(player.pos.x, start.x + 100.0);
        input.apply(InputEvent::PointerUp, &mut player);
        assert!(!player.dragging);
    }

    #[test]
    fn test_pointer_off_avatar_does_not_drag() {
        let mut input = InputState::default();
        let mut player = Player::default();
        input.apply(InputEvent::PointerDown { x: 10.0, y: 10.0 }, &mut player);
        assert!(!player.dragging);
        let x = player.pos.x;
        input.apply(InputEvent::PointerMove { x: 100.0, y: 10.0 }, &mut player);
        assert_eq!(player.pos.x, x);
    }

    #[test]
    fn test_out_of_range_pointer_clamped() {
        let mut input = InputState::default();
        let mut player = Player::default();
        input.apply(InputEvent::PointerDown { x: player.pos.x, y: player.pos.y }, &mut player);
        input.apply(InputEvent::PointerMove { x: 1e6, y: -50.0 }, &mut player);
        assert_eq!(player.pos.x, WORLD_WIDTH - PLAYER_RADIUS - PLAYER_SIDE_MARGIN);
        input.apply(InputEvent::PointerMove { x: f32::NAN, y: 0.0 }, &mut player);
        assert!(player.pos.x.is_finite());
        input.apply(InputEvent::PointerCancel, &mut player);
        assert!(!player.dragging);
    }

    #[test]
    fn test_event_json_shape() {
        let event: InputEvent = serde_json::from_str(r#"{"type":"KeyDown","key":"Left"}"#).unwrap();
        assert_eq!(event, InputEvent::KeyDown { key: Key::Left });
        let event: InputEvent = serde_json::from_str(r#"{"type":"PointerMove","x":1.5,"y":2}"#).unwrap();
        assert_eq!(event, InputEvent::PointerMove { x: 1.5, y: 2.0 });
    }

    #[test]
    fn test_dom_keys() {
        assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom("d"), Some(Key::Right));
        assert_eq!(Key::from_dom("Space"), None);
    }
}
