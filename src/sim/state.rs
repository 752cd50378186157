//! Core simulation types: falling entities, the player, phases and events

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::EffectKind;
use super::wordbank::Role;
use crate::consts::*;
use crate::player_x_bounds;

/// Lifecycle of the loop controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Before start (menu)
    Idle,
    /// Active gameplay
    Running,
    /// Frozen; ticks are ignored until resumed
    Paused,
    /// Session over (time out, out of lives, or internal fault)
    Ended,
}

/// Timed pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Pulls collectibles in range toward the player
    Magnet,
    /// Temporary immunity to hazards
    Shield,
    /// Extra seconds on the clock
    Clock,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Magnet, PowerupKind::Shield, PowerupKind::Clock];
}

/// Rare restorative pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    /// Restores one life
    Heart,
    /// Extra seconds on the clock
    Hourglass,
}

impl BonusKind {
    pub const ALL: [BonusKind; 2] = [BonusKind::Heart, BonusKind::Hourglass];
}

/// What a falling entity is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Word { text: String, role: Role },
    Star { golden: bool },
    Cloud,
    Powerup(PowerupKind),
    Bonus(BonusKind),
}

impl EntityKind {
    /// Hazards cost a life on contact; everything else is collected
    pub fn is_hazard(&self) -> bool {
        matches!(self, EntityKind::Cloud)
    }

    pub fn is_collectible(&self) -> bool {
        !self.is_hazard()
    }

    /// The kind whose on-screen count is kept between floor and ceiling
    pub fn is_primary(&self) -> bool {
        matches!(self, EntityKind::Word { .. } | EntityKind::Star { .. })
    }

    /// Highlighted in the renderer
    pub fn is_important(&self) -> bool {
        match self {
            EntityKind::Word { role, .. } => role.is_important(),
            EntityKind::Star { golden } => *golden,
            EntityKind::Powerup(_) | EntityKind::Bonus(_) => true,
            EntityKind::Cloud => false,
        }
    }

    /// Collision shape for this kind
    pub fn shape(&self) -> Shape {
        match self {
            EntityKind::Word { text, .. } => Shape::word(text),
            EntityKind::Star { golden: false } => Shape::Circle { radius: STAR_RADIUS },
            EntityKind::Star { golden: true } => Shape::Circle { radius: GOLDEN_STAR_RADIUS },
            EntityKind::Cloud => Shape::Circle { radius: CLOUD_RADIUS },
            EntityKind::Powerup(_) => Shape::Circle { radius: POWERUP_RADIUS },
            EntityKind::Bonus(_) => Shape::Circle { radius: BONUS_RADIUS },
        }
    }
}

/// Collision geometry, centred on the entity position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half: Vec2 },
}

impl Shape {
    /// Bubble sized to fit a word
    pub fn word(text: &str) -> Self {
        let width = text.chars().count() as f32 * GLYPH_WIDTH + WORD_PADDING_X * 2.0;
        Shape::Rect {
            half: Vec2::new(width / 2.0, WORD_HEIGHT / 2.0),
        }
    }

    /// Half extents of the bounding box
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Rect { half } => half,
        }
    }
}

/// A falling entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Centre, without the presentation wobble
    pub pos: Vec2,
    pub shape: Shape,
    /// Fall speed (pixels/s)
    pub vy: f32,
    /// Phase of the horizontal sway drawn by the renderer
    pub wobble_phase: f32,
    /// Elapsed session seconds at spawn
    pub spawn_time: f32,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, vy: f32, wobble_phase: f32, spawn_time: f32) -> Self {
        let shape = kind.shape();
        Self {
            id,
            kind,
            pos,
            shape,
            vy,
            wobble_phase,
            spawn_time,
        }
    }

    /// Top edge y
    pub fn top(&self) -> f32 {
        self.pos.y - self.shape.half_extents().y
    }

    /// Fell past the bottom edge by more than `margin`
    pub fn is_below(&self, margin: f32) -> bool {
        self.top() > WORLD_HEIGHT + margin
    }

    /// Horizontal sway for drawing only; collisions use `pos`
    pub fn wobble_offset(&self, time_secs: f32, amplitude: f32, period_secs: f32) -> f32 {
        (time_secs / period_secs + self.wobble_phase).sin() * amplitude
    }
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Resting height
    pub base_y: f32,
    pub radius: f32,
    /// Keyboard speed (pixels/s)
    pub speed: f32,
    /// Vertical velocity of the catch hop
    pub vy: f32,
    pub dragging: bool,
    /// Pointer x minus player x at drag start
    pub drag_offset_x: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(WORLD_WIDTH * 0.5, PLAYER_BASE_Y),
            base_y: PLAYER_BASE_Y,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            vy: 0.0,
            dragging: false,
            drag_offset_x: 0.0,
        }
    }
}

impl Player {
    /// Keyboard movement, hop gravity and wall clamping
    pub fn update(&mut self, dt: f32, direction: f32) {
        if !self.dragging {
            self.pos.x += direction * self.speed * dt;
        }
        self.clamp_x();

        self.vy += GRAVITY * dt;
        self.pos.y += self.vy * dt;
        if self.pos.y > self.base_y {
            self.pos.y = self.base_y;
            self.vy = 0.0;
        }
    }

    /// Start a hop (catch feedback)
    pub fn hop(&mut self) {
        self.vy = JUMP_VELOCITY;
    }

    pub fn clamp_x(&mut self) {
        let (min, max) = player_x_bounds(self.radius);
        self.pos.x = self.pos.x.clamp(min, max);
    }

    /// Is a point on the avatar (drag start test)
    pub fn contains(&self, p: Vec2) -> bool {
        self.pos.distance_squared(p) <= self.radius * self.radius
    }

    /// Follow the pointer during a drag
    pub fn drag_to(&mut self, pointer_x: f32) {
        self.pos.x = pointer_x - self.drag_offset_x;
        self.clamp_x();
    }
}

/// One-shot things that happened during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Session began (start or restart)
    Started,
    Collected { id: u32, kind: EntityKind },
    /// Damaging hazard contact
    Hit { id: u32 },
    /// Hazard contact while immune
    Bounced { id: u32 },
    LevelUp { level: u32 },
    EffectActivated { effect: EffectKind, until_ms: f64 },
    TimeBonus { seconds: f32 },
    LifeRestored { lives: u32 },
    SentenceCompleted { sentence: String },
    Ended { won: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_shape_scales_with_text() {
        let short = Shape::word("lee").half_extents();
        let long = Shape::word("como si fuera un acertijo").half_extents();
        assert!(long.x > short.x);
        assert_eq!(short.y, WORD_HEIGHT / 2.0);
    }

    #[test]
    fn test_player_clamped_to_walls() {
        let mut player = Player::default();
        player.update(10.0, -1.0);
        assert_eq!(player.pos.x, PLAYER_RADIUS + PLAYER_SIDE_MARGIN);
        player.update(10.0, 1.0);
        assert_eq!(player.pos.x, WORLD_WIDTH - PLAYER_RADIUS - PLAYER_SIDE_MARGIN);
    }

    #[test]
    fn test_hop_lands_on_base() {
        let mut player = Player::default();
        player.hop();
        player.update(0.05, 0.0);
        assert!(player.pos.y < player.base_y);
        for _ in 0..40 {
            player.update(0.05, 0.0);
        }
        assert_eq!(player.pos.y, player.base_y);
        assert_eq!(player.vy, 0.0);
    }

    #[test]
    fn test_drag_ignores_keys() {
        let mut player = Player::default();
        player.dragging = true;
        let x = player.pos.x;
        player.update(0.5, 1.0);
        assert_eq!(player.pos.x, x);
    }

    #[test]
    fn test_entity_below_uses_top_edge() {
        let e = Entity::new(1, EntityKind::Cloud, Vec2::new(100.0, WORLD_HEIGHT + 60.0 + CLOUD_RADIUS), 100.0, 0.0, 0.0);
        assert!(!e.is_below(60.0));
        let e = Entity {
            pos: e.pos + Vec2::Y,
            ..e
        };
        assert!(e.is_below(60.0));
    }

    #[test]
    fn test_hazard_classification() {
        assert!(EntityKind::Cloud.is_hazard());
        assert!(EntityKind::Powerup(PowerupKind::Magnet).is_collectible());
        assert!(EntityKind::Star { golden: false }.is_primary());
        assert!(!EntityKind::Bonus(BonusKind::Heart).is_primary());
    }
}
