//! Spawn cadence and entity construction
//!
//! Primary collectibles and hazards run on per-kind accumulators whose
//! intervals shrink with the level. Powerups and bonus items arrive after a
//! randomized delay redrawn after every spawn.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::content::ContentProvider;
use super::level::Difficulty;
use super::state::{BonusKind, Entity, EntityKind, PowerupKind, Shape};
use super::wordbank::Role;
use crate::consts::*;
use crate::settings::{Features, GameMode};
use crate::tuning::Tuning;

/// Builds entities and hands out ids
#[derive(Debug, Clone)]
pub struct EntityFactory {
    mode: GameMode,
    content: Option<ContentProvider>,
    next_id: u32,
}

impl EntityFactory {
    pub fn new(mode: GameMode, content: Option<ContentProvider>) -> Self {
        Self {
            mode,
            content,
            next_id: 1,
        }
    }

    pub fn content(&self) -> Option<&ContentProvider> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut ContentProvider> {
        self.content.as_mut()
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Word or star, depending on the mode. `None` when content ran out.
    pub fn primary<R: Rng + ?Sized>(
        &mut self,
        expected: Option<Role>,
        difficulty: &Difficulty,
        tuning: &Tuning,
        elapsed: f32,
        rng: &mut R,
    ) -> Option<Entity> {
        let kind = match self.mode {
            GameMode::Words => {
                let item = self.content.as_mut()?.next_item(expected, rng)?;
                EntityKind::Word {
                    text: item.text.to_string(),
                    role: item.role,
                }
            }
            GameMode::Stars => EntityKind::Star {
                golden: rng.random_bool(tuning.golden_star_chance),
            },
        };
        let vy = draw((difficulty.speed_min, difficulty.speed_max), rng);
        Some(self.build(kind, vy, elapsed, rng))
    }

    pub fn hazard<R: Rng + ?Sized>(&mut self, difficulty: &Difficulty, elapsed: f32, rng: &mut R) -> Entity {
        let vy = draw((difficulty.hazard_speed_min, difficulty.hazard_speed_max), rng);
        self.build(EntityKind::Cloud, vy, elapsed, rng)
    }

    pub fn powerup<R: Rng + ?Sized>(&mut self, difficulty: &Difficulty, elapsed: f32, rng: &mut R) -> Entity {
        let kind = PowerupKind::ALL.choose(rng).copied().unwrap_or(PowerupKind::Magnet);
        self.build(EntityKind::Powerup(kind), pickup_speed(difficulty, rng), elapsed, rng)
    }

    pub fn bonus<R: Rng + ?Sized>(&mut self, difficulty: &Difficulty, elapsed: f32, rng: &mut R) -> Entity {
        let kind = BonusKind::ALL.choose(rng).copied().unwrap_or(BonusKind::Heart);
        self.build(EntityKind::Bonus(kind), pickup_speed(difficulty, rng), elapsed, rng)
    }

    /// Place an entity at a random x just above the playfield
    fn build<R: Rng + ?Sized>(&mut self, kind: EntityKind, vy: f32, elapsed: f32, rng: &mut R) -> Entity {
        let half = kind.shape().half_extents();
        let margin = match kind.shape() {
            Shape::Rect { .. } => WORD_SIDE_MARGIN,
            Shape::Circle { .. } => WORD_SIDE_MARGIN + half.x,
        };
        let (lo, hi) = match kind.shape() {
            Shape::Rect { .. } => (margin + half.x, WORLD_WIDTH - margin - half.x),
            Shape::Circle { .. } => (margin, WORLD_WIDTH - margin),
        };
        let x = if hi > lo { rng.random_range(lo..=hi) } else { WORLD_WIDTH / 2.0 };
        let y = -half.y - rng.random_range(10.0..=80.0);
        let wobble = rng.random_range(0.0..TAU);
        let id = self.next_entity_id();
        Entity::new(id, kind, Vec2::new(x, y), vy, wobble, elapsed)
    }
}

/// Pickups drift a little slower than the collectibles around them
fn pickup_speed<R: Rng + ?Sized>(difficulty: &Difficulty, rng: &mut R) -> f32 {
    draw((difficulty.speed_min, difficulty.speed_max), rng) * 0.8
}

/// What the spawner needs to know about the current frame
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub difficulty: &'a Difficulty,
    pub features: &'a Features,
    pub tuning: &'a Tuning,
    /// Primary collectibles currently on screen
    pub primary_on_screen: usize,
    /// Role the story expects next (word mode)
    pub expected: Option<Role>,
    pub elapsed: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spawner {
    primary_acc: f32,
    hazard_acc: f32,
    next_powerup_in: f32,
    next_bonus_in: f32,
}

impl Spawner {
    /// Fresh accumulators and newly drawn arrival delays
    pub fn new<R: Rng + ?Sized>(difficulty: &Difficulty, rng: &mut R) -> Self {
        Self {
            primary_acc: 0.0,
            hazard_acc: 0.0,
            next_powerup_in: draw(difficulty.powerup_range, rng),
            next_bonus_in: draw(difficulty.bonus_range, rng),
        }
    }

    pub fn next_powerup_in(&self) -> f32 {
        self.next_powerup_in
    }

    pub fn next_bonus_in(&self) -> f32 {
        self.next_bonus_in
    }

    /// Advance the clocks by `dt` and build whatever is due
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        ctx: &SpawnContext<'_>,
        factory: &mut EntityFactory,
        rng: &mut R,
    ) -> Vec<Entity> {
        let SpawnContext {
            difficulty,
            features,
            tuning,
            ..
        } = *ctx;
        let mut spawned = Vec::new();

        // Keep a floor of primaries on screen; regular cadence up to the ceiling
        self.primary_acc += dt;
        let mut primary_wanted = 0;
        if ctx.primary_on_screen < tuning.primary_floor as usize
            && self.primary_acc > tuning.primary_fast_interval
        {
            self.primary_acc = 0.0;
            primary_wanted = 1;
            if rng.random_bool(tuning.double_spawn_chance) {
                primary_wanted = 2;
            }
        } else if self.primary_acc > difficulty.primary_interval {
            self.primary_acc = 0.0;
            if ctx.primary_on_screen < tuning.primary_ceiling as usize {
                primary_wanted = 1;
            }
        }
        for _ in 0..primary_wanted {
            // Content exhaustion just skips the attempt
            if let Some(e) = factory.primary(ctx.expected, difficulty, tuning, ctx.elapsed, rng) {
                spawned.push(e);
            }
        }

        if features.hazards {
            self.hazard_acc += dt;
            if self.hazard_acc > difficulty.hazard_interval {
                self.hazard_acc = 0.0;
                spawned.push(factory.hazard(difficulty, ctx.elapsed, rng));
            }
        }

        if features.powerups {
            self.next_powerup_in -= dt;
            if self.next_powerup_in <= 0.0 {
                self.next_powerup_in = draw(difficulty.powerup_range, rng);
                spawned.push(factory.powerup(difficulty, ctx.elapsed, rng));
            }
        }

        if features.bonus_items {
            self.next_bonus_in -= dt;
            if self.next_bonus_in <= 0.0 {
                self.next_bonus_in = draw(difficulty.bonus_range, rng);
                spawned.push(factory.bonus(difficulty, ctx.elapsed, rng));
            }
        }

        spawned
    }
}

/// Uniform over `lo..=hi`; an empty or non-finite range yields `lo`
fn draw<R: Rng + ?Sized>((lo, hi): (f32, f32), rng: &mut R) -> f32 {
    if hi > lo && lo.is_finite() && hi.is_finite() { rng.random_range(lo..=hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::wordbank::profile;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(mode: GameMode) -> (EntityFactory, Pcg32, Tuning) {
        let mut rng = Pcg32::seed_from_u64(42);
        let tuning = Tuning::default();
        let content = match mode {
            GameMode::Words => Some(ContentProvider::new(profile("nuve").unwrap(), &tuning, &mut rng)),
            GameMode::Stars => None,
        };
        (EntityFactory::new(mode, content), rng, tuning)
    }

    fn ctx<'a>(
        difficulty: &'a Difficulty,
        features: &'a Features,
        tuning: &'a Tuning,
        on_screen: usize,
    ) -> SpawnContext<'a> {
        SpawnContext {
            difficulty,
            features,
            tuning,
            primary_on_screen: on_screen,
            expected: Some(Role::Subject),
            elapsed: 0.0,
        }
    }

    #[test]
    fn test_entities_spawn_above_playfield() {
        let (mut factory, mut rng, tuning) = setup(GameMode::Words);
        let difficulty = Difficulty::for_level(1, &tuning);
        for _ in 0..100 {
            let e = factory
                .primary(Some(Role::Verb), &difficulty, &tuning, 0.0, &mut rng)
                .unwrap();
            let half = e.shape.half_extents();
            assert!(e.pos.y + half.y < 0.0, "bottom edge must start hidden");
            assert!(e.pos.x - half.x >= WORD_SIDE_MARGIN - 1e-3);
            assert!(e.pos.x + half.x <= WORLD_WIDTH - WORD_SIDE_MARGIN + 1e-3);
            assert!((difficulty.speed_min..=difficulty.speed_max).contains(&e.vy));
        }
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let (mut factory, mut rng, tuning) = setup(GameMode::Stars);
        let difficulty = Difficulty::for_level(1, &tuning);
        let a = factory.hazard(&difficulty, 0.0, &mut rng);
        let b = factory.powerup(&difficulty, 0.0, &mut rng);
        assert!(b.id > a.id);
    }

    #[test]
    fn test_floor_forces_fast_spawns() {
        let (mut factory, mut rng, tuning) = setup(GameMode::Stars);
        let difficulty = Difficulty::for_level(1, &tuning);
        let features = Features::for_mode(GameMode::Words);
        let mut spawner = Spawner::new(&difficulty, &mut rng);

        // Below the floor, the fast interval applies
        let spawned = spawner.maybe_spawn(0.2, &ctx(&difficulty, &features, &tuning, 3), &mut factory, &mut rng);
        assert!(!spawned.is_empty() && spawned.len() <= 2);
    }

    #[test]
    fn test_ceiling_skips_regular_spawns() {
        let (mut factory, mut rng, tuning) = setup(GameMode::Stars);
        let difficulty = Difficulty::for_level(1, &tuning);
        let features = Features::for_mode(GameMode::Words);
        let mut spawner = Spawner::new(&difficulty, &mut rng);

        let at_ceiling = tuning.primary_ceiling as usize;
        let spawned = spawner.maybe_spawn(1.0, &ctx(&difficulty, &features, &tuning, at_ceiling), &mut factory, &mut rng);
        assert!(spawned.is_empty());

        // Between floor and ceiling, one per regular interval
        let between = tuning.primary_floor as usize + 1;
        let spawned = spawner.maybe_spawn(0.5, &ctx(&difficulty, &features, &tuning, between), &mut factory, &mut rng);
        assert_eq!(spawned.len(), 1);
    }

    #[test]
    fn test_hazard_cadence() {
        let (mut factory, mut rng, tuning) = setup(GameMode::Stars);
        let difficulty = Difficulty::for_level(1, &tuning);
        let features = Features {
            powerups: false,
            bonus_items: false,
            ..Features::for_mode(GameMode::Stars)
        };
        let mut spawner = Spawner::new(&difficulty, &mut rng);
        let full = tuning.primary_ceiling as usize;

        let mut clouds = 0;
        // 10 seconds at level 1: one cloud every 1.6 s (accumulator resets to zero)
        for _ in 0..100 {
            let spawned = spawner.maybe_spawn(0.1, &ctx(&difficulty, &features, &tuning, full), &mut factory, &mut rng);
            clouds += spawned.iter().filter(|e| e.kind.is_hazard()).count();
        }
        assert!((5..=6).contains(&clouds), "clouds {clouds}");
    }

    #[test]
    fn test_inverted_speed_range_does_not_panic() {
        let (mut factory, mut rng, tuning) = setup(GameMode::Stars);
        let difficulty = Difficulty {
            speed_min: 200.0,
            speed_max: 100.0,
            hazard_speed_min: 300.0,
            hazard_speed_max: f32::NAN,
            ..Difficulty::for_level(1, &tuning)
        };
        let star = factory.primary(None, &difficulty, &tuning, 0.0, &mut rng).unwrap();
        assert_eq!(star.vy, 200.0);
        assert_eq!(factory.hazard(&difficulty, 0.0, &mut rng).vy, 300.0);
        assert_eq!(factory.bonus(&difficulty, 0.0, &mut rng).vy, 160.0);
    }

    #[test]
    fn test_powerup_arrival_redrawn_within_range() {
        let (mut factory, mut rng, tuning) = setup(GameMode::Stars);
        let difficulty = Difficulty::for_level(1, &tuning);
        let features = Features {
            hazards: false,
            bonus_items: false,
            ..Features::for_mode(GameMode::Stars)
        };
        let mut spawner = Spawner::new(&difficulty, &mut rng);
        let (lo, hi) = difficulty.powerup_range;
        assert!((lo..=hi).contains(&spawner.next_powerup_in()));

        let full = tuning.primary_ceiling as usize;
        let mut powerups = 0;
        for _ in 0..600 {
            let spawned = spawner.maybe_spawn(0.1, &ctx(&difficulty, &features, &tuning, full), &mut factory, &mut rng);
            for e in &spawned {
                if matches!(e.kind, EntityKind::Powerup(_)) {
                    powerups += 1;
                    assert!((lo..=hi).contains(&spawner.next_powerup_in()));
                }
            }
        }
        // 60 s with arrivals every 8..14 s
        assert!((4..=8).contains(&powerups), "powerups {powerups}");
    }
}
