//! Simulation loop controller
//!
//! Owns every piece of session state and advances it once per host frame.
//! Components run in a fixed order each tick:
//! session clock → level machine → player → spawner → physics → outcomes.
//! Status effects are only read, since they are keyed by absolute time.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::content::ContentProvider;
use super::effects::{EffectKind, StatusEffects};
use super::input::{InputEvent, InputState};
use super::level::{LevelMachine, SceneTransition};
use super::particles::{Particle, ParticleKind, ParticleSystem};
use super::physics::{self, Resolution};
use super::session::{Outcome, Session};
use super::spawner::{EntityFactory, SpawnContext, Spawner};
use super::state::{BonusKind, Entity, EntityKind, GameEvent, Phase, Player, PowerupKind};
use super::story::Story;
use super::wordbank::{self, Profile, Role};
use crate::audio::{SoundCue, cues_for};
use crate::consts::*;
use crate::error::{ConfigError, SimError};
use crate::settings::{Features, GameMode, SessionConfig};
use crate::tuning::Tuning;

/// Vertical gap between the primaries placed at session start
const INITIAL_STAGGER: f32 = 45.0;

/// HUD fields refreshed every frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub time_remaining: f32,
    pub level: u32,
}

/// Render-ready view of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    /// Centre including the presentation wobble
    pub pos: Vec2,
    pub half_extents: Vec2,
    pub important: bool,
}

/// Everything the host needs after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub phase: Phase,
    pub hud: Hud,
    pub player: Vec2,
    pub entities: Vec<EntityView>,
    /// Presentation particles, oldest first
    pub particles: Vec<Particle>,
    pub events: Vec<GameEvent>,
    pub cues: Vec<SoundCue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub remaining_ms: f64,
}

/// Full session state for HUD and end screens, valid in every phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub player_name: String,
    pub profile_id: Option<String>,
    pub profile_label: Option<String>,
    pub mode: GameMode,
    /// Seed of the run, when the generator was seeded by the simulation
    pub seed: Option<u64>,
    pub score: u32,
    pub lives: u32,
    pub time_remaining: f32,
    pub elapsed: f32,
    pub level: u32,
    pub caught: u32,
    /// `Some` once the session ended normally
    pub won: Option<bool>,
    /// Diagnostic for a session ended by an internal fault
    pub fault: Option<String>,
    pub story: String,
    pub template_line: String,
    pub expected_role: Option<Role>,
    pub word_count: u32,
    pub effects: Vec<ActiveEffect>,
    pub scene: u32,
    pub transition: Option<SceneTransition>,
    /// 0 = day, 1 = night
    pub night: f32,
}

pub struct Simulation<R = Pcg32> {
    tuning: Tuning,
    phase: Phase,
    config: Option<SessionConfig>,
    features: Features,
    rng: R,
    /// True when the host supplied the generator
    rng_injected: bool,
    seed: Option<u64>,

    session: Session,
    level: LevelMachine,
    effects: StatusEffects,
    spawner: Spawner,
    factory: EntityFactory,
    story: Option<Story>,
    entities: Vec<Entity>,
    player: Player,
    input: InputState,
    particles: ParticleSystem,

    last_timestamp: Option<f64>,
    /// Simulation clock (ms); drives effect expiry and does not run while paused
    now_ms: f64,
    /// Events raised outside a tick, reported with the next frame
    pending: Vec<GameEvent>,
    fault: Option<String>,
}

impl Simulation<Pcg32> {
    /// Simulation with the default generator, seeded at `start`
    pub fn new(tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::build(tuning, Pcg32::seed_from_u64(0), false))
    }
}

impl<R: Rng + SeedableRng> Simulation<R> {
    /// Simulation driven by a host-supplied generator. A config seed still
    /// reseeds it; without one the generator is used as given.
    pub fn with_rng(tuning: Tuning, rng: R) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::build(tuning, rng, true))
    }

    fn build(tuning: Tuning, mut rng: R, rng_injected: bool) -> Self {
        let features = Features::default();
        let level = LevelMachine::new(&tuning, &features);
        let spawner = Spawner::new(level.difficulty(), &mut rng);
        Self {
            session: Session::new(0.0, &tuning),
            particles: ParticleSystem::new(tuning.max_particles),
            level,
            spawner,
            factory: EntityFactory::new(GameMode::default(), None),
            tuning,
            phase: Phase::Idle,
            config: None,
            features,
            rng,
            rng_injected,
            seed: None,
            effects: StatusEffects::new(),
            story: None,
            entities: Vec::new(),
            player: Player::default(),
            input: InputState::default(),
            last_timestamp: None,
            now_ms: 0.0,
            pending: Vec::new(),
            fault: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn input(&self) -> InputState {
        self.input
    }

    pub fn effects(&self) -> &StatusEffects {
        &self.effects
    }

    /// Simulation clock in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn is_terminal(&self) -> bool {
        self.session.is_terminal()
    }

    pub fn did_win(&self) -> bool {
        self.phase == Phase::Ended && self.fault.is_none() && self.session.did_win()
    }

    /// Begin a session. On error nothing changes and the simulation stays idle.
    pub fn start(&mut self, config: SessionConfig) -> Result<(), ConfigError> {
        if self.phase != Phase::Idle {
            return Err(ConfigError::NotIdle);
        }
        if let Err(err) = config.validate() {
            log::warn!("Rejected session config: {}", err);
            return Err(err);
        }
        let profile = wordbank::profile(&config.profile_id)
            .ok_or_else(|| ConfigError::UnknownProfile(config.profile_id.clone()))?;
        self.config = Some(config);
        self.begin(profile);
        Ok(())
    }

    /// Play again with the same config, straight from `Ended`
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        if self.phase != Phase::Ended {
            return Err(ConfigError::NotEnded);
        }
        let profile = self
            .config
            .as_ref()
            .and_then(|c| wordbank::profile(&c.profile_id))
            .ok_or(ConfigError::NotEnded)?;
        log::info!("Restarting session");
        self.begin(profile);
        Ok(())
    }

    /// Back to the menu. Allowed from any phase.
    pub fn reset(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        log::info!("Session reset");
        self.phase = Phase::Idle;
        self.config = None;
        self.features = Features::default();
        self.session = Session::new(0.0, &self.tuning);
        self.level = LevelMachine::new(&self.tuning, &self.features);
        self.factory = EntityFactory::new(GameMode::default(), None);
        self.story = None;
        self.entities.clear();
        self.particles.clear();
        self.effects.clear();
        self.input.clear();
        self.player = Player::default();
        self.pending.clear();
        self.last_timestamp = None;
        self.fault = None;
        self.seed = None;
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Paused;
        self.player.dragging = false;
        log::debug!("Paused");
        true
    }

    /// Resume; the next tick has dt = 0
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Running;
        self.last_timestamp = None;
        log::debug!("Resumed");
        true
    }

    /// Reset every sub-state for a fresh run of the current config
    fn begin(&mut self, profile: &'static Profile) {
        let Some(config) = self.config.clone() else {
            return;
        };

        self.seed = match config.seed {
            Some(seed) => {
                self.rng = R::seed_from_u64(seed);
                Some(seed)
            }
            None if !self.rng_injected => {
                let seed: u64 = rand::rng().random();
                self.rng = R::seed_from_u64(seed);
                Some(seed)
            }
            None => None,
        };

        log::info!(
            "Session start: player={} profile={} mode={} duration={}s seed={:?}",
            config.display_name(),
            profile.id,
            config.mode.as_str(),
            config.duration_secs,
            self.seed
        );

        self.features = config.features;
        self.session = Session::new(config.duration_secs, &self.tuning);
        self.level = LevelMachine::new(&self.tuning, &self.features);
        self.effects.clear();
        self.particles = ParticleSystem::new(self.tuning.max_particles);
        self.player = Player::default();
        self.input.clear();
        self.entities.clear();
        self.fault = None;
        self.last_timestamp = None;
        self.now_ms = 0.0;

        let (content, story) = match config.mode {
            GameMode::Words => (
                Some(ContentProvider::new(profile, &self.tuning, &mut self.rng)),
                Some(Story::for_profile(profile, &mut self.rng)),
            ),
            GameMode::Stars => (None, None),
        };
        self.factory = EntityFactory::new(config.mode, content);
        self.story = story;
        self.spawner = Spawner::new(self.level.difficulty(), &mut self.rng);

        for i in 0..self.tuning.initial_primary {
            let expected = self.story.as_ref().and_then(Story::expected_role);
            if let Some(mut e) = self.factory.primary(
                expected,
                self.level.difficulty(),
                &self.tuning,
                0.0,
                &mut self.rng,
            ) {
                e.pos.y -= i as f32 * INITIAL_STAGGER;
                self.entities.push(e);
            }
        }

        self.pending.clear();
        self.pending.push(GameEvent::Started);
        self.phase = Phase::Running;
    }

    /// Advance one host frame
    pub fn tick(&mut self, timestamp_ms: f64) -> FrameResult {
        if self.phase != Phase::Running {
            return self.frame(Vec::new());
        }

        let mut events = std::mem::take(&mut self.pending);
        let result = self.frame_delta(timestamp_ms).and_then(|dt| self.step(dt, &mut events));
        if let Err(err) = result {
            log::error!("Simulation fault: {}", err);
            self.fault = Some(err.to_string());
            self.end(false, &mut events);
        }
        self.frame(events)
    }

    fn frame_delta(&mut self, timestamp_ms: f64) -> Result<f32, SimError> {
        if !timestamp_ms.is_finite() {
            return Err(SimError::NonFiniteClock);
        }
        let dt = match self.last_timestamp {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        // A rewound clock never moves the reference point back
        let latest = self.last_timestamp.map_or(timestamp_ms, |last| last.max(timestamp_ms));
        self.last_timestamp = Some(latest);
        Ok(dt.clamp(0.0, MAX_FRAME_DT))
    }

    fn step(&mut self, dt: f32, events: &mut Vec<GameEvent>) -> Result<(), SimError> {
        self.session.advance_clock(dt);
        self.now_ms += dt as f64 * 1000.0;
        if !self.session.time_remaining.is_finite() || !self.now_ms.is_finite() {
            return Err(SimError::NonFiniteClock);
        }

        if let Some(level) = self.level.update(self.session.elapsed, dt, &self.tuning) {
            self.session.level = level;
            events.push(GameEvent::LevelUp { level });
        }

        self.player.update(dt, self.input.direction());
        if !self.player.pos.is_finite() {
            return Err(SimError::NonFinitePlayer);
        }

        let ctx = SpawnContext {
            difficulty: self.level.difficulty(),
            features: &self.features,
            tuning: &self.tuning,
            primary_on_screen: self.entities.iter().filter(|e| e.kind.is_primary()).count(),
            expected: self.story.as_ref().and_then(Story::expected_role),
            elapsed: self.session.elapsed,
        };
        let spawned = self.spawner.maybe_spawn(dt, &ctx, &mut self.factory, &mut self.rng);
        self.entities.extend(spawned);

        let resolution = physics::advance(
            &mut self.entities,
            &self.player,
            &self.effects,
            self.now_ms,
            dt,
            &self.tuning,
        )?;
        self.resolve(resolution, events);

        self.particles.update(dt);

        if self.session.is_terminal() {
            let won = self.session.did_win();
            self.end(won, events);
        }

        self.entities.sort_by_key(|e| e.id);
        Ok(())
    }

    /// Apply the frame's contacts to score, effects, story and presentation
    fn resolve(&mut self, resolution: Resolution, events: &mut Vec<GameEvent>) {
        let Resolution {
            collected,
            hit,
            bounced,
            expired,
            ..
        } = resolution;

        for touch in collected {
            let id = touch.entity.id;
            let kind = touch.entity.kind;
            let points = self.value_of(&kind);
            self.session.apply_outcome(Outcome::Collect { points });

            match &kind {
                EntityKind::Word { text, .. } => {
                    let profile = self.factory.content().map(ContentProvider::profile);
                    let sentence = match (self.story.as_mut(), profile) {
                        (Some(story), Some(profile)) => story.push_word(text, profile, &mut self.rng),
                        _ => None,
                    };
                    if let Some(sentence) = sentence {
                        log::debug!("Sentence complete: {}", sentence);
                        events.push(GameEvent::SentenceCompleted { sentence });
                    }
                }
                EntityKind::Powerup(PowerupKind::Magnet) => {
                    self.activate(EffectKind::Magnet, self.tuning.magnet_ms, events);
                }
                EntityKind::Powerup(PowerupKind::Shield) => {
                    self.activate(EffectKind::Immune, self.tuning.shield_ms, events);
                }
                EntityKind::Powerup(PowerupKind::Clock) | EntityKind::Bonus(BonusKind::Hourglass) => {
                    let seconds = self.tuning.bonus_time_secs;
                    if self.session.apply_outcome(Outcome::TimeBonus { seconds }) {
                        events.push(GameEvent::TimeBonus { seconds });
                    }
                }
                EntityKind::Bonus(BonusKind::Heart) => {
                    if self.session.apply_outcome(Outcome::RestoreLife) {
                        events.push(GameEvent::LifeRestored {
                            lives: self.session.lives,
                        });
                    }
                }
                EntityKind::Star { .. } | EntityKind::Cloud => {}
            }

            let burst = if kind.is_important() {
                ParticleKind::Gold
            } else {
                ParticleKind::Sparkle
            };
            self.particles.burst(touch.point, burst);
            if self.features.jump_on_catch {
                self.player.hop();
            }
            events.push(GameEvent::Collected { id, kind });
        }

        for touch in hit {
            let id = touch.entity.id;
            self.session.apply_outcome(Outcome::Hit);
            log::debug!("Hit by {} ({} lives left)", id, self.session.lives);
            self.particles.burst(touch.point, ParticleKind::Smoke);
            events.push(GameEvent::Hit { id });
            // Stunned: nothing can be collected for a moment
            self.activate(EffectKind::Block, self.tuning.hit_block_ms, events);
        }

        for touch in bounced {
            self.session.apply_outcome(Outcome::Bounce);
            self.particles.burst(touch.point, ParticleKind::Shield);
            events.push(GameEvent::Bounced { id: touch.entity.id });
        }

        for _ in expired {
            self.session.apply_outcome(Outcome::Expire);
        }
    }

    fn activate(&mut self, effect: EffectKind, duration_ms: f64, events: &mut Vec<GameEvent>) {
        let until_ms = self.effects.activate(effect, duration_ms, self.now_ms);
        log::debug!("{:?} active until {}ms", effect, until_ms);
        events.push(GameEvent::EffectActivated { effect, until_ms });
    }

    fn value_of(&self, kind: &EntityKind) -> u32 {
        match kind {
            EntityKind::Word { .. } => self.tuning.word_value,
            EntityKind::Star { golden: false } => self.tuning.star_value,
            EntityKind::Star { golden: true } => self.tuning.golden_star_value,
            EntityKind::Powerup(_) | EntityKind::Bonus(_) => self.tuning.powerup_value,
            EntityKind::Cloud => 0,
        }
    }

    fn end(&mut self, won: bool, events: &mut Vec<GameEvent>) {
        self.phase = Phase::Ended;
        self.player.dragging = false;
        self.input.clear();
        log::info!(
            "Session over: {} score={} lives={}",
            if self.fault.is_some() {
                "faulted"
            } else if won {
                "won"
            } else {
                "lost"
            },
            self.session.score,
            self.session.lives
        );
        events.push(GameEvent::Ended { won });
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match (self.phase, event) {
            // Key state is kept in every phase so a release is never lost
            (_, InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. })
            | (_, InputEvent::PointerUp | InputEvent::PointerCancel)
            | (Phase::Running, _) => self.input.apply(event, &mut self.player),
            _ => {}
        }
    }

    /// Drop the last caught word. Returns false when the story was empty.
    pub fn undo_word(&mut self) -> bool {
        self.story.as_mut().is_some_and(Story::undo_word)
    }

    /// Empty the story and forget recently shown words
    pub fn clear_story(&mut self) {
        if let Some(story) = self.story.as_mut() {
            story.clear();
        }
        if let Some(content) = self.factory.content_mut() {
            content.clear_recent();
        }
    }

    pub fn story_text(&self) -> String {
        self.story.as_ref().map(Story::text).unwrap_or_default()
    }

    pub fn template_line(&self) -> String {
        self.story.as_ref().map(Story::template_line).unwrap_or_default()
    }

    /// Insert an entity at a given centre (scripted scenes, tests). Returns its id.
    pub fn place_entity(&mut self, kind: EntityKind, pos: Vec2, vy: f32) -> u32 {
        let id = self.factory.next_entity_id();
        self.entities
            .push(Entity::new(id, kind, pos, vy, 0.0, self.session.elapsed));
        id
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let config = self.config.as_ref();
        let profile = config.and_then(|c| wordbank::profile(&c.profile_id));
        let story = self.story.as_ref();
        SessionSnapshot {
            phase: self.phase,
            player_name: config.map(SessionConfig::display_name).unwrap_or_default(),
            profile_id: profile.map(|p| p.id.to_string()),
            profile_label: profile.map(|p| p.label.to_string()),
            mode: config.map(|c| c.mode).unwrap_or_default(),
            seed: self.seed,
            score: self.session.score,
            lives: self.session.lives,
            time_remaining: self.session.time_remaining,
            elapsed: self.session.elapsed,
            level: self.session.level,
            caught: self.session.caught,
            won: (self.phase == Phase::Ended && self.fault.is_none()).then(|| self.session.did_win()),
            fault: self.fault.clone(),
            story: self.story_text(),
            template_line: self.template_line(),
            expected_role: story.and_then(Story::expected_role),
            word_count: story.map(Story::word_count).unwrap_or(0),
            effects: self
                .effects
                .active(self.now_ms)
                .map(|kind| ActiveEffect {
                    kind,
                    remaining_ms: self.effects.remaining(kind, self.now_ms),
                })
                .collect(),
            scene: self.level.scene(),
            transition: self.level.transition(),
            night: self.level.night(),
        }
    }

    fn frame(&self, events: Vec<GameEvent>) -> FrameResult {
        let time = self.session.elapsed;
        let entities = self
            .entities
            .iter()
            .map(|e| EntityView {
                id: e.id,
                kind: e.kind.clone(),
                pos: e.pos
                    + Vec2::X
                        * e.wobble_offset(time, self.tuning.wobble_amplitude, self.tuning.wobble_period_secs),
                half_extents: e.shape.half_extents(),
                important: e.kind.is_important(),
            })
            .collect();
        FrameResult {
            phase: self.phase,
            hud: Hud {
                score: self.session.score,
                lives: self.session.lives,
                time_remaining: self.session.time_remaining,
                level: self.session.level,
            },
            player: self.player.pos,
            entities,
            particles: self.particles.particles().to_vec(),
            cues: cues_for(&events),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::Key;

    fn quiet_tuning() -> Tuning {
        Tuning {
            initial_primary: 0,
            primary_floor: 0,
            primary_ceiling: 0,
            ..Tuning::default()
        }
    }

    fn words(seed: u64) -> SessionConfig {
        SessionConfig::new("lunaria", "Ana", GameMode::Words).with_seed(seed)
    }

    fn running(tuning: Tuning, config: SessionConfig) -> Simulation {
        let mut sim = Simulation::new(tuning).unwrap();
        sim.start(config).unwrap();
        sim
    }

    #[test]
    fn test_start_rejects_bad_config() {
        let mut sim = Simulation::new(Tuning::default()).unwrap();
        let err = sim.start(SessionConfig::new("lunaria", "   ", GameMode::Words));
        assert_eq!(err, Err(ConfigError::EmptyPlayerName));
        assert_eq!(sim.phase(), Phase::Idle);

        let err = sim.start(SessionConfig::new("nadie", "Ana", GameMode::Words));
        assert!(matches!(err, Err(ConfigError::UnknownProfile(_))));
        assert_eq!(sim.phase(), Phase::Idle);
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut sim = running(Tuning::default(), words(1));
        assert_eq!(sim.start(words(2)), Err(ConfigError::NotIdle));
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            max_level: 0,
            ..Tuning::default()
        };
        assert!(matches!(Simulation::new(tuning), Err(ConfigError::InvalidTuning(_))));
    }

    #[test]
    fn test_start_seeds_initial_batch() {
        let sim = running(Tuning::default(), words(3));
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.entities().len(), 12);
        assert!(sim.entities().iter().all(|e| e.pos.y < 0.0));
        assert_eq!(sim.snapshot().seed, Some(3));
    }

    #[test]
    fn test_seed_drawn_and_reported() {
        let sim = running(Tuning::default(), SessionConfig::new("nuve", "Ana", GameMode::Stars));
        assert!(sim.snapshot().seed.is_some());
    }

    #[test]
    fn test_first_tick_has_zero_dt() {
        let mut sim = running(Tuning::default(), words(4));
        let before: Vec<Vec2> = sim.entities().iter().map(|e| e.pos).collect();
        let frame = sim.tick(123_456.0);
        let after: Vec<Vec2> = sim.entities().iter().map(|e| e.pos).collect();
        assert_eq!(before, after);
        assert_eq!(frame.hud.time_remaining, 30.0);
        assert_eq!(frame.events, vec![GameEvent::Started]);
        assert_eq!(frame.cues, vec![SoundCue::MusicStart]);
    }

    #[test]
    fn test_large_gap_clamped() {
        let mut sim = running(quiet_tuning(), words(5));
        sim.tick(0.0);
        let frame = sim.tick(10_000.0);
        assert!((frame.hud.time_remaining - (30.0 - MAX_FRAME_DT)).abs() < 1e-4);
        // Time running backwards is treated as no time at all
        let frame = sim.tick(5_000.0);
        assert!((frame.hud.time_remaining - (30.0 - MAX_FRAME_DT)).abs() < 1e-4);
    }

    #[test]
    fn test_time_out_is_a_win() {
        let config = SessionConfig::new("lunaria", "Ana", GameMode::Words)
            .with_seed(99)
            .with_duration(60.0);
        let mut sim = running(quiet_tuning(), config);
        let lives = sim.snapshot().lives;

        let mut ended = None;
        for i in 0..400 {
            let frame = sim.tick(i as f64 * 200.0);
            if frame.phase == Phase::Ended {
                ended = Some(frame);
                break;
            }
        }
        let frame = ended.expect("session should time out");
        assert!(frame.events.contains(&GameEvent::Ended { won: true }));
        assert!(frame.cues.contains(&SoundCue::MusicStop));
        assert!(sim.did_win());

        let snap = sim.snapshot();
        assert_eq!(snap.won, Some(true));
        assert_eq!(snap.lives, lives);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.time_remaining, 0.0);
        assert_eq!(snap.level, Tuning::default().max_level);
    }

    #[test]
    fn test_hazard_on_first_tick() {
        let mut sim = running(Tuning::default(), words(6));
        sim.session.score = 10;
        let pos = sim.player().pos;
        let id = sim.place_entity(EntityKind::Cloud, pos, 150.0);

        let frame = sim.tick(0.0);
        assert_eq!(frame.hud.lives, 2);
        assert_eq!(frame.hud.score, 7);
        assert!(frame.events.contains(&GameEvent::Hit { id }));
        assert!(sim.entities().iter().all(|e| e.id != id));
        assert_eq!(frame.phase, Phase::Running);
        // The hit stuns collection briefly
        assert!(sim.effects().is_active(EffectKind::Block, sim.now_ms()));
    }

    #[test]
    fn test_shield_pickup_makes_hazards_bounce() {
        let mut sim = running(quiet_tuning(), SessionConfig::new("ciela", "Ana", GameMode::Stars).with_seed(7));
        let pos = sim.player().pos;
        sim.place_entity(EntityKind::Powerup(PowerupKind::Shield), pos, 0.0);
        let frame = sim.tick(0.0);
        assert!(frame.events.iter().any(|e| matches!(
            e,
            GameEvent::EffectActivated {
                effect: EffectKind::Immune,
                ..
            }
        )));

        let cloud = sim.place_entity(EntityKind::Cloud, pos, 0.0);
        let frame = sim.tick(16.0);
        assert!(frame.events.contains(&GameEvent::Bounced { id: cloud }));
        assert_eq!(frame.hud.lives, Tuning::default().initial_lives);
    }

    fn stars(seed: u64) -> SessionConfig {
        SessionConfig::new("ciela", "Ana", GameMode::Stars).with_seed(seed)
    }

    /// Drop `kind` on the player and run a zero-length frame
    fn catch_at_player(sim: &mut Simulation, kind: EntityKind) -> FrameResult {
        let pos = sim.player().pos;
        sim.place_entity(kind, pos, 0.0);
        sim.tick(0.0)
    }

    #[test]
    fn test_magnet_pickup_activates_magnet() {
        let mut sim = running(quiet_tuning(), stars(11));
        let frame = catch_at_player(&mut sim, EntityKind::Powerup(PowerupKind::Magnet));
        assert!(frame.events.contains(&GameEvent::EffectActivated {
            effect: EffectKind::Magnet,
            until_ms: 5000.0,
        }));
        assert!(sim.effects().is_active(EffectKind::Magnet, sim.now_ms()));
        assert_eq!(frame.hud.score, Tuning::default().powerup_value);
    }

    #[test]
    fn test_clock_and_hourglass_add_capped_time() {
        let mut sim = running(quiet_tuning(), stars(12));
        let frame = catch_at_player(&mut sim, EntityKind::Powerup(PowerupKind::Clock));
        assert!(frame.events.contains(&GameEvent::TimeBonus { seconds: 5.0 }));
        assert_eq!(frame.hud.time_remaining, 35.0);

        let mut sim = running(quiet_tuning(), stars(13).with_duration(88.0));
        let frame = catch_at_player(&mut sim, EntityKind::Bonus(BonusKind::Hourglass));
        assert!(frame.events.contains(&GameEvent::TimeBonus { seconds: 5.0 }));
        assert_eq!(frame.hud.time_remaining, 90.0);

        // Already at the cap: still collected, but no time event
        let frame = catch_at_player(&mut sim, EntityKind::Powerup(PowerupKind::Clock));
        assert!(!frame.events.iter().any(|e| matches!(e, GameEvent::TimeBonus { .. })));
        assert!(frame.events.iter().any(|e| matches!(e, GameEvent::Collected { .. })));
        assert_eq!(frame.hud.time_remaining, 90.0);
    }

    #[test]
    fn test_heart_restores_life_up_to_max() {
        let mut sim = running(quiet_tuning(), stars(14));
        let frame = catch_at_player(&mut sim, EntityKind::Bonus(BonusKind::Heart));
        assert!(frame.events.contains(&GameEvent::LifeRestored { lives: 4 }));
        assert_eq!(frame.hud.lives, 4);

        sim.session.lives = 5;
        let frame = catch_at_player(&mut sim, EntityKind::Bonus(BonusKind::Heart));
        assert!(!frame.events.iter().any(|e| matches!(e, GameEvent::LifeRestored { .. })));
        assert_eq!(frame.hud.lives, 5);
    }

    #[test]
    fn test_level_up_emitted_once() {
        let mut sim = running(quiet_tuning(), words(15).with_duration(60.0));
        let mut levels = Vec::new();
        // 70 frames 200ms apart: 13.8s of play
        for i in 0..70 {
            let frame = sim.tick(i as f64 * 200.0);
            levels.extend(frame.events.iter().filter_map(|e| match e {
                GameEvent::LevelUp { level } => Some(*level),
                _ => None,
            }));
        }
        assert_eq!(levels, vec![2]);
        assert_eq!(sim.snapshot().level, 2);
    }

    #[test]
    fn test_frame_carries_particles() {
        let mut sim = running(quiet_tuning(), stars(16));
        assert!(sim.tick(0.0).particles.is_empty());
        let frame = catch_at_player(&mut sim, EntityKind::Star { golden: false });
        assert!(!frame.particles.is_empty());
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"particles\""));
    }

    #[test]
    fn test_rewound_clock_keeps_latest_timestamp() {
        let mut sim = running(quiet_tuning(), words(17));
        sim.tick(0.0);
        sim.tick(100.0);
        // Rewound frame counts as no time and must not move the reference back
        let frame = sim.tick(50.0);
        assert!((frame.hud.time_remaining - 29.9).abs() < 1e-4);
        let frame = sim.tick(150.0);
        assert!((frame.hud.time_remaining - 29.85).abs() < 1e-4);
    }

    #[test]
    fn test_catch_builds_story_and_hops() {
        let mut sim = running(quiet_tuning(), words(8));
        let pos = sim.player().pos;
        let role = sim.snapshot().expected_role.unwrap();
        sim.place_entity(
            EntityKind::Word {
                text: "una brújula".into(),
                role,
            },
            pos,
            0.0,
        );
        let frame = sim.tick(0.0);
        assert_eq!(frame.hud.score, 1);
        assert_eq!(sim.story_text(), "Una brújula.");
        assert!(sim.player().vy < 0.0);

        assert!(sim.undo_word());
        assert_eq!(sim.story_text(), "");
        assert!(!sim.undo_word());
        assert_eq!(sim.snapshot().word_count, 0);
    }

    #[test]
    fn test_clear_story_forgets_recent_words() {
        let mut sim = running(Tuning::default(), words(9));
        for i in 0..30 {
            sim.tick(i as f64 * 16.0);
        }
        sim.clear_story();
        assert_eq!(sim.story_text(), "");
        assert_eq!(sim.factory.content().map(|c| c.recent().count()), Some(0));
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut sim = running(quiet_tuning(), words(10));
        sim.tick(0.0);
        sim.tick(100.0);
        let remaining = sim.snapshot().time_remaining;
        assert!(sim.pause());
        sim.tick(200.0);
        sim.tick(5_000.0);
        assert_eq!(sim.snapshot().time_remaining, remaining);
        assert!(sim.resume());
        sim.tick(10_000.0);
        assert_eq!(sim.snapshot().time_remaining, remaining);
        assert!(!sim.resume());
    }

    #[test]
    fn test_restart_and_reset() {
        let mut sim = running(quiet_tuning(), words(11).with_duration(0.1));
        assert_eq!(sim.restart(), Err(ConfigError::NotEnded));
        sim.tick(0.0);
        sim.tick(200.0);
        assert_eq!(sim.phase(), Phase::Ended);

        sim.restart().unwrap();
        assert_eq!(sim.phase(), Phase::Running);
        let snap = sim.snapshot();
        assert_eq!(snap.level, 1);
        assert_eq!(snap.time_remaining, 0.1);
        assert_eq!(snap.won, None);

        sim.reset();
        assert_eq!(sim.phase(), Phase::Idle);
        assert!(sim.entities().is_empty());
        assert!(sim.start(words(12)).is_ok());
    }

    #[test]
    fn test_fault_ends_session() {
        let mut sim = running(quiet_tuning(), words(13));
        sim.place_entity(EntityKind::Cloud, Vec2::new(f32::NAN, 10.0), 100.0);
        let frame = sim.tick(0.0);
        assert_eq!(frame.phase, Phase::Ended);
        assert!(frame.cues.contains(&SoundCue::MusicStop));
        let snap = sim.snapshot();
        assert!(snap.fault.is_some());
        assert_eq!(snap.won, None);
        assert!(!sim.did_win());
    }

    #[test]
    fn test_non_finite_timestamp_faults() {
        let mut sim = running(quiet_tuning(), words(14));
        let frame = sim.tick(f64::NAN);
        assert_eq!(frame.phase, Phase::Ended);
        assert!(sim.snapshot().fault.is_some());
    }

    #[test]
    fn test_keys_move_player() {
        let mut sim = running(quiet_tuning(), words(15));
        let x = sim.player().pos.x;
        sim.handle_input(InputEvent::KeyDown { key: Key::Right });
        sim.tick(0.0);
        sim.tick(100.0);
        assert!(sim.player().pos.x > x);
        sim.handle_input(InputEvent::KeyUp { key: Key::Right });
        assert_eq!(sim.input().direction(), 0.0);
    }

    #[test]
    fn test_ticks_ignored_outside_running() {
        let mut sim = Simulation::new(Tuning::default()).unwrap();
        let frame = sim.tick(0.0);
        assert_eq!(frame.phase, Phase::Idle);
        assert!(frame.events.is_empty());
    }

    #[test]
    fn test_deterministic_with_seed() {
        let run = || {
            let mut sim = running(
                Tuning::default(),
                SessionConfig::new("nuveciela", "Ana", GameMode::Stars).with_seed(2024),
            );
            let mut frames = Vec::new();
            for i in 0..600 {
                if i == 100 {
                    sim.handle_input(InputEvent::KeyDown { key: Key::Left });
                }
                if i == 250 {
                    sim.handle_input(InputEvent::KeyUp { key: Key::Left });
                }
                frames.push(sim.tick(i as f64 * 1000.0 / 60.0));
            }
            (frames, sim.snapshot())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_injected_rng_used_without_seed() {
        let config = SessionConfig::new("nuve", "Ana", GameMode::Stars);
        let make = || {
            let mut sim = Simulation::with_rng(Tuning::default(), Pcg32::seed_from_u64(77)).unwrap();
            sim.start(config.clone()).unwrap();
            sim
        };
        let (a, b) = (make(), make());
        assert_eq!(a.snapshot().seed, None);
        assert_eq!(a.entities(), b.entities());
    }

    #[test]
    fn test_entities_sorted_by_id() {
        let mut sim = running(Tuning::default(), SessionConfig::new("ciela", "Ana", GameMode::Stars).with_seed(16));
        for i in 0..200 {
            sim.tick(i as f64 * 16.0);
        }
        let ids: Vec<u32> = sim.entities().iter().map(|e| e.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
