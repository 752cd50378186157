//! Presentation particles
//!
//! Not gameplay-affecting. Spread comes from a hash of the burst counter
//! instead of the session RNG, so particles never perturb the spawn sequence.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Colour family, picked by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Collect sparkle
    Sparkle,
    /// Golden star / pickup sparkle
    Gold,
    /// Hazard hit puff
    Smoke,
    /// Immune bounce ring
    Shield,
}

impl ParticleKind {
    fn burst_size(self) -> usize {
        match self {
            ParticleKind::Sparkle => 10,
            ParticleKind::Gold => 18,
            ParticleKind::Smoke => 14,
            ParticleKind::Shield => 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    /// 1 at birth, removed at 0
    pub life: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    cap: usize,
    bursts: u32,
}

impl ParticleSystem {
    pub fn new(cap: usize) -> Self {
        Self {
            particles: Vec::new(),
            cap,
            bursts: 0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.bursts = 0;
    }

    /// Spray a burst from `origin`. Oldest particles make room when full.
    pub fn burst(&mut self, origin: Vec2, kind: ParticleKind) {
        if self.cap == 0 {
            return;
        }
        let count = kind.burst_size();
        let seed = self.bursts.wrapping_mul(2_654_435_761);
        self.bursts = self.bursts.wrapping_add(1);

        let overflow = (self.particles.len() + count).saturating_sub(self.cap);
        if overflow > 0 {
            self.particles.drain(..overflow.min(self.particles.len()));
        }

        for i in 0..count.min(self.cap) {
            let hash = seed.wrapping_add(i as u32 * 7919).wrapping_mul(2_246_822_519);
            let jitter = (hash % 1000) as f32 / 1000.0 - 0.5;
            let angle = (i as f32 / count as f32 + jitter * 0.2) * std::f32::consts::TAU;
            let speed = 90.0 + (hash / 1000 % 120) as f32;
            let mut vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            if kind == ParticleKind::Smoke {
                // Puffs drift up
                vel.y -= 40.0;
            }
            self.particles.push(Particle {
                pos: origin,
                vel,
                kind,
                life: 1.0,
                size: 3.0 + (hash / 100_000 % 100) as f32 / 100.0 * 4.0,
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel *= 0.96;
            p.vel.y += 120.0 * dt;
            p.life -= dt * 1.6;
            p.size *= 0.995;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
