//! Timed status effects keyed by absolute expiry timestamps
//!
//! Nothing here is decremented per frame: an effect is active iff
//! `now < expiry`, so dropped frames never stretch or shorten an effect.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Collectibles in range drift toward the player
    Magnet,
    /// Collection is suppressed (overlaps pass through)
    Block,
    /// Hazard hits bounce off harmlessly
    Immune,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Magnet, EffectKind::Block, EffectKind::Immune];

    fn slot(self) -> usize {
        match self {
            EffectKind::Magnet => 0,
            EffectKind::Block => 1,
            EffectKind::Immune => 2,
        }
    }
}

/// Expiry timestamp (ms) per effect kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    expiry_ms: [f64; 3],
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or extend an effect. Returns the resulting expiry.
    ///
    /// Expiry only moves forward: re-activating with a shorter window keeps
    /// the longer one.
    pub fn activate(&mut self, kind: EffectKind, duration_ms: f64, now_ms: f64) -> f64 {
        let slot = &mut self.expiry_ms[kind.slot()];
        *slot = slot.max(now_ms + duration_ms.max(0.0));
        *slot
    }

    pub fn is_active(&self, kind: EffectKind, now_ms: f64) -> bool {
        now_ms < self.expiry_ms[kind.slot()]
    }

    /// Milliseconds left, 0 when inactive
    pub fn remaining(&self, kind: EffectKind, now_ms: f64) -> f64 {
        (self.expiry_ms[kind.slot()] - now_ms).max(0.0)
    }

    pub fn expiry(&self, kind: EffectKind) -> f64 {
        self.expiry_ms[kind.slot()]
    }

    /// Kinds active at `now_ms`
    pub fn active(&self, now_ms: f64) -> impl Iterator<Item = EffectKind> + '_ {
        EffectKind::ALL
            .into_iter()
            .filter(move |k| self.is_active(*k, now_ms))
    }

    pub fn clear(&mut self) {
        self.expiry_ms = [0.0; 3];
    }
}
