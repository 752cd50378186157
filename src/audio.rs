//! Sound cues
//!
//! The simulation never plays audio itself. Each frame's events are mapped
//! to cues the host turns into playback (Web Audio, native mixer, nothing).

use serde::{Deserialize, Serialize};

use crate::sim::state::{EntityKind, GameEvent};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Background music starts (session began)
    MusicStart,
    /// Background music stops (session ended)
    MusicStop,
    /// Ordinary word caught
    WordCatch,
    /// Object or tone word caught
    ImportantWordCatch,
    StarCatch,
    GoldenStarCatch,
    /// Magnet, shield or clock picked up
    PowerupCollect,
    /// Heart or hourglass picked up
    BonusCollect,
    /// Damaging hazard contact
    Hit,
    /// Hazard bounced off the shield
    Bounce,
    LevelUp,
    /// A full sentence was written
    SentenceComplete,
    /// Clock ran out with lives left
    Win,
    /// Out of lives (or faulted)
    Lose,
}

/// Cue for a single event, if it has one
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::Started => Some(SoundCue::MusicStart),
        GameEvent::Collected { kind, .. } => Some(match kind {
            EntityKind::Word { role, .. } if role.is_important() => SoundCue::ImportantWordCatch,
            EntityKind::Word { .. } => SoundCue::WordCatch,
            EntityKind::Star { golden: true } => SoundCue::GoldenStarCatch,
            EntityKind::Star { golden: false } => SoundCue::StarCatch,
            EntityKind::Powerup(_) => SoundCue::PowerupCollect,
            EntityKind::Bonus(_) => SoundCue::BonusCollect,
            // Clouds are never collected
            EntityKind::Cloud => SoundCue::Hit,
        }),
        GameEvent::Hit { .. } => Some(SoundCue::Hit),
        GameEvent::Bounced { .. } => Some(SoundCue::Bounce),
        GameEvent::LevelUp { .. } => Some(SoundCue::LevelUp),
        GameEvent::SentenceCompleted { .. } => Some(SoundCue::SentenceComplete),
        // Covered by the hit or pickup cue of the same frame
        GameEvent::EffectActivated { .. } | GameEvent::TimeBonus { .. } | GameEvent::LifeRestored { .. } => None,
        GameEvent::Ended { .. } => Some(SoundCue::MusicStop),
    }
}

/// Cues for a frame, in event order. An ending also reports win or lose.
pub fn cues_for(events: &[GameEvent]) -> Vec<SoundCue> {
    let mut cues = Vec::with_capacity(events.len());
    for event in events {
        if let Some(cue) = cue_for(event) {
            cues.push(cue);
        }
        if let GameEvent::Ended { won } = event {
            cues.push(if *won { SoundCue::Win } else { SoundCue::Lose });
        }
    }
    cues
}
