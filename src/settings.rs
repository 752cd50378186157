//! Session configuration chosen by the host before a run
//!
//! Passed to `Simulation::start`. Serializable so the host page can hand it
//! over as JSON.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::wordbank;

/// Longest player name kept (extra characters are dropped)
pub const MAX_PLAYER_NAME_CHARS: usize = 18;

/// Which flavour of falling content the run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Catch words in template order to build sentences
    #[default]
    Words,
    /// Catch stars, dodge clouds, grab powerups
    Stars,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Words => "Words",
            GameMode::Stars => "Stars",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "words" | "word" => Some(GameMode::Words),
            "stars" | "star" => Some(GameMode::Stars),
            _ => None,
        }
    }
}

/// Optional gameplay layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    /// Falling hazards (clouds)
    pub hazards: bool,
    /// Timed powerups (magnet, shield, clock)
    pub powerups: bool,
    /// Bonus items (heart, hourglass)
    pub bonus_items: bool,
    /// Background crossfade on level change
    pub scene_transitions: bool,
    /// Day/night environment cycle
    pub day_night: bool,
    /// Avatar hops when it catches something
    pub jump_on_catch: bool,
}

impl Features {
    /// Defaults for a mode: words is the plain catcher, stars has everything on
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Words => Self {
                hazards: false,
                powerups: false,
                bonus_items: false,
                scene_transitions: false,
                day_night: false,
                jump_on_catch: true,
            },
            GameMode::Stars => Self {
                hazards: true,
                powerups: true,
                bonus_items: true,
                scene_transitions: true,
                day_night: true,
                jump_on_catch: true,
            },
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::for_mode(GameMode::default())
    }
}

/// Everything the host decides before a run starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Selected character profile id (e.g. "lunaria")
    pub profile_id: String,
    /// Name shown on the HUD
    pub player_name: String,
    /// Fixed seed for reproducible runs; drawn from the platform when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Session length in seconds
    pub duration_secs: f32,
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default)]
    pub features: Features,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            profile_id: String::new(),
            player_name: String::new(),
            seed: None,
            duration_secs: 30.0,
            mode: GameMode::Words,
            features: Features::for_mode(GameMode::Words),
        }
    }
}

impl SessionConfig {
    /// Config for a mode with that mode's default feature set
    pub fn new(profile_id: &str, player_name: &str, mode: GameMode) -> Self {
        Self {
            profile_id: profile_id.to_string(),
            player_name: player_name.to_string(),
            mode,
            features: Features::for_mode(mode),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_duration(mut self, secs: f32) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Trimmed, length-capped player name
    pub fn display_name(&self) -> String {
        self.player_name
            .trim()
            .chars()
            .take(MAX_PLAYER_NAME_CHARS)
            .collect()
    }

    /// Check the config can start a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_name().is_empty() {
            return Err(ConfigError::EmptyPlayerName);
        }
        let id = self.profile_id.trim().to_lowercase();
        if wordbank::profile(&id).is_none() {
            return Err(ConfigError::UnknownProfile(self.profile_id.clone()));
        }
        if !(self.duration_secs.is_finite() && self.duration_secs > 0.0) {
            return Err(ConfigError::InvalidDuration(self.duration_secs));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ok() {
        let config = SessionConfig::new("Lunaria", "Ana", GameMode::Stars);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let config = SessionConfig::new("ciela", "   ", GameMode::Words);
        assert_eq!(config.validate(), Err(ConfigError::EmptyPlayerName));
    }

    #[test]
    fn test_validate_rejects_unknown_profile() {
        let config = SessionConfig::new("nobody", "Ana", GameMode::Words);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let config = SessionConfig::new("nuve", "Ana", GameMode::Words).with_duration(0.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidDuration(0.0)));
    }

    #[test]
    fn test_display_name_trimmed_and_capped() {
        let config = SessionConfig::new("nuve", "  Maximiliana Fernanda Sol  ", GameMode::Words);
        assert_eq!(config.display_name().chars().count(), MAX_PLAYER_NAME_CHARS);
        assert!(config.display_name().starts_with("Maximiliana"));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(GameMode::from_str("STARS"), Some(GameMode::Stars));
        assert_eq!(GameMode::from_str("word"), Some(GameMode::Words));
        assert_eq!(GameMode::from_str("x"), None);
    }

    #[test]
    fn test_config_json_defaults() {
        let json = r#"{"profile_id":"nuve","player_name":"Ana","duration_secs":60.0}"#;
        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.mode, GameMode::Words);
        assert!(config.seed.is_none());
    }
}
