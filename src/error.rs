//! Error types for configuration and the simulation loop boundary.

/// Rejected session or tuning configuration. The simulation stays idle.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("player name must not be empty")]
    EmptyPlayerName,

    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    #[error("session duration must be positive, got {0}")]
    InvalidDuration(f32),

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("malformed tuning json: {0}")]
    MalformedTuning(String),

    #[error("simulation is not idle")]
    NotIdle,

    #[error("no finished session to restart")]
    NotEnded,
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::MalformedTuning(err.to_string())
    }
}

/// Internal fault detected while advancing a frame.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("entity {id} has non-finite position")]
    NonFiniteEntity { id: u32 },

    #[error("player has non-finite position")]
    NonFinitePlayer,

    #[error("clock is non-finite")]
    NonFiniteClock,
}
