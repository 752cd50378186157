//! Platform abstraction layer
//!
//! Host-facing glue: the profile catalog shown in menus and, on wasm32, the
//! `wasm-bindgen` wrapper the browser page drives once per animation frame.

use serde::{Deserialize, Serialize};

use crate::sim::wordbank::PROFILES;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

/// Menu entry for one character profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub id: String,
    pub label: String,
    pub description: String,
    pub prompt: String,
}

pub fn profile_catalog() -> Vec<ProfileInfo> {
    PROFILES
        .iter()
        .map(|p| ProfileInfo {
            id: p.id.to_string(),
            label: p.label.to_string(),
            description: p.description.to_string(),
            prompt: p.prompt.to_string(),
        })
        .collect()
}
