//! Cosmetic palette handed in by the session owner
//!
//! Purely visual. The simulation never looks at it.

use serde::{Deserialize, Serialize};

/// Sidekick that rides along behind the skater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Companion {
    #[default]
    Cat,
    Dog,
    Bunny,
}

impl Companion {
    /// Ear shape: (width, height) relative to the head radius
    pub fn ears(&self) -> (f32, f32) {
        match self {
            Companion::Cat => (0.7, 0.8),
            Companion::Dog => (0.6, 0.5),
            Companion::Bunny => (0.35, 1.6),
        }
    }

    pub fn fur(&self) -> [f32; 4] {
        match self {
            Companion::Cat => [0.95, 0.6, 0.3, 1.0],
            Companion::Dog => [0.6, 0.42, 0.28, 1.0],
            Companion::Bunny => [0.95, 0.93, 0.92, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outfit {
    pub name: String,
    pub body: [f32; 4],
    pub accent: [f32; 4],
    pub board: [f32; 4],
    pub skin: [f32; 4],
    pub companion: Companion,
}

impl Default for Outfit {
    fn default() -> Self {
        Self {
            name: "Classic".to_string(),
            body: [0.95, 0.35, 0.55, 1.0],
            accent: [1.0, 0.85, 0.3, 1.0],
            board: [0.3, 0.2, 0.45, 1.0],
            skin: [1.0, 0.84, 0.72, 1.0],
            companion: Companion::Cat,
        }
    }
}

impl Outfit {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
