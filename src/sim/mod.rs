//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Delta-time scaled against a 60 Hz nominal frame
//! - Seeded RNG only
//! - Items resolved in spawn order

pub mod collision;
pub mod feedback;
pub mod kinematics;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use spawner::SpawnKind;
pub use state::{
    BallTier, GameEvent, GameState, Item, ItemKind, Particle, ParticleKind, PlayerState, Viewport,
};
pub use tick::{TickInput, jump_press, jump_release, tick};
pub use timer::Countdown;
