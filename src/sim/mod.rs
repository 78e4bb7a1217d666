//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (player first, then enemies in spawn order)
//! - No rendering, audio or platform dependencies

pub mod arrow;
pub mod joint;
pub mod particle;
pub mod platform;
pub mod ragdoll;
pub mod state;
pub mod stick;
pub mod tick;

pub use arrow::{Ammo, Arrow, ArrowKind, ArrowState, ArrowStats, Owner, StuckTo};
pub use joint::Joint;
pub use particle::{Particle, ParticleColor, ParticleSystem};
pub use platform::Platform;
pub use ragdoll::{DamageOutcome, PART_COUNT, Part, Ragdoll, Role, STICK_COUNT};
pub use state::{EntityId, GameEvent, GameState, SoundCue, enemy_count};
pub use stick::Stick;
pub use tick::{TickInput, tick, update_arrows};
