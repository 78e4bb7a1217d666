//! Ragdoll Archery - a 2D archery combat game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (verlet ragdolls, arrows, particles, waves)
//! - `tuning`: Physics tunables that are retuned together as a unit
//! - `audio`: Sound cue descriptions for an external audio layer
//! - `hud`: Read-only HUD snapshot for an external UI layer
//! - `render`: Flattened instance buffers for an external renderer

pub mod audio;
pub mod hud;
pub mod render;
pub mod sim;
pub mod tuning;

pub use hud::HudSnapshot;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Fixed gameplay constants (not part of the tunable physics set)
pub mod consts {
    /// Simulation rate the tick counts below assume
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Arrow trail capacity (oldest sample evicted first)
    pub const TRAIL_LENGTH: usize = 8;
    /// Extra margin added to a joint's radius for arrow hits
    pub const HIT_MARGIN: f32 = 3.0;
    /// Distance along the aim at which arrows are spawned from the hand
    pub const ARROW_SPAWN_OFFSET: f32 = 15.0;
    /// Fraction of arrow velocity transferred as impact force
    pub const IMPACT_FORCE_FACTOR: f32 = 0.3;

    /// Ticks a split arrow flies before splitting
    pub const SPLIT_DELAY_TICKS: u32 = 15;
    /// Angular spread of split children (radians, each side)
    pub const SPLIT_SPREAD: f32 = 0.4;
    /// Speed multiplier applied to split children
    pub const SPLIT_SPEED_FACTOR: f32 = 0.8;

    /// Firework fuse (ticks from release to detonation)
    pub const FIREWORK_FUSE_TICKS: u32 = 90;
    pub const EXPLOSION_RADIUS: f32 = 90.0;
    pub const EXPLOSION_DAMAGE: f32 = 60.0;
    pub const EXPLOSION_KNOCKBACK: f32 = 8.0;
    pub const EXPLOSION_RING_PARTICLES: usize = 24;

    /// Ticks between trailing embers of a fire arrow
    pub const EMBER_INTERVAL_TICKS: u32 = 4;

    /// Ground bounce: vertical restitution, horizontal friction, rest threshold
    pub const ARROW_BOUNCE: f32 = 0.3;
    pub const ARROW_GROUND_FRICTION: f32 = 0.8;
    pub const ARROW_REST_SPEED: f32 = 1.0;

    /// Ragdoll health and death window
    pub const RAGDOLL_MAX_HEALTH: f32 = 100.0;
    pub const DEATH_WINDOW_TICKS: u32 = 300;
    /// Radius of the impulse applied to joints around an impact
    pub const IMPACT_RADIUS: f32 = 50.0;
    /// Share of an impulse kept as implicit velocity
    pub const IMPULSE_CARRY: f32 = 0.5;
    pub const BLOOD_PARTICLES: usize = 8;
    pub const IMPACT_PARTICLES: usize = 8;
    pub const FIRE_PARTICLES: usize = 15;

    /// Player bow
    pub const BOW_LENGTH: f32 = 35.0;
    /// Per-tick pull of the drawing hand per unit of charge
    pub const DRAW_PULL: f32 = 0.02;

    /// Enemy archer AI
    pub const ENEMY_SHOT_POWER_MIN: f32 = 30.0;
    pub const ENEMY_SHOT_POWER_RANGE: f32 = 20.0;

    /// Score awarded per enemy kill
    pub const KILL_BONUS: u64 = 100;

    /// Waves
    pub const WAVE_RESPAWN_TICKS: u32 = 3 * TICKS_PER_SECOND;
    pub const MAX_WAVE_ENEMIES: usize = 4;

    /// How far above or below a platform top a joint still counts as touching it
    pub const PLATFORM_TOLERANCE: f32 = 5.0;
    /// Ticks a collapsing platform shakes before giving way
    pub const PLATFORM_COLLAPSE_TICKS: u32 = 60;

    /// Wind: chance per tick of a nudge and the nudge span
    pub const WIND_CHANGE_CHANCE: f32 = 0.01;
    pub const WIND_NUDGE: f32 = 0.1;

    /// Starting ammunition for the limited arrow types
    pub const START_AMMO_FIRE: u32 = 10;
    pub const START_AMMO_HEAVY: u32 = 5;
    pub const START_AMMO_SPLIT: u32 = 3;
    pub const START_AMMO_FIREWORK: u32 = 3;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(10.0, FRAC_PI_2);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_angle_between_points_down() {
        // Screen space: +y is down
        let a = angle_between(Vec2::new(0.0, 0.0), Vec2::new(0.0, 5.0));
        assert!((a - FRAC_PI_2).abs() < 1e-6);
    }
}
