//! Decorative particles
//!
//! Particles never interact with anything; they only fall, drag and fade.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-tick downward acceleration
const PARTICLE_GRAVITY: f32 = 0.05;
/// Per-tick horizontal velocity retention
const PARTICLE_DRAG: f32 = 0.98;

/// Color tag resolved to RGBA by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Regular arrow splinters
    Wood,
    /// Fire arrow impact
    Flame,
    /// Heavy arrow impact
    Iron,
    /// Split arrow impact
    Split,
    /// Firework arrow impact
    Spark,
    /// Firework detonation ring (hue in degrees)
    Burst { hue: u16 },
    /// Fire arrow embers (hue 0-60: red to yellow)
    Ember { hue: u16 },
    Blood,
}

/// A short-lived point sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: ParticleColor,
    /// Remaining life in ticks
    pub life: f32,
    /// Life at spawn, for fading
    pub max_life: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: ParticleColor, life: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            life,
            max_life: life,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.vel.x *= PARTICLE_DRAG;
        self.life -= 1.0;
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Remaining life fraction (1 at spawn, 0 when dead)
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Ordered, capped particle collection
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    cap: usize,
}

impl ParticleSystem {
    pub fn new(cap: usize) -> Self {
        Self {
            particles: Vec::with_capacity(cap.min(1024)),
            cap,
        }
    }

    /// Add a particle; dropped when the system is full
    pub fn spawn(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.cap {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Advance every particle and drop the dead ones
    pub fn update(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.update();
        }
        self.particles.retain(|p| !p.is_dead());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_update_moves_and_decays() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(2.0, -1.0), ParticleColor::Blood, 10.0);
        p.update();
        assert_eq!(p.pos, Vec2::new(2.0, -1.0));
        assert!((p.vel.x - 2.0 * PARTICLE_DRAG).abs() < 1e-6);
        assert!((p.vel.y - (-1.0 + PARTICLE_GRAVITY)).abs() < 1e-6);
        assert_eq!(p.life, 9.0);
        assert!(!p.is_dead());
    }

    #[test]
    fn test_dies_at_zero() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, ParticleColor::Wood, 2.0);
        p.update();
        p.update();
        assert!(p.is_dead());
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn test_system_caps_and_filters() {
        let mut system = ParticleSystem::new(3);
        for life in [1.0, 5.0, 5.0, 5.0] {
            system.spawn(Particle::new(Vec2::ZERO, Vec2::ZERO, ParticleColor::Blood, life));
        }
        assert_eq!(system.len(), 3);
        system.update();
        // The 1-tick particle is filtered on the same pass it dies
        assert_eq!(system.len(), 2);
        assert!(system.iter().all(|p| !p.is_dead()));
    }

    proptest! {
        #[test]
        fn prop_dead_after_life_ticks(
            life in 1u32..200,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let vel = Vec2::new(vx, vy);
            let mut p = Particle::new(Vec2::ZERO, vel, ParticleColor::Spark, life as f32);
            for _ in 0..life - 1 {
                p.update();
                prop_assert!(!p.is_dead());
                prop_assert!(p.alpha() > 0.0 && p.alpha() <= 1.0);
            }
            p.update();
            prop_assert!(p.is_dead());
        }
    }
}
