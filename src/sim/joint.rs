//! Verlet point masses
//!
//! Velocity is implicit: `pos - prev_pos`. Collisions rewrite `prev_pos` so
//! that the next step carries a damped bounce instead of a dead stop.

use glam::Vec2;

use super::platform::Platform;
use crate::consts::PLATFORM_TOLERANCE;
use crate::tuning::Tuning;

/// Vertical restitution when a joint lands on the ground or a platform
const LANDING_BOUNCE: f32 = 0.3;
/// Horizontal restitution when a joint hits a side wall
const WALL_BOUNCE: f32 = 0.5;

/// A point mass in a ragdoll skeleton
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    /// Pinned joints are never integrated
    pub pinned: bool,
    /// Collision radius for arrow hits
    pub radius: f32,
}

impl Joint {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            prev_pos: pos,
            pinned: false,
            radius,
        }
    }

    /// Implicit per-step velocity
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.prev_pos
    }

    /// Advance one verlet step, then resolve ground, platforms and walls
    pub fn update(&mut self, platforms: &[Platform], tuning: &Tuning) {
        if self.pinned {
            return;
        }

        let vel = self.velocity() * tuning.joint_damping;
        self.prev_pos = self.pos;
        self.pos += vel;
        self.pos.y += tuning.gravity;

        if self.pos.y > tuning.ground_y {
            self.pos.y = tuning.ground_y;
            self.prev_pos.y = self.pos.y + vel.y * LANDING_BOUNCE;
        }

        for platform in platforms.iter().filter(|p| p.is_solid()) {
            let over = self.pos.x > platform.x && self.pos.x < platform.right();
            let in_band = self.pos.y > platform.y - PLATFORM_TOLERANCE
                && self.pos.y < platform.bottom() + PLATFORM_TOLERANCE;
            // Only catch joints arriving from above the top surface
            if over && in_band && self.prev_pos.y <= platform.y {
                self.pos.y = platform.y;
                self.prev_pos.y = self.pos.y + vel.y * LANDING_BOUNCE;
            }
        }

        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.prev_pos.x = self.pos.x - vel.x * WALL_BOUNCE;
        } else if self.pos.x > tuning.world_width {
            self.pos.x = tuning.world_width;
            self.prev_pos.x = self.pos.x - vel.x * WALL_BOUNCE;
        }
    }

    /// Displace the joint and keep part of the displacement as velocity
    pub fn apply_impulse(&mut self, delta: Vec2, carry: f32) {
        self.pos += delta;
        self.prev_pos += delta * (1.0 - carry);
    }

    /// Move the joint without changing its implicit velocity
    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
        self.prev_pos += delta;
    }
}
