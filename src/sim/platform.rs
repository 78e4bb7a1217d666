//! Static and collapsible platforms

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PLATFORM_COLLAPSE_TICKS;

/// An axis-aligned rectangle joints can stand on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub collapsible: bool,
    pub collapsed: bool,
    /// Ticks left before a collapsing platform gives way
    pub collapse_timer: Option<u32>,
    /// Cosmetic shake (0-1) while collapsing
    pub shake: f32,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32, collapsible: bool) -> Self {
        Self {
            x,
            y,
            width,
            height,
            collapsible,
            collapsed: false,
            collapse_timer: None,
            shake: 0.0,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether joints can collide with this platform
    #[inline]
    pub fn is_solid(&self) -> bool {
        !self.collapsed
    }

    /// Whether a point lies on or just above the top surface
    pub fn supports(&self, point: Vec2, tolerance: f32) -> bool {
        self.is_solid()
            && point.x >= self.x
            && point.x <= self.right()
            && (point.y - self.y).abs() <= tolerance
    }

    /// Begin the collapse countdown (collapsible platforms only, once)
    pub fn start_collapse(&mut self) -> bool {
        if !self.collapsible || self.collapsed || self.collapse_timer.is_some() {
            return false;
        }
        self.collapse_timer = Some(PLATFORM_COLLAPSE_TICKS);
        true
    }

    /// Advance the collapse countdown; returns true on the tick it gives way
    pub fn update(&mut self) -> bool {
        let Some(remaining) = self.collapse_timer else {
            return false;
        };

        if remaining <= 1 {
            self.collapse_timer = None;
            self.collapsed = true;
            self.shake = 0.0;
            return true;
        }

        self.collapse_timer = Some(remaining - 1);
        // Shake builds up toward the moment of collapse
        self.shake = 1.0 - (remaining - 1) as f32 / PLATFORM_COLLAPSE_TICKS as f32;
        false
    }

    /// Restore a collapsible platform for a new wave
    pub fn reset(&mut self) {
        if self.collapsible {
            self.collapsed = false;
            self.collapse_timer = None;
            self.shake = 0.0;
        }
    }
}
