//! GPU instance types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Filled circle (joints, heads, particles, trail dots)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub const fn new(center: Vec2, radius: f32, color: [f32; 4]) -> Self {
        Self {
            center: [center.x, center.y],
            radius,
            _pad: 0.0,
            color,
        }
    }
}

/// Round-capped line segment (bones, bow, arrow shafts, trajectory dashes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub a: [f32; 2],
    pub b: [f32; 2],
    pub width: f32,
    pub _pad: [f32; 3],
    pub color: [f32; 4],
}

impl LineInstance {
    pub const fn new(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Self {
        Self {
            a: [a.x, a.y],
            b: [b.x, b.y],
            width,
            _pad: [0.0; 3],
            color,
        }
    }
}

/// Axis-aligned filled rectangle (platforms, ground, health bars)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub min: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl RectInstance {
    pub const fn new(min: Vec2, size: Vec2, color: [f32; 4]) -> Self {
        Self {
            min: [min.x, min.y],
            size: [size.x, size.y],
            color,
        }
    }
}

/// Replace the alpha channel
#[inline]
pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// HSL (hue in degrees, full saturation, half lightness) to RGBA
pub fn hue_color(hue: u16, alpha: f32) -> [f32; 4] {
    let h = (hue % 360) as f32 / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [r, g, b, alpha]
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.53, 0.81, 0.92, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.6, 0.98, 0.6, 1.0];
    pub const GROUND: [f32; 4] = [0.13, 0.55, 0.13, 1.0];
    pub const PLATFORM: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const BONE: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const BONE_DEAD: [f32; 4] = [0.6, 0.6, 0.6, 1.0];
    pub const SKIN: [f32; 4] = [1.0, 0.89, 0.71, 1.0];
    pub const SKIN_DEAD: [f32; 4] = [0.87, 0.87, 0.87, 1.0];
    pub const BOW: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const BOW_STRING: [f32; 4] = [0.4, 0.26, 0.13, 1.0];
    pub const TRAJECTORY: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
    pub const HEALTH_BACK: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
    pub const HEALTH_HIGH: [f32; 4] = [0.18, 0.8, 0.44, 1.0];
    pub const HEALTH_MID: [f32; 4] = [0.95, 0.61, 0.07, 1.0];
    pub const HEALTH_LOW: [f32; 4] = [0.91, 0.3, 0.24, 1.0];

    pub const ARROW_REGULAR: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const ARROW_FIRE: [f32; 4] = [1.0, 0.27, 0.27, 1.0];
    pub const ARROW_HEAVY: [f32; 4] = [0.27, 0.27, 0.27, 1.0];
    pub const ARROW_SPLIT: [f32; 4] = [0.27, 0.27, 1.0, 1.0];
    pub const ARROW_FIREWORK: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const ARROW_ENEMY: [f32; 4] = [0.55, 0.0, 0.0, 1.0];

    pub const WOOD: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const FLAME: [f32; 4] = [1.0, 0.4, 0.0, 1.0];
    pub const IRON: [f32; 4] = [0.4, 0.4, 0.4, 1.0];
    pub const SPLIT: [f32; 4] = [0.27, 0.27, 1.0, 1.0];
    pub const SPARK: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const BLOOD: [f32; 4] = [0.55, 0.0, 0.0, 1.0];
}
