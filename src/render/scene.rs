//! Flattening the world into instance buffers

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use super::instance::{CircleInstance, LineInstance, RectInstance, colors, hue_color, with_alpha};
use crate::consts::ARROW_SPAWN_OFFSET;
use crate::polar_to_cartesian;
use crate::sim::{Arrow, ArrowKind, GameState, Owner, Part, Particle, ParticleColor, Ragdoll};

const HEALTH_BAR_SIZE: Vec2 = Vec2::new(40.0, 6.0);
/// Health bar sits this far above the head
const HEALTH_BAR_LIFT: f32 = 20.0;
/// Half-width of the bow where the string attaches
const BOW_STRING_SPREAD: f32 = 8.0;
/// Ticks simulated for the aim preview
const PREVIEW_TICKS: usize = 60;
/// Keep every Nth preview sample
const PREVIEW_STRIDE: usize = 3;

/// Everything a renderer needs for one frame, in draw order per buffer
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub rects: Vec<RectInstance>,
    pub lines: Vec<LineInstance>,
    pub circles: Vec<CircleInstance>,
}

impl Scene {
    pub fn capture(state: &GameState) -> Self {
        let mut scene = Self::default();
        let tuning = &state.tuning;

        scene.rects.push(RectInstance::new(
            Vec2::new(0.0, tuning.ground_y),
            Vec2::new(tuning.world_width, tuning.arrow_max_y - tuning.ground_y),
            colors::GROUND,
        ));
        for platform in state.platforms.iter().filter(|p| p.is_solid()) {
            // Collapsing platforms jitter sideways
            let jitter = if platform.shake > 0.0 {
                let phase = state.time_ticks as f32 * 1.7;
                phase.sin() * 2.0 * platform.shake
            } else {
                0.0
            };
            scene.rects.push(RectInstance::new(
                Vec2::new(platform.x + jitter, platform.y),
                Vec2::new(platform.width, platform.height),
                colors::PLATFORM,
            ));
        }

        for ragdoll in state.player.iter().chain(state.enemies.iter()) {
            scene.push_ragdoll(ragdoll);
        }
        if let Some(player) = state.player.as_ref().filter(|p| p.is_alive()) {
            scene.push_bow(player, state);
        }

        for arrow in state.arrows.iter() {
            scene.push_arrow(arrow);
        }
        for particle in state.particles.iter() {
            scene.push_particle(particle);
        }

        scene
    }

    fn push_ragdoll(&mut self, ragdoll: &Ragdoll) {
        let (bone, skin, width) = if ragdoll.dead {
            (colors::BONE_DEAD, colors::SKIN_DEAD, 2.0)
        } else {
            (colors::BONE, colors::SKIN, 3.0)
        };

        for (a, b) in ragdoll.segments() {
            self.lines.push(LineInstance::new(a, b, width, bone));
        }
        for joint in ragdoll.joints.iter() {
            self.circles
                .push(CircleInstance::new(joint.pos, joint.radius, skin));
        }

        if ragdoll.is_alive() {
            let head = ragdoll.joint(Part::Head).pos;
            let min = head - Vec2::new(HEALTH_BAR_SIZE.x / 2.0, HEALTH_BAR_LIFT);
            let fraction = ragdoll.health_fraction();
            let fill = if fraction > 0.5 {
                colors::HEALTH_HIGH
            } else if fraction > 0.25 {
                colors::HEALTH_MID
            } else {
                colors::HEALTH_LOW
            };
            self.rects
                .push(RectInstance::new(min, HEALTH_BAR_SIZE, colors::HEALTH_BACK));
            self.rects.push(RectInstance::new(
                min,
                Vec2::new(HEALTH_BAR_SIZE.x * fraction, HEALTH_BAR_SIZE.y),
                fill,
            ));
        }
    }

    fn push_bow(&mut self, player: &Ragdoll, state: &GameState) {
        let (Some((grip, tip)), Some(aim)) = (player.bow(), player.aim_angle()) else {
            return;
        };
        self.lines
            .push(LineInstance::new(grip, tip, 4.0, colors::BOW));

        if !state.is_charging {
            return;
        }

        let hand = player.joint(Part::RightHand).pos;
        let spread = polar_to_cartesian(BOW_STRING_SPREAD, aim + FRAC_PI_2);
        self.lines
            .push(LineInstance::new(grip + spread, hand, 2.0, colors::BOW_STRING));
        self.lines
            .push(LineInstance::new(hand, grip - spread, 2.0, colors::BOW_STRING));

        let preview = trajectory_preview(state);
        for pair in preview.windows(2).step_by(2) {
            self.lines
                .push(LineInstance::new(pair[0], pair[1], 2.0, colors::TRAJECTORY));
        }
    }

    fn push_arrow(&mut self, arrow: &Arrow) {
        let color = arrow_color(arrow);

        let len = arrow.trail.len() as f32;
        for (i, point) in arrow.trail.iter().enumerate() {
            let t = i as f32 / len;
            self.circles.push(CircleInstance::new(
                *point,
                0.5 + t,
                with_alpha(color, t * 0.5),
            ));
        }

        let half = polar_to_cartesian(arrow.stats().length / 2.0, arrow.angle);
        self.lines
            .push(LineInstance::new(arrow.pos - half, arrow.pos + half, 3.0, color));
    }

    fn push_particle(&mut self, particle: &Particle) {
        let alpha = particle.alpha();
        let color = match particle.color {
            ParticleColor::Wood => with_alpha(colors::WOOD, alpha),
            ParticleColor::Flame => with_alpha(colors::FLAME, alpha),
            ParticleColor::Iron => with_alpha(colors::IRON, alpha),
            ParticleColor::Split => with_alpha(colors::SPLIT, alpha),
            ParticleColor::Spark => with_alpha(colors::SPARK, alpha),
            ParticleColor::Blood => with_alpha(colors::BLOOD, alpha),
            ParticleColor::Burst { hue } | ParticleColor::Ember { hue } => hue_color(hue, alpha),
        };
        self.circles
            .push(CircleInstance::new(particle.pos, 1.5, color));
    }

    pub fn circle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.circles)
    }

    pub fn line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lines)
    }

    pub fn rect_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rects)
    }
}

fn arrow_color(arrow: &Arrow) -> [f32; 4] {
    if arrow.owner == Owner::Enemy {
        return colors::ARROW_ENEMY;
    }
    match arrow.kind {
        ArrowKind::Regular => colors::ARROW_REGULAR,
        ArrowKind::Fire => colors::ARROW_FIRE,
        ArrowKind::Heavy => colors::ARROW_HEAVY,
        ArrowKind::Split => colors::ARROW_SPLIT,
        ArrowKind::Firework => colors::ARROW_FIREWORK,
    }
}

/// Predicted flight path of the drawn arrow, sampled every few ticks.
///
/// Empty unless the player is alive and drawing.
pub fn trajectory_preview(state: &GameState) -> Vec<Vec2> {
    let Some(player) = state.player.as_ref().filter(|p| p.is_alive()) else {
        return Vec::new();
    };
    let Some(aim) = player.aim_angle() else {
        return Vec::new();
    };
    if !state.is_charging {
        return Vec::new();
    }

    let tuning = &state.tuning;
    let wind_factor = state.selected_arrow.stats().wind_factor;
    let mut pos = player.joint(Part::RightHand).pos + polar_to_cartesian(ARROW_SPAWN_OFFSET, aim);
    let mut vel = polar_to_cartesian(state.charge_power * tuning.arrow_speed_multiplier, aim);

    let mut points = vec![pos];
    for i in 0..PREVIEW_TICKS {
        vel.y += tuning.gravity;
        vel.x += state.wind * tuning.wind_strength * wind_factor;
        pos += vel;
        if pos.x < 0.0 || pos.x > tuning.world_width || pos.y > tuning.ground_y {
            break;
        }
        if i % PREVIEW_STRIDE == 0 {
            points.push(pos);
        }
    }
    points
}
