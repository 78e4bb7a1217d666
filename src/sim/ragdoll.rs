//! Verlet ragdolls: a 16-joint, 17-stick skeleton with player or enemy behavior

use glam::Vec2;
use rand::Rng;

use super::arrow::{Arrow, ArrowKind, Owner};
use super::joint::Joint;
use super::particle::{Particle, ParticleColor, ParticleSystem};
use super::platform::Platform;
use super::state::{EntityId, GameEvent, GameState, SoundCue};
use super::stick::Stick;
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Named skeleton joints, in collision-test order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Head,
    Neck,
    Chest,
    Waist,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftHand,
    RightHand,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftFoot,
    RightFoot,
}

pub const PART_COUNT: usize = 16;
pub const STICK_COUNT: usize = 17;

/// Distance from the spawn origin down to the feet
const FEET_OFFSET: f32 = 55.0;

impl Part {
    pub const ALL: [Part; PART_COUNT] = [
        Part::Head,
        Part::Neck,
        Part::Chest,
        Part::Waist,
        Part::LeftShoulder,
        Part::RightShoulder,
        Part::LeftElbow,
        Part::RightElbow,
        Part::LeftHand,
        Part::RightHand,
        Part::LeftHip,
        Part::RightHip,
        Part::LeftKnee,
        Part::RightKnee,
        Part::LeftFoot,
        Part::RightFoot,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rest offset from the ragdoll origin and collision radius
    fn rest_pose(self) -> (Vec2, f32) {
        let (x, y, r) = match self {
            Part::Head => (0.0, -25.0, 8.0),
            Part::Neck => (0.0, -15.0, 3.0),
            Part::Chest => (0.0, 0.0, 6.0),
            Part::Waist => (0.0, 15.0, 5.0),
            Part::LeftShoulder => (-10.0, -10.0, 4.0),
            Part::RightShoulder => (10.0, -10.0, 4.0),
            Part::LeftElbow => (-15.0, 5.0, 3.0),
            Part::RightElbow => (15.0, 5.0, 3.0),
            Part::LeftHand => (-20.0, 20.0, 3.0),
            Part::RightHand => (20.0, 20.0, 3.0),
            Part::LeftHip => (-5.0, 25.0, 4.0),
            Part::RightHip => (5.0, 25.0, 4.0),
            Part::LeftKnee => (-7.0, 40.0, 3.0),
            Part::RightKnee => (7.0, 40.0, 3.0),
            Part::LeftFoot => (-10.0, FEET_OFFSET, 3.0),
            Part::RightFoot => (10.0, FEET_OFFSET, 3.0),
        };
        (Vec2::new(x, y), r)
    }
}

/// Spine, arms, legs, then the hip and shoulder cross-braces
const SKELETON: [(Part, Part); STICK_COUNT] = [
    (Part::Head, Part::Neck),
    (Part::Neck, Part::Chest),
    (Part::Chest, Part::Waist),
    (Part::Chest, Part::LeftShoulder),
    (Part::Chest, Part::RightShoulder),
    (Part::LeftShoulder, Part::LeftElbow),
    (Part::RightShoulder, Part::RightElbow),
    (Part::LeftElbow, Part::LeftHand),
    (Part::RightElbow, Part::RightHand),
    (Part::Waist, Part::LeftHip),
    (Part::Waist, Part::RightHip),
    (Part::LeftHip, Part::LeftKnee),
    (Part::RightHip, Part::RightKnee),
    (Part::LeftKnee, Part::LeftFoot),
    (Part::RightKnee, Part::RightFoot),
    (Part::LeftHip, Part::RightHip),
    (Part::LeftShoulder, Part::RightShoulder),
];

/// Role-specific state
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Player {
        aim_angle: f32,
        bow_length: f32,
    },
    Enemy {
        shoot_timer: u32,
        shoot_cooldown: u32,
        /// 0.7-1.0, sampled once at spawn
        accuracy: f32,
        /// Index of the platform the enemy was placed on
        platform: Option<usize>,
    },
}

/// Result of applying damage to a ragdoll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already dead (or gone); nothing changed
    AlreadyDead,
    Wounded,
    /// This hit was lethal; reported exactly once per ragdoll
    Killed,
}

#[derive(Debug, Clone)]
pub struct Ragdoll {
    pub id: EntityId,
    pub joints: [Joint; PART_COUNT],
    sticks: [Stick; STICK_COUNT],
    pub health: f32,
    pub max_health: f32,
    pub dead: bool,
    /// Ticks spent dead
    pub death_timer: u32,
    pub role: Role,
}

impl Ragdoll {
    fn new(id: EntityId, origin: Vec2, role: Role, ground_y: f32) -> Self {
        // Never spawn with the feet below ground
        let feet_y = (origin.y + FEET_OFFSET).min(ground_y);
        let origin = Vec2::new(origin.x, feet_y - FEET_OFFSET);

        let joints = Part::ALL.map(|part| {
            let (offset, radius) = part.rest_pose();
            Joint::new(origin + offset, radius)
        });
        let sticks = SKELETON.map(|(a, b)| Stick::between(&joints, a.index(), b.index()));

        Self {
            id,
            joints,
            sticks,
            health: RAGDOLL_MAX_HEALTH,
            max_health: RAGDOLL_MAX_HEALTH,
            dead: false,
            death_timer: 0,
            role,
        }
    }

    pub fn player(id: EntityId, origin: Vec2, ground_y: f32) -> Self {
        let role = Role::Player {
            aim_angle: 0.0,
            bow_length: BOW_LENGTH,
        };
        Self::new(id, origin, role, ground_y)
    }

    pub fn enemy<R: Rng>(
        id: EntityId,
        origin: Vec2,
        platform: Option<usize>,
        rng: &mut R,
        ground_y: f32,
    ) -> Self {
        let role = Role::Enemy {
            shoot_timer: 0,
            shoot_cooldown: rng.random_range(180..300),
            accuracy: 0.7 + rng.random::<f32>() * 0.3,
            platform,
        };
        Self::new(id, origin, role, ground_y)
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player { .. })
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    #[inline]
    pub fn joint(&self, part: Part) -> &Joint {
        &self.joints[part.index()]
    }

    #[inline]
    pub fn chest(&self) -> Vec2 {
        self.joint(Part::Chest).pos
    }

    pub fn sticks(&self) -> &[Stick] {
        &self.sticks
    }

    /// Stick segments as world-space endpoint pairs
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.sticks.iter().map(|s| {
            let (a, b) = s.endpoints();
            (self.joints[a].pos, self.joints[b].pos)
        })
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Player aim, if this is the player
    pub fn aim_angle(&self) -> Option<f32> {
        match self.role {
            Role::Player { aim_angle, .. } => Some(aim_angle),
            Role::Enemy { .. } => None,
        }
    }

    /// Bow limb from the left hand along the aim (player only)
    pub fn bow(&self) -> Option<(Vec2, Vec2)> {
        match self.role {
            Role::Player {
                aim_angle,
                bow_length,
            } => {
                let grip = self.joint(Part::LeftHand).pos;
                Some((grip, grip + polar_to_cartesian(bow_length, aim_angle)))
            }
            Role::Enemy { .. } => None,
        }
    }

    pub fn standing_platform(&self) -> Option<usize> {
        match self.role {
            Role::Enemy { platform, .. } => platform,
            Role::Player { .. } => None,
        }
    }

    /// Whether either foot rests on `platform`
    pub fn stands_on(&self, platform: &Platform) -> bool {
        [Part::LeftFoot, Part::RightFoot]
            .iter()
            .any(|&foot| platform.supports(self.joint(foot).pos, PLATFORM_TOLERANCE))
    }

    /// First joint (in skeleton order) within its radius plus `margin` of `point`
    pub fn joint_hit(&self, point: Vec2, margin: f32) -> Option<usize> {
        self.joints
            .iter()
            .position(|j| j.pos.distance(point) < j.radius + margin)
    }

    /// Advance one tick. Returns false once the ragdoll should be removed.
    pub fn update(&mut self, state: &mut GameState) -> bool {
        if self.dead {
            self.death_timer += 1;
            if self.death_timer > DEATH_WINDOW_TICKS {
                return false;
            }
        }

        self.step_physics(&state.platforms, &state.tuning);

        if !self.dead {
            if self.is_player() {
                self.update_aim(state);
            } else {
                self.update_ai(state);
            }
        }

        true
    }

    /// Solver iterations followed by a hard ground clamp
    pub fn step_physics(&mut self, platforms: &[Platform], tuning: &Tuning) {
        for _ in 0..tuning.solver_iterations {
            for joint in self.joints.iter_mut() {
                joint.update(platforms, tuning);
            }
            for stick in self.sticks.iter() {
                stick.update(&mut self.joints, tuning.joint_stiffness);
            }
        }

        // Stick corrections can push joints back under the ground
        for joint in self.joints.iter_mut() {
            if joint.pos.y > tuning.ground_y {
                joint.pos.y = tuning.ground_y;
            }
        }
    }

    fn update_aim(&mut self, state: &GameState) {
        let hand = self.joint(Part::RightHand).pos;
        let angle = crate::angle_between(hand, state.mouse_pos);

        if let Role::Player { aim_angle, .. } = &mut self.role {
            *aim_angle = angle;
        }

        // Draw the string: pull the hand back along the aim
        if state.is_charging {
            let pull = polar_to_cartesian(state.charge_power * DRAW_PULL, angle);
            self.joints[Part::RightHand.index()].pos -= pull;
        }
    }

    fn update_ai(&mut self, state: &mut GameState) {
        let Role::Enemy {
            shoot_timer,
            shoot_cooldown,
            accuracy,
            ..
        } = &mut self.role
        else {
            return;
        };

        *shoot_timer += 1;
        if *shoot_timer <= *shoot_cooldown {
            return;
        }
        *shoot_timer = 0;
        *shoot_cooldown = state.rng.random_range(120..300);
        let accuracy = *accuracy;

        self.shoot_at_player(state, accuracy);
    }

    fn shoot_at_player(&self, state: &mut GameState, accuracy: f32) {
        let Some(target) = state.player.as_ref().filter(|p| p.is_alive()) else {
            return;
        };

        let hand = self.joint(Part::RightHand).pos;
        let base = crate::angle_between(hand, target.chest());
        let inaccuracy = (state.rng.random::<f32>() - 0.5) * (2.0 - accuracy);
        let aim = base + inaccuracy;

        let power = ENEMY_SHOT_POWER_MIN + state.rng.random::<f32>() * ENEMY_SHOT_POWER_RANGE;
        let vel = polar_to_cartesian(power * state.tuning.arrow_speed_multiplier, aim);
        let pos = hand + polar_to_cartesian(ARROW_SPAWN_OFFSET, aim);

        state
            .arrows
            .push(Arrow::new(pos, vel, ArrowKind::Regular, Owner::Enemy));
        state.emit(GameEvent::Sound(SoundCue::ArrowRelease));
    }

    /// Release the drawn bow. Returns true if an arrow was fired.
    pub fn shoot(&self, state: &mut GameState) -> bool {
        if self.dead || state.charge_power < state.tuning.min_shot_power {
            return false;
        }
        let Some(aim) = self.aim_angle() else {
            return false;
        };

        let kind = state.selected_arrow;
        if !state.ammo.consume(kind) {
            return false;
        }

        let hand = self.joint(Part::RightHand).pos;
        let speed = state.charge_power * state.tuning.arrow_speed_multiplier;
        let vel = polar_to_cartesian(speed, aim);
        let pos = hand + polar_to_cartesian(ARROW_SPAWN_OFFSET, aim);
        state.arrows.push(Arrow::new(pos, vel, kind, Owner::Player));

        state.charge_power = 0.0;
        state.is_charging = false;
        state.emit(GameEvent::Sound(SoundCue::ArrowRelease));
        true
    }

    /// Apply a hit. Scoring is left to the caller via the returned outcome.
    pub fn take_damage<R: Rng>(
        &mut self,
        amount: f32,
        impact: Vec2,
        force: Vec2,
        rng: &mut R,
        particles: &mut ParticleSystem,
    ) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::AlreadyDead;
        }

        self.health -= amount;
        self.apply_impact(impact, force);
        spawn_blood(impact, force, rng, particles);

        if self.health <= 0.0 {
            self.health = 0.0;
            self.dead = true;
            return DamageOutcome::Killed;
        }
        self.health = self.health.min(self.max_health);
        DamageOutcome::Wounded
    }

    /// Push every joint near the impact, weighted linearly by distance
    pub fn apply_impact(&mut self, impact: Vec2, force: Vec2) {
        for joint in self.joints.iter_mut() {
            let dist = joint.pos.distance(impact);
            if dist < IMPACT_RADIUS {
                let weight = (IMPACT_RADIUS - dist) / IMPACT_RADIUS;
                joint.apply_impulse(force * weight, IMPULSE_CARRY);
            }
        }
    }
}

fn spawn_blood<R: Rng>(impact: Vec2, force: Vec2, rng: &mut R, particles: &mut ParticleSystem) {
    for _ in 0..BLOOD_PARTICLES {
        let pos = impact
            + Vec2::new(
                (rng.random::<f32>() - 0.5) * 10.0,
                (rng.random::<f32>() - 0.5) * 10.0,
            );
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 6.0 + force.x * 0.1,
            (rng.random::<f32>() - 0.5) * 6.0 + force.y * 0.1,
        );
        let life = 30.0 + rng.random::<f32>() * 20.0;
        particles.spawn(Particle::new(pos, vel, ParticleColor::Blood, life));
    }
}
