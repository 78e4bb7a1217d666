//! Arrows: flight, sticking, splitting and fireworks

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::{Particle, ParticleColor};
use super::ragdoll::{DamageOutcome, Ragdoll};
use super::state::{EntityId, GameEvent, GameState, SoundCue};
use crate::consts::*;
use crate::polar_to_cartesian;

/// The fixed set of arrow types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowKind {
    Regular,
    Fire,
    Heavy,
    Split,
    Firework,
}

/// Per-type constants, resolved once from the kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowStats {
    pub damage: f32,
    pub length: f32,
    /// Multiplier on wind acceleration (heavier arrows drift less)
    pub wind_factor: f32,
    pub impact_color: ParticleColor,
    /// Whether a hit deals damage on contact
    pub contact_damage: bool,
}

impl ArrowKind {
    pub const ALL: [ArrowKind; 5] = [
        ArrowKind::Regular,
        ArrowKind::Fire,
        ArrowKind::Heavy,
        ArrowKind::Split,
        ArrowKind::Firework,
    ];

    pub fn stats(self) -> ArrowStats {
        let (damage, wind_factor, impact_color, contact_damage) = match self {
            ArrowKind::Regular => (30.0, 1.0, ParticleColor::Wood, true),
            ArrowKind::Fire => (35.0, 1.0, ParticleColor::Flame, true),
            ArrowKind::Heavy => (50.0, 0.3, ParticleColor::Iron, true),
            ArrowKind::Split => (25.0, 1.0, ParticleColor::Split, true),
            // Fireworks only hurt through their explosion
            ArrowKind::Firework => (0.0, 1.0, ParticleColor::Spark, false),
        };
        ArrowStats {
            damage,
            length: 18.0,
            wind_factor,
            impact_color,
            contact_damage,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArrowKind::Regular => "regular",
            ArrowKind::Fire => "fire",
            ArrowKind::Heavy => "heavy",
            ArrowKind::Split => "split",
            ArrowKind::Firework => "firework",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Which side fired the arrow (decides valid targets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Anchor of an arrow embedded in a ragdoll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StuckTo {
    pub ragdoll: EntityId,
    pub joint: usize,
    /// Arrow position relative to the joint at impact
    pub offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowState {
    Flight,
    Stuck(StuckTo),
    /// Lying on the ground (fireworks waiting on their fuse)
    Resting,
    /// Finished; removed on the next filter pass
    Spent,
}

/// Per-type ammunition. Regular arrows are unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ammo {
    pub fire: u32,
    pub heavy: u32,
    pub split: u32,
    pub firework: u32,
}

impl Default for Ammo {
    fn default() -> Self {
        Self {
            fire: START_AMMO_FIRE,
            heavy: START_AMMO_HEAVY,
            split: START_AMMO_SPLIT,
            firework: START_AMMO_FIREWORK,
        }
    }
}

impl Ammo {
    /// Remaining count, `None` for unlimited
    pub fn get(&self, kind: ArrowKind) -> Option<u32> {
        match kind {
            ArrowKind::Regular => None,
            ArrowKind::Fire => Some(self.fire),
            ArrowKind::Heavy => Some(self.heavy),
            ArrowKind::Split => Some(self.split),
            ArrowKind::Firework => Some(self.firework),
        }
    }

    pub fn has(&self, kind: ArrowKind) -> bool {
        self.get(kind).is_none_or(|n| n > 0)
    }

    /// Take one arrow of this kind; false (and unchanged) when depleted
    pub fn consume(&mut self, kind: ArrowKind) -> bool {
        let slot = match kind {
            ArrowKind::Regular => return true,
            ArrowKind::Fire => &mut self.fire,
            ArrowKind::Heavy => &mut self.heavy,
            ArrowKind::Split => &mut self.split,
            ArrowKind::Firework => &mut self.firework,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

#[derive(Debug, Clone)]
pub struct Arrow {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing, from velocity
    pub angle: f32,
    pub kind: ArrowKind,
    pub owner: Owner,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
    pub state: ArrowState,
    pub split_timer: u32,
    pub has_split: bool,
    pub fuse_timer: u32,
    pub has_exploded: bool,
    pub ember_timer: u32,
}

impl Arrow {
    pub fn new(pos: Vec2, vel: Vec2, kind: ArrowKind, owner: Owner) -> Self {
        Self {
            pos,
            vel,
            angle: vel.y.atan2(vel.x),
            kind,
            owner,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
            state: ArrowState::Flight,
            split_timer: 0,
            has_split: false,
            fuse_timer: 0,
            has_exploded: false,
            ember_timer: 0,
        }
    }

    #[inline]
    pub fn stats(&self) -> ArrowStats {
        self.kind.stats()
    }

    /// Whether the arrow stays in the world after this pass
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state != ArrowState::Spent
    }

    #[inline]
    pub fn is_stuck(&self) -> bool {
        matches!(self.state, ArrowState::Stuck(_))
    }

    /// Advance one tick. Spawned children go straight into `state.arrows`.
    pub fn update(&mut self, state: &mut GameState) {
        match self.state {
            ArrowState::Spent => return,
            ArrowState::Stuck(anchor) => self.follow_anchor(anchor, state),
            ArrowState::Resting => {}
            ArrowState::Flight => self.fly(state),
        }

        if !self.is_active() {
            return;
        }

        if self.kind == ArrowKind::Fire && !matches!(self.state, ArrowState::Resting) {
            self.emit_embers(state);
        }

        if self.kind == ArrowKind::Firework {
            self.fuse_timer += 1;
            if self.fuse_timer >= FIREWORK_FUSE_TICKS {
                self.explode(state);
            }
        }
    }

    fn follow_anchor(&mut self, anchor: StuckTo, state: &GameState) {
        let joint = state
            .ragdoll(anchor.ragdoll)
            .and_then(|r| r.joints.get(anchor.joint));
        match joint {
            Some(joint) => self.pos = joint.pos + anchor.offset,
            None => self.state = ArrowState::Spent,
        }
    }

    fn fly(&mut self, state: &mut GameState) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }

        let tuning = &state.tuning;
        self.vel.y += tuning.gravity;
        self.vel.x += state.wind * tuning.wind_strength * self.stats().wind_factor;
        self.pos += self.vel;
        self.angle = self.vel.y.atan2(self.vel.x);

        if self.kind == ArrowKind::Split && !self.has_split {
            self.split_timer += 1;
            if self.split_timer > SPLIT_DELAY_TICKS {
                self.split(state);
            }
        }

        self.check_ground(state);
        self.check_bounds(state);
        if self.state == ArrowState::Flight {
            self.check_hits(state);
        }
    }

    /// Spawn two diverging children once; children never split again
    fn split(&mut self, state: &mut GameState) {
        if self.has_split {
            return;
        }
        self.has_split = true;

        let speed = self.vel.length() * SPLIT_SPEED_FACTOR;
        for spread in [-SPLIT_SPREAD, SPLIT_SPREAD] {
            let vel = polar_to_cartesian(speed, self.angle + spread);
            let mut child = Arrow::new(self.pos, vel, ArrowKind::Split, self.owner);
            child.has_split = true;
            state.spawn_arrow(child);
        }

        log::debug!("Split arrow at ({:.0}, {:.0})", self.pos.x, self.pos.y);
        state.emit(GameEvent::ArrowSplit);
    }

    fn check_ground(&mut self, state: &GameState) {
        let ground_y = state.tuning.ground_y;
        if self.pos.y <= ground_y {
            return;
        }

        self.pos.y = ground_y;
        self.vel.y = -self.vel.y * ARROW_BOUNCE;
        self.vel.x *= ARROW_GROUND_FRICTION;

        if self.vel.y.abs() < ARROW_REST_SPEED {
            self.state = if self.kind == ArrowKind::Firework && !self.has_exploded {
                self.vel = Vec2::ZERO;
                ArrowState::Resting
            } else {
                ArrowState::Spent
            };
        }
    }

    fn check_bounds(&mut self, state: &GameState) {
        let tuning = &state.tuning;
        if self.pos.x < tuning.arrow_min_x
            || self.pos.x > tuning.arrow_max_x
            || self.pos.y > tuning.arrow_max_y
        {
            self.state = ArrowState::Spent;
        }
    }

    /// Opposing ragdolls still alive, in stable order
    fn targets<'a>(&self, state: &'a GameState) -> impl Iterator<Item = &'a Ragdoll> + use<'a> {
        let (player, enemies) = match self.owner {
            Owner::Player => (None, state.enemies.as_slice()),
            Owner::Enemy => (state.player.as_ref(), &[][..]),
        };
        player
            .into_iter()
            .chain(enemies.iter())
            .filter(|r| r.is_alive())
    }

    fn check_hits(&mut self, state: &mut GameState) {
        let hit = self
            .targets(state)
            .find_map(|r| r.joint_hit(self.pos, HIT_MARGIN).map(|j| (r.id, j)));
        if let Some((ragdoll, joint)) = hit {
            self.on_hit(ragdoll, joint, state);
        }
    }

    fn on_hit(&mut self, ragdoll: EntityId, joint: usize, state: &mut GameState) {
        let stats = self.stats();
        let force = self.vel * IMPACT_FORCE_FACTOR;

        if stats.contact_damage {
            let outcome = state.damage_ragdoll(ragdoll, stats.damage, self.pos, force);
            log::trace!(
                "{} arrow hit ragdoll {ragdoll} joint {joint}: {outcome:?}",
                self.kind.name()
            );
        }

        self.spawn_impact(state);
        state.emit(GameEvent::Sound(SoundCue::Hit));
        if self.kind == ArrowKind::Fire {
            state.emit(GameEvent::Sound(SoundCue::Fire));
        }

        // Offset is taken after the impulse so the arrow rides the displaced joint
        let Some(anchor) = state.ragdoll(ragdoll).and_then(|r| r.joints.get(joint)) else {
            self.state = ArrowState::Spent;
            return;
        };
        self.state = ArrowState::Stuck(StuckTo {
            ragdoll,
            joint,
            offset: self.pos - anchor.pos,
        });
        self.vel = Vec2::ZERO;
    }

    fn spawn_impact(&self, state: &mut GameState) {
        let color = self.stats().impact_color;
        for _ in 0..IMPACT_PARTICLES {
            let vel = Vec2::new(
                (state.rng.random::<f32>() - 0.5) * 6.0,
                (state.rng.random::<f32>() - 0.5) * 6.0,
            );
            let life = 30.0 + state.rng.random::<f32>() * 20.0;
            state
                .particles
                .spawn(Particle::new(self.pos, vel, color, life));
        }

        if self.kind == ArrowKind::Fire {
            for _ in 0..FIRE_PARTICLES {
                let rng = &mut state.rng;
                let pos = self.pos
                    + Vec2::new(
                        (rng.random::<f32>() - 0.5) * 15.0,
                        (rng.random::<f32>() - 0.5) * 15.0,
                    );
                let vel = Vec2::new((rng.random::<f32>() - 0.5) * 4.0, -rng.random::<f32>() * 3.0);
                let hue = (rng.random::<f32>() * 60.0) as u16;
                let life = 60.0 + rng.random::<f32>() * 40.0;
                state
                    .particles
                    .spawn(Particle::new(pos, vel, ParticleColor::Ember { hue }, life));
            }
        }
    }

    fn emit_embers(&mut self, state: &mut GameState) {
        self.ember_timer += 1;
        if self.ember_timer < EMBER_INTERVAL_TICKS {
            return;
        }
        self.ember_timer = 0;

        let rng = &mut state.rng;
        let pos = self.pos + Vec2::new((rng.random::<f32>() - 0.5) * 4.0, 0.0);
        let vel = Vec2::new((rng.random::<f32>() - 0.5) * 1.0, -rng.random::<f32>());
        let hue = (rng.random::<f32>() * 60.0) as u16;
        let life = 20.0 + rng.random::<f32>() * 10.0;
        state
            .particles
            .spawn(Particle::new(pos, vel, ParticleColor::Ember { hue }, life));
    }

    /// Detonate a firework. Returns false if it already went off.
    pub fn explode(&mut self, state: &mut GameState) -> bool {
        if self.has_exploded {
            return false;
        }
        self.has_exploded = true;

        for i in 0..EXPLOSION_RING_PARTICLES {
            let angle = TAU * i as f32 / EXPLOSION_RING_PARTICLES as f32;
            let vel = polar_to_cartesian(4.0, angle);
            let hue = (360 * i / EXPLOSION_RING_PARTICLES) as u16;
            let life = 40.0 + state.rng.random::<f32>() * 20.0;
            state
                .particles
                .spawn(Particle::new(self.pos, vel, ParticleColor::Burst { hue }, life));
        }

        let victims: Vec<(EntityId, Vec2)> = self
            .targets(state)
            .map(|r| (r.id, r.chest()))
            .filter(|(_, chest)| chest.distance(self.pos) < EXPLOSION_RADIUS)
            .collect();

        let mut kills = 0;
        for (id, chest) in victims {
            let offset = chest - self.pos;
            let dist = offset.length();
            let falloff = 1.0 - dist / EXPLOSION_RADIUS;
            let dir = offset.normalize_or_zero();
            let knockback = dir * EXPLOSION_KNOCKBACK * falloff;
            if state.damage_ragdoll(id, EXPLOSION_DAMAGE * falloff, chest, knockback)
                == DamageOutcome::Killed
            {
                kills += 1;
            }
        }

        log::debug!(
            "Firework exploded at ({:.0}, {:.0}), {kills} kills",
            self.pos.x,
            self.pos.y
        );
        state.emit(GameEvent::FireworkExploded { pos: self.pos });
        state.emit(GameEvent::Sound(SoundCue::Fire));
        self.state = ArrowState::Spent;
        true
    }
}
