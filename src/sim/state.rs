//! World state and core simulation types
//!
//! Everything one tick reads or mutates lives here. Ragdolls are addressed by
//! entity id; nothing holds a reference into another entity.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arrow::{Ammo, Arrow, ArrowKind};
use super::particle::ParticleSystem;
use super::platform::Platform;
use super::ragdoll::{DamageOutcome, Ragdoll};
use crate::consts::*;
use crate::tuning::Tuning;

/// Stable handle for ragdolls
pub type EntityId = u32;

/// Named audio cues, resolved to tones by the audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    BowDraw,
    ArrowRelease,
    Hit,
    Fire,
    Death,
}

/// Things that happened during a tick, drained by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    EnemyKilled { id: EntityId },
    PlayerKilled,
    ArrowSplit,
    FireworkExploded { pos: Vec2 },
    PlatformCollapsed { index: usize },
    WaveCleared { wave: u32 },
    WaveSpawned { wave: u32, enemies: usize },
    GameOver { final_score: u64 },
}

/// Player tower plus four collapsible enemy perches,
/// as (x, height above ground, width, collapsible)
const PLATFORM_LAYOUT: [(f32, f32, f32, bool); 5] = [
    (30.0, 120.0, 100.0, false),
    (200.0, 60.0, 80.0, true),
    (320.0, 90.0, 70.0, true),
    (450.0, 50.0, 80.0, true),
    (550.0, 80.0, 70.0, true),
];

/// Enemy spawn points as (x, origin height above ground, platform index)
const ENEMY_SPAWNS: [(f32, f32, usize); MAX_WAVE_ENEMIES] = [
    (240.0, 120.0, 1),
    (355.0, 150.0, 2),
    (490.0, 110.0, 3),
    (585.0, 140.0, 4),
];

/// Player spawn x (on the tower)
const PLAYER_SPAWN_X: f32 = 80.0;
/// Player origin sits this far above the tower top so the feet rest on it
const PLAYER_STANDING_HEIGHT: f32 = 56.0;

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Physics tunables (immutable for the run)
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Option<Ragdoll>,
    /// Enemies, including corpses still inside the death window
    pub enemies: Vec<Ragdoll>,
    pub arrows: Vec<Arrow>,
    pub particles: ParticleSystem,
    pub platforms: Vec<Platform>,
    /// Current wind in [-1, 1]
    pub wind: f32,
    /// Last pointer position (aim target)
    pub mouse_pos: Vec2,
    pub is_charging: bool,
    pub charge_power: f32,
    pub selected_arrow: ArrowKind,
    pub ammo: Ammo,
    pub score: u64,
    pub enemies_killed: u32,
    pub game_over: bool,
    pub wave_number: u32,
    /// Ticks until the next wave spawns
    pub wave_respawn: Option<u32>,
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    /// Create a new game with the given seed and spawn the first wave
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let wind = rng.random::<f32>() * 2.0 - 1.0;
        let particles = ParticleSystem::new(tuning.max_particles);
        let platforms = default_platforms(tuning.ground_y);

        let mut state = Self {
            tuning,
            seed,
            rng,
            time_ticks: 0,
            player: None,
            enemies: Vec::new(),
            arrows: Vec::new(),
            particles,
            platforms,
            wind,
            mouse_pos: Vec2::ZERO,
            is_charging: false,
            charge_power: 0.0,
            selected_arrow: ArrowKind::Regular,
            ammo: Ammo::default(),
            score: 0,
            enemies_killed: 0,
            game_over: false,
            wave_number: 1,
            wave_respawn: None,
            events: Vec::new(),
            next_id: 1,
        };

        let id = state.next_entity_id();
        let tower_top = state.platforms[0].y;
        let origin = Vec2::new(PLAYER_SPAWN_X, tower_top - PLAYER_STANDING_HEIGHT);
        state.player = Some(Ragdoll::player(id, origin, state.tuning.ground_y));
        state.mouse_pos = origin + Vec2::new(200.0, 0.0);

        state.spawn_enemies();
        state
    }

    /// Start over with a fresh world, keeping the tuning
    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting (seed {seed}, previous score {})", self.score);
        let tuning = self.tuning.clone();
        *self = Self::new(seed, tuning);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player_alive(&self) -> bool {
        self.player.as_ref().is_some_and(Ragdoll::is_alive)
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    pub fn ragdoll(&self, id: EntityId) -> Option<&Ragdoll> {
        self.player
            .iter()
            .chain(self.enemies.iter())
            .find(|r| r.id == id)
    }

    pub fn ragdoll_mut(&mut self, id: EntityId) -> Option<&mut Ragdoll> {
        self.player
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|r| r.id == id)
    }

    /// Damage a ragdoll by id and settle scoring if the hit was lethal.
    ///
    /// This is the only place kills are scored, so a ragdoll is counted once
    /// no matter how many arrows or explosions reach it.
    pub fn damage_ragdoll(
        &mut self,
        id: EntityId,
        amount: f32,
        impact: Vec2,
        force: Vec2,
    ) -> DamageOutcome {
        let Self {
            player,
            enemies,
            rng,
            particles,
            platforms,
            ..
        } = self;
        let Some(target) = player
            .iter_mut()
            .chain(enemies.iter_mut())
            .find(|r| r.id == id)
        else {
            return DamageOutcome::AlreadyDead;
        };

        let outcome = target.take_damage(amount, impact, force, rng, particles);
        if outcome != DamageOutcome::Killed {
            return outcome;
        }

        let is_player = target.is_player();
        // Only a perch the body still stands on gives way
        let perch = target
            .standing_platform()
            .filter(|&i| platforms.get(i).is_some_and(|p| target.stands_on(p)));
        self.emit(GameEvent::Sound(SoundCue::Death));

        if is_player {
            self.game_over = true;
            self.is_charging = false;
            self.charge_power = 0.0;
            self.emit(GameEvent::PlayerKilled);
            self.emit(GameEvent::GameOver {
                final_score: self.score,
            });
            log::info!(
                "Game over at wave {} with score {}",
                self.wave_number,
                self.score
            );
        } else if self.game_over {
            // The final score is frozen once the game has ended
            log::debug!("Enemy {id} killed after game over, not scored");
        } else {
            self.score += KILL_BONUS;
            self.enemies_killed += 1;
            self.emit(GameEvent::EnemyKilled { id });
            log::debug!("Enemy {id} killed, score {}", self.score);

            if let Some(platform) = perch.and_then(|i| self.platforms.get_mut(i)) {
                platform.start_collapse();
            }
        }

        outcome
    }

    /// Change the selected arrow type; rejected when that type has no ammo
    pub fn select_arrow_type(&mut self, kind: ArrowKind) -> bool {
        if !self.ammo.has(kind) {
            return false;
        }
        self.selected_arrow = kind;
        true
    }

    /// Start drawing the bow (no-op when the player can't act)
    pub fn begin_charge(&mut self) -> bool {
        if self.game_over || !self.player_alive() || self.is_charging {
            return false;
        }
        self.is_charging = true;
        self.charge_power = 0.0;
        self.emit(GameEvent::Sound(SoundCue::BowDraw));
        true
    }

    /// Fire the player's drawn arrow. Charging stops either way.
    pub fn release_shot(&mut self) -> bool {
        let fired = match self.player.take() {
            Some(player) => {
                let fired = player.shoot(self);
                self.player = Some(player);
                fired
            }
            None => false,
        };
        self.is_charging = false;
        self.charge_power = 0.0;
        fired
    }

    /// Replace the enemy list with a fresh wave sized by the wave number
    pub fn spawn_enemies(&mut self) {
        for platform in self.platforms.iter_mut() {
            platform.reset();
        }

        let count = enemy_count(self.wave_number);
        let ground_y = self.tuning.ground_y;
        let mut enemies = Vec::with_capacity(count);
        for &(x, height, platform) in ENEMY_SPAWNS.iter().take(count) {
            let id = self.next_entity_id();
            let origin = Vec2::new(x, ground_y - height);
            enemies.push(Ragdoll::enemy(
                id,
                origin,
                Some(platform),
                &mut self.rng,
                ground_y,
            ));
        }
        self.enemies = enemies;

        log::info!("Wave {} spawned with {count} enemies", self.wave_number);
        self.emit(GameEvent::WaveSpawned {
            wave: self.wave_number,
            enemies: count,
        });
    }

    /// Occasionally nudge the wind, keeping it within [-1, 1]
    pub fn update_wind(&mut self) {
        if self.rng.random::<f32>() < WIND_CHANGE_CHANCE {
            let nudge = (self.rng.random::<f32>() - 0.5) * WIND_NUDGE;
            self.wind = (self.wind + nudge).clamp(-1.0, 1.0);
        }
    }

    /// Spawn an arrow into the world
    pub fn spawn_arrow(&mut self, arrow: Arrow) {
        self.arrows.push(arrow);
    }
}

/// Enemies per wave: two, plus one every other wave, up to four
pub fn enemy_count(wave: u32) -> usize {
    (2 + wave as usize / 2).min(MAX_WAVE_ENEMIES)
}

fn default_platforms(ground_y: f32) -> Vec<Platform> {
    PLATFORM_LAYOUT
        .iter()
        .map(|&(x, height, width, collapsible)| {
            Platform::new(x, ground_y - height, width, height, collapsible)
        })
        .collect()
}
