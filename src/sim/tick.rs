//! Fixed timestep simulation tick
//!
//! Advances the world one frame in a fixed order: input, charge, player,
//! enemies, arrows, particles, wind, platforms, waves.

use glam::Vec2;

use super::arrow::ArrowKind;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position (aim target)
    pub pointer: Option<Vec2>,
    /// Start drawing the bow
    pub begin_charge: bool,
    /// Release the drawn arrow
    pub release: bool,
    /// Switch arrow type (ignored when out of ammo)
    pub select_arrow: Option<ArrowKind>,
    /// Start a fresh game
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        let seed = state.seed.wrapping_add(1);
        state.restart(seed);
        return;
    }

    apply_input(state, input);
    state.time_ticks += 1;

    // Draw strength builds while the button is held
    if state.is_charging && state.player_alive() {
        state.charge_power =
            (state.charge_power + state.tuning.charge_rate).min(state.tuning.max_power);
    }

    update_player(state);
    update_enemies(state);
    update_arrows(state);
    state.particles.update();
    state.update_wind();
    update_platforms(state);
    update_waves(state);
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if let Some(pointer) = input.pointer {
        state.mouse_pos = pointer;
    }

    if state.game_over {
        return;
    }

    if let Some(kind) = input.select_arrow {
        state.select_arrow_type(kind);
    }
    if input.begin_charge {
        state.begin_charge();
    }
    if input.release && state.is_charging {
        state.release_shot();
    }
}

fn update_player(state: &mut GameState) {
    let Some(mut player) = state.player.take() else {
        return;
    };
    if player.update(state) {
        state.player = Some(player);
    } else {
        log::debug!("Player body removed");
    }
}

fn update_enemies(state: &mut GameState) {
    let mut enemies = std::mem::take(&mut state.enemies);
    enemies.retain_mut(|enemy| enemy.update(state));
    state.enemies = enemies;
}

/// Update every arrow, keep children spawned during the pass, drop spent ones
pub fn update_arrows(state: &mut GameState) {
    let mut arrows = std::mem::take(&mut state.arrows);
    for arrow in arrows.iter_mut() {
        arrow.update(state);
    }
    arrows.append(&mut state.arrows);
    arrows.retain(|a| a.is_active());
    state.arrows = arrows;
}

fn update_platforms(state: &mut GameState) {
    let mut collapsed = Vec::new();
    for (index, platform) in state.platforms.iter_mut().enumerate() {
        if platform.update() {
            collapsed.push(index);
        }
    }
    for index in collapsed {
        log::debug!("Platform {index} collapsed");
        state.emit(GameEvent::PlatformCollapsed { index });
    }
}

fn update_waves(state: &mut GameState) {
    if let Some(remaining) = state.wave_respawn {
        if remaining <= 1 {
            state.wave_respawn = None;
            if state.game_over {
                log::info!("Wave {} cancelled by game over", state.wave_number);
            } else {
                state.spawn_enemies();
            }
        } else {
            state.wave_respawn = Some(remaining - 1);
        }
        return;
    }

    if state.game_over || state.enemies.iter().any(|e| e.is_alive()) {
        return;
    }

    let cleared = state.wave_number;
    state.wave_number += 1;
    state.wave_respawn = Some(WAVE_RESPAWN_TICKS);
    log::info!("Wave {cleared} cleared, next wave in {WAVE_RESPAWN_TICKS} ticks");
    state.emit(GameEvent::WaveCleared { wave: cleared });
}
