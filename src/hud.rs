//! Read-only HUD snapshot for an external UI layer

use serde::Serialize;

use crate::sim::{Ammo, ArrowKind, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    /// Player health in [0, 1] (0 once the body is gone)
    pub health: f32,
    /// Bow draw in [0, 1]
    pub charge: f32,
    pub ammo: Ammo,
    pub selected_arrow: ArrowKind,
    /// Wind in [-1, 1]; positive blows right
    pub wind: f32,
    pub wave: u32,
    pub enemies_alive: usize,
    pub enemies_killed: u32,
    pub game_over: bool,
    /// Set once the game is over
    pub final_score: Option<u64>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let health = state
            .player
            .as_ref()
            .map_or(0.0, |p| p.health_fraction());
        let charge = if state.tuning.max_power > 0.0 {
            (state.charge_power / state.tuning.max_power).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            score: state.score,
            health,
            charge,
            ammo: state.ammo.clone(),
            selected_arrow: state.selected_arrow,
            wind: state.wind,
            wave: state.wave_number,
            enemies_alive: state.living_enemies(),
            enemies_killed: state.enemies_killed,
            game_over: state.game_over,
            final_score: state.game_over.then_some(state.score),
        }
    }

    /// Wind gauge text, e.g. "→ 0.4"
    pub fn wind_label(&self) -> String {
        let arrow = if self.wind >= 0.0 { '→' } else { '←' };
        format!("{arrow} {:.1}", self.wind.abs())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
