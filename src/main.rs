//! Ragdoll Archery headless runner
//!
//! Runs the simulation with a scripted archer and logs what happens.
//!
//! Usage: `ragdoll-archery [seed] [ticks] [tuning.json]`

use std::process::ExitCode;

use glam::Vec2;

use ragdoll_archery::audio::{AudioManager, LogAudioSink};
use ragdoll_archery::consts::TICKS_PER_SECOND;
use ragdoll_archery::sim::{ArrowKind, GameEvent, GameState, TickInput, tick};
use ragdoll_archery::{HudSnapshot, Tuning, TuningError};

/// Default run length: two minutes of game time
const DEFAULT_TICKS: u64 = 120 * TICKS_PER_SECOND as u64;

/// Scripted archer: aims a lob at the nearest living enemy and fires on a rhythm
struct Autopilot {
    /// Ticks the bow is held before release
    draw_ticks: u32,
    /// Ticks to wait between shots
    rest_ticks: u32,
    timer: u32,
    drawing: bool,
    shots: u32,
}

impl Autopilot {
    fn new() -> Self {
        Self {
            draw_ticks: 35,
            rest_ticks: 25,
            timer: 0,
            drawing: false,
            shots: 0,
        }
    }

    fn input(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        if state.game_over {
            return input;
        }
        let Some(player) = state.player.as_ref() else {
            return input;
        };
        let Some(target) = state
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .min_by(|a, b| {
                let da = a.chest().distance_squared(player.chest());
                let db = b.chest().distance_squared(player.chest());
                da.total_cmp(&db)
            })
        else {
            return input;
        };

        // Aim above the target to account for the drop
        let dist = target.chest().distance(player.chest());
        input.pointer = Some(target.chest() - Vec2::new(0.0, dist * 0.35));

        self.timer += 1;
        if self.drawing {
            if self.timer >= self.draw_ticks {
                input.release = true;
                self.drawing = false;
                self.timer = 0;
                self.shots += 1;
            }
        } else if self.timer >= self.rest_ticks {
            input.select_arrow = Some(self.pick_arrow(state));
            input.begin_charge = true;
            self.drawing = true;
            self.timer = 0;
        }
        input
    }

    /// Mostly regular arrows, with a special one every fourth shot while stocks last
    fn pick_arrow(&self, state: &GameState) -> ArrowKind {
        if self.shots % 4 != 3 {
            return ArrowKind::Regular;
        }
        let special = ArrowKind::ALL[1 + (self.shots / 4) as usize % 4];
        if state.ammo.has(special) {
            special
        } else {
            ArrowKind::Regular
        }
    }
}

fn load_tuning(path: Option<&str>) -> Result<Tuning, TuningError> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| TuningError::Io {
        path: path.to_string(),
        source: e,
    })?;
    Tuning::from_json(&json)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    let ticks = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TICKS);

    let tuning = match load_tuning(args.get(3).map(String::as_str)) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("Invalid tuning: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("Ragdoll Archery starting (seed {seed}, {ticks} ticks)");
    let mut state = GameState::new(seed, tuning);
    let mut audio = AudioManager::new(LogAudioSink::default());
    let mut pilot = Autopilot::new();

    for _ in 0..ticks {
        let input = pilot.input(&state);
        tick(&mut state, &input);

        let events = state.drain_events();
        audio.play_events(events.iter());
        for event in events.iter() {
            match event {
                GameEvent::WaveCleared { wave } => log::info!("Cleared wave {wave}"),
                GameEvent::GameOver { final_score } => {
                    log::info!("Final score: {final_score}");
                }
                _ => {}
            }
        }

        if state.time_ticks % TICKS_PER_SECOND as u64 == 0 {
            log::info!("HUD {}", HudSnapshot::capture(&state).to_json());
        }
        if state.game_over && state.arrows.is_empty() {
            break;
        }
    }

    log::info!(
        "Finished after {} ticks: score {}, {} kills, wave {}, {} shots, {} sounds",
        state.time_ticks,
        state.score,
        state.enemies_killed,
        state.wave_number,
        pilot.shots,
        audio.sink().played()
    );
    ExitCode::SUCCESS
}
