//! Data-driven physics tuning
//!
//! Gravity, wind, charge, arrow speed, joint stiffness/damping and the
//! playfield geometry have historically been retuned together, so they live
//! in one struct that is fixed when a [`GameState`](crate::sim::GameState)
//! is created.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning set
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
    #[error("solver_iterations must be at least 1")]
    NoSolverIterations,
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The tunable physics set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration per step (joints and arrows)
    pub gravity: f32,
    /// Horizontal acceleration per unit of wind
    pub wind_strength: f32,
    /// Charge power cap
    pub max_power: f32,
    /// Charge gained per tick while drawing
    pub charge_rate: f32,
    /// Minimum charge for a release to fire
    pub min_shot_power: f32,
    /// Launch speed per unit of charge
    pub arrow_speed_multiplier: f32,
    /// Fraction of a stick's length error corrected per relaxation step
    pub joint_stiffness: f32,
    /// Verlet velocity retention per step
    pub joint_damping: f32,
    /// Solver passes (joints + sticks) per tick
    pub solver_iterations: u32,
    /// Ground height (y grows downward)
    pub ground_y: f32,
    /// Playfield width; joints are walled to [0, world_width]
    pub world_width: f32,
    /// Arrows left of this x are spent
    pub arrow_min_x: f32,
    /// Arrows right of this x are spent
    pub arrow_max_x: f32,
    /// Arrows below this y are spent
    pub arrow_max_y: f32,
    /// Cap on live particles
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            wind_strength: 0.02,
            max_power: 60.0,
            charge_rate: 1.2,
            min_shot_power: 3.0,
            arrow_speed_multiplier: 0.15,
            joint_stiffness: 0.8,
            joint_damping: 0.95,
            solver_iterations: 4,
            ground_y: 330.0,
            world_width: 600.0,
            arrow_min_x: -50.0,
            arrow_max_x: 750.0,
            arrow_max_y: 500.0,
            max_particles: 600,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning set; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> String {
        // A plain struct of numbers always serializes
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values the solver cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.joint_stiffness > 0.0 && self.joint_stiffness <= 1.0) {
            return Err(TuningError::OutOfRange {
                field: "joint_stiffness",
                value: self.joint_stiffness,
            });
        }
        if !(self.joint_damping > 0.0 && self.joint_damping <= 1.0) {
            return Err(TuningError::OutOfRange {
                field: "joint_damping",
                value: self.joint_damping,
            });
        }
        if self.solver_iterations == 0 {
            return Err(TuningError::NoSolverIterations);
        }
        if self.world_width <= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "world_width",
                value: self.world_width,
            });
        }
        if self.max_power <= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "max_power",
                value: self.max_power,
            });
        }
        if self.min_shot_power > self.max_power {
            return Err(TuningError::OutOfRange {
                field: "min_shot_power",
                value: self.min_shot_power,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.08, "max_power": 50.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.08);
        assert_eq!(tuning.max_power, 50.0);
        assert_eq!(tuning.ground_y, Tuning::default().ground_y);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning {
            joint_stiffness: 0.5,
            ..Default::default()
        };
        let back = Tuning::from_json(&tuning.to_json()).unwrap();
        assert_eq!(back, tuning);
    }

    #[test]
    fn test_rejects_bad_stiffness() {
        let err = Tuning::from_json(r#"{ "joint_stiffness": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "joint_stiffness",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let err = Tuning::from_json(r#"{ "solver_iterations": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::NoSolverIterations));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
