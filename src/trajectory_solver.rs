//! Shot orchestration: classify once, then integrate flight and ground
//! contact until the ball stops or the time budget runs out.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use crate::aerodynamics::AeroModel;
use crate::atmosphere::AtmosphericConditions;
use crate::constants::{DEFAULT_LAUNCH_HEIGHT_M, DEFAULT_MAX_TIME_S, DEFAULT_TIME_STEP_S, M_TO_YD};
use crate::empirical::FlightModel;
use crate::error::{FlightError, Result};
use crate::flight::{BallState, FlightIntegrator, Phase};
use crate::ground::{GroundEvent, GroundModel};
use crate::regime::PhysicsRegime;
use crate::shot::ShotInput;
use crate::trajectory_sampling::{TrajectoryRecorder, TrajectorySample};

/// Numerical and environmental settings for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub time_step_s: f64,
    /// Simulated-time budget before the run is reported as timed out
    pub max_time_s: f64,
    /// Height of the ball centre at launch (m)
    pub launch_height_m: f64,
    pub atmosphere: AtmosphericConditions,
    pub flight_model: FlightModel,
    /// Trajectory sampling interval; `None` records no samples
    pub sample_interval_s: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step_s: DEFAULT_TIME_STEP_S,
            max_time_s: DEFAULT_MAX_TIME_S,
            launch_height_m: DEFAULT_LAUNCH_HEIGHT_M,
            atmosphere: AtmosphericConditions::default(),
            flight_model: FlightModel::Physics,
            sample_interval_s: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.time_step_s.is_finite() || self.time_step_s <= 0.0 {
            return Err(FlightError::InvalidConfig(format!(
                "time_step_s must be positive, got {}",
                self.time_step_s
            )));
        }
        if !self.max_time_s.is_finite() || self.max_time_s <= 0.0 {
            return Err(FlightError::InvalidConfig(format!(
                "max_time_s must be positive, got {}",
                self.max_time_s
            )));
        }
        if self.time_step_s > self.max_time_s {
            return Err(FlightError::InvalidConfig(format!(
                "time_step_s {} exceeds max_time_s {}",
                self.time_step_s, self.max_time_s
            )));
        }
        if !self.launch_height_m.is_finite() || self.launch_height_m < 0.0 {
            return Err(FlightError::InvalidConfig(format!(
                "launch_height_m must be non-negative, got {}",
                self.launch_height_m
            )));
        }
        if let Some(interval) = self.sample_interval_s {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(FlightError::InvalidConfig(format!(
                    "sample_interval_s must be positive, got {interval}"
                )));
            }
        }
        self.atmosphere.validate()
    }

    /// Load and validate a JSON config; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: SimulationConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    /// The ball came to rest
    Completed,
    /// The time budget ran out; distances are the best known so far
    TimedOut,
}

/// Distances and diagnostics for one simulated shot.
///
/// `roll_yards` is always `total_yards - carry_yards` and never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotResult {
    pub regime: PhysicsRegime,
    pub carry_yards: f64,
    pub roll_yards: f64,
    pub total_yards: f64,
    /// Final lateral offset, positive right of target
    pub lateral_yards: f64,
    pub apex_m: f64,
    /// Time of first ground contact, or the whole run if the ball never landed
    pub flight_time_s: f64,
    /// Simulated time until the ball stopped or the budget ran out
    pub elapsed_s: f64,
    pub bounce_count: u32,
    pub final_spin_rpm: f64,
    pub final_phase: Phase,
    pub status: SimulationStatus,
    pub model: FlightModel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<TrajectorySample>,
}

impl ShotResult {
    pub fn is_completed(&self) -> bool {
        self.status == SimulationStatus::Completed
    }

    /// Promote a timed-out result to a `SimulationTimeout` error
    pub fn into_completed(self) -> Result<Self> {
        match self.status {
            SimulationStatus::Completed => Ok(self),
            SimulationStatus::TimedOut => Err(FlightError::SimulationTimeout {
                elapsed_s: self.elapsed_s,
                best_carry_yards: self.carry_yards,
                best_total_yards: self.total_yards,
            }),
        }
    }
}

/// Simulates one shot from launch to rest.
#[derive(Debug, Clone)]
pub struct TrajectorySolver {
    shot: ShotInput,
    config: SimulationConfig,
    regime: PhysicsRegime,
}

impl TrajectorySolver {
    /// Validate the inputs and classify the shot
    pub fn new(shot: ShotInput, config: SimulationConfig) -> Result<Self> {
        shot.validate()?;
        config.validate()?;
        let regime = PhysicsRegime::classify(shot.ball_speed_mph, shot.vla_deg);
        debug!(
            regime = %regime,
            speed_mph = shot.ball_speed_mph,
            vla_deg = shot.vla_deg,
            "classified shot"
        );
        Ok(Self {
            shot,
            config,
            regime,
        })
    }

    pub fn regime(&self) -> PhysicsRegime {
        self.regime
    }

    pub fn shot(&self) -> &ShotInput {
        &self.shot
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn set_time_step(&mut self, step: f64) -> Result<()> {
        let config = SimulationConfig {
            time_step_s: step,
            ..self.config
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_max_time(&mut self, max_time_s: f64) -> Result<()> {
        let config = SimulationConfig {
            max_time_s,
            ..self.config
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn solve(&self) -> Result<ShotResult> {
        self.run(None)
    }

    /// Solve, checking `cancel` between timesteps
    pub fn solve_with_cancel(&self, cancel: &AtomicBool) -> Result<ShotResult> {
        self.run(Some(cancel))
    }

    fn run(&self, cancel: Option<&AtomicBool>) -> Result<ShotResult> {
        let dt = self.config.time_step_s;
        let aero = AeroModel::new(
            self.regime,
            self.shot.ball_speed_mph,
            self.shot.vla_deg,
            self.config.atmosphere.drag_constant(),
        );
        let integrator = FlightIntegrator::new(aero, dt);
        let ground = GroundModel::new(self.regime, dt);

        let mut state = BallState::launch(&self.shot, self.config.launch_height_m);
        let mut recorder = TrajectoryRecorder::new(self.config.sample_interval_s);
        recorder.record_launch(&state);

        let mut time = 0.0;
        let mut apex_m = state.position.y;
        let mut flight_time_s = None;
        let mut bounce_count = 0u32;

        while state.phase != Phase::Stopped && time < self.config.max_time_s {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(FlightError::Cancelled { elapsed_s: time });
                }
            }
            if state.is_at_rest() {
                state.phase = Phase::Stopped;
                break;
            }

            integrator.step(&mut state);
            apex_m = apex_m.max(state.position.y);

            let was_landed = state.has_landed();
            if let Some(GroundEvent::Bounce { .. }) = ground.resolve_contact(&mut state) {
                bounce_count += 1;
            }
            time += dt;

            let landed_now = !was_landed && state.has_landed();
            if landed_now {
                flight_time_s = Some(time);
            }
            recorder.observe(time, &state, landed_now);
        }

        let status = if state.phase == Phase::Stopped {
            SimulationStatus::Completed
        } else {
            SimulationStatus::TimedOut
        };

        let final_distance = state.horizontal_distance_yards();
        let carry_yards = state.carry_yards().unwrap_or(final_distance);
        let mut total_yards = final_distance;
        if let Some(empirical) = self.config.flight_model.empirical_total_yards(&self.shot) {
            debug!(physics_total = total_yards, empirical, "empirical total override");
            total_yards = empirical;
        }
        let total_yards = total_yards.max(carry_yards);

        if status == SimulationStatus::TimedOut {
            warn!(
                elapsed_s = time,
                phase = %state.phase,
                carry_yards,
                total_yards,
                "simulation hit the time budget before the ball stopped"
            );
        }

        let samples = recorder.finish(time, &state);
        Ok(ShotResult {
            regime: self.regime,
            carry_yards,
            roll_yards: total_yards - carry_yards,
            total_yards,
            lateral_yards: state.position.x * M_TO_YD,
            apex_m,
            flight_time_s: flight_time_s.unwrap_or(time),
            elapsed_s: time,
            bounce_count,
            final_spin_rpm: state.spin_rpm(),
            final_phase: state.phase,
            status,
            model: self.config.flight_model,
            samples,
        })
    }
}

/// Simulate one shot with the default configuration
pub fn simulate(shot: &ShotInput) -> Result<ShotResult> {
    TrajectorySolver::new(*shot, SimulationConfig::default())?.solve()
}

/// Simulate independent shots in parallel, preserving input order
pub fn simulate_batch(shots: &[ShotInput], config: &SimulationConfig) -> Vec<Result<ShotResult>> {
    shots
        .par_iter()
        .map(|shot| TrajectorySolver::new(*shot, *config)?.solve())
        .collect()
}
