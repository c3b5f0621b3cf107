//! Ball state and the fixed-step flight integrator.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aerodynamics::AeroModel;
use crate::constants::{
    mph_to_mps, rad_s_to_rpm, rpm_to_rad_s, GRAVITY_FPS2, MIN_AERO_SPEED_FPS, MPS_TO_FPS, M_TO_YD,
};
use crate::shot::ShotInput;
use crate::spin_decay::{update_spin_rate, SpinDecayParameters};

/// Where the ball is in its flight-bounce-roll lifecycle.
///
/// Transitions only move forward: FLIGHT, BOUNCING, ROLLING, STOPPED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Flight,
    Bouncing,
    Rolling,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Flight => "FLIGHT",
            Phase::Bouncing => "BOUNCING",
            Phase::Rolling => "ROLLING",
            Phase::Stopped => "STOPPED",
        };
        f.write_str(name)
    }
}

/// Mutable state of one simulated ball.
///
/// Positions are meters with x lateral (right positive), y up and z
/// downrange; velocities are m/s.
#[derive(Debug, Clone, PartialEq)]
pub struct BallState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub spin_rad_s: f64,
    /// Fixed for the whole shot; only the spin magnitude decays
    pub spin_axis_rad: f64,
    /// Horizontal distance at first ground contact, set exactly once
    carry_yards: Option<f64>,
    pub phase: Phase,
}

impl BallState {
    /// Ball leaving the clubface at `launch_height_m` above the ground plane
    pub fn launch(shot: &ShotInput, launch_height_m: f64) -> Self {
        let speed = mph_to_mps(shot.ball_speed_mph);
        let vla = shot.vla_deg.to_radians();
        let hla = shot.hla_deg.to_radians();

        Self {
            position: Vector3::new(0.0, launch_height_m, 0.0),
            velocity: Vector3::new(
                speed * hla.sin() * vla.cos(),
                speed * vla.sin(),
                speed * hla.cos() * vla.cos(),
            ),
            spin_rad_s: rpm_to_rad_s(shot.total_spin_rpm()),
            spin_axis_rad: shot.spin_axis_deg().to_radians(),
            carry_yards: None,
            phase: Phase::Flight,
        }
    }

    pub fn has_landed(&self) -> bool {
        self.carry_yards.is_some()
    }

    pub fn carry_yards(&self) -> Option<f64> {
        self.carry_yards
    }

    /// Freeze the carry at the current horizontal distance; later calls are no-ops
    pub fn record_landing(&mut self) -> bool {
        if self.carry_yards.is_some() {
            return false;
        }
        self.carry_yards = Some(self.horizontal_distance_yards());
        true
    }

    pub fn horizontal_distance_m(&self) -> f64 {
        self.position.x.hypot(self.position.z)
    }

    pub fn horizontal_distance_yards(&self) -> f64 {
        self.horizontal_distance_m() * M_TO_YD
    }

    pub fn horizontal_speed_mps(&self) -> f64 {
        self.velocity.x.hypot(self.velocity.z)
    }

    pub fn speed_mps(&self) -> f64 {
        self.velocity.norm()
    }

    pub fn spin_rpm(&self) -> f64 {
        rad_s_to_rpm(self.spin_rad_s)
    }

    /// Too slow for the force model to be meaningful
    pub fn is_at_rest(&self) -> bool {
        self.speed_mps() * MPS_TO_FPS < MIN_AERO_SPEED_FPS
    }
}

/// Explicit Euler integrator for drag, Magnus lift and gravity.
#[derive(Debug, Clone, Copy)]
pub struct FlightIntegrator {
    pub aero: AeroModel,
    pub spin_decay: SpinDecayParameters,
    pub time_step_s: f64,
}

impl FlightIntegrator {
    pub fn new(aero: AeroModel, time_step_s: f64) -> Self {
        Self {
            aero,
            spin_decay: SpinDecayParameters::default(),
            time_step_s,
        }
    }

    /// Total acceleration (m/s²) for the given state
    pub fn acceleration(&self, state: &BallState) -> Vector3<f64> {
        let velocity_fps = state.velocity * MPS_TO_FPS;
        let mut accel_fps2 = self
            .aero
            .acceleration_fps2(&velocity_fps, state.spin_rad_s, state.spin_axis_rad);
        accel_fps2.y -= GRAVITY_FPS2;
        accel_fps2 / MPS_TO_FPS
    }

    /// Advance velocity, spin and position by one timestep.
    ///
    /// Velocity is updated before position; ground contact is resolved by the
    /// caller afterwards.
    pub fn step(&self, state: &mut BallState) {
        let dt = self.time_step_s;
        let accel = self.acceleration(state);
        state.velocity += accel * dt;
        state.spin_rad_s = update_spin_rate(state.spin_rad_s, dt, &self.spin_decay);
        state.position += state.velocity * dt;
    }
}
