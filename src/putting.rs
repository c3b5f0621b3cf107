//! Putts rolled on a green of known Stimpmeter speed.

use serde::{Deserialize, Serialize};

use crate::constants::{mph_to_mps, FT_TO_M, GRAVITY_MPS2, M_TO_YD};
use crate::error::{FlightError, Result};

/// Speed of the ball leaving the Stimpmeter ramp (m/s)
pub const STIMP_RELEASE_SPEED_MPS: f64 = 1.83;

/// Below this speed a putt has stopped (m/s)
pub const PUTT_STOP_SPEED_MPS: f64 = 0.001;

pub const MIN_STIMP_FT: f64 = 4.0;
pub const MAX_STIMP_FT: f64 = 16.0;

/// Green friction that rolls a Stimpmeter ball exactly `stimp_ft` feet
pub fn friction_from_stimp(stimp_ft: f64) -> f64 {
    let distance_m = stimp_ft * FT_TO_M;
    STIMP_RELEASE_SPEED_MPS * STIMP_RELEASE_SPEED_MPS / (2.0 * GRAVITY_MPS2 * distance_m)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuttResult {
    pub distance_ft: f64,
    pub distance_yards: f64,
    /// Offset right of the target line (ft)
    pub lateral_ft: f64,
    pub time_s: f64,
    pub friction: f64,
}

/// Constant-friction roll on a flat green.
#[derive(Debug, Clone, Copy)]
pub struct PuttSolver {
    stimp_ft: f64,
    friction: f64,
    time_step_s: f64,
    max_time_s: f64,
}

impl PuttSolver {
    pub fn new(stimp_ft: f64) -> Result<Self> {
        if !stimp_ft.is_finite() || !(MIN_STIMP_FT..=MAX_STIMP_FT).contains(&stimp_ft) {
            return Err(FlightError::invalid_input(
                "stimp",
                format!("must be within {MIN_STIMP_FT}..={MAX_STIMP_FT} ft, got {stimp_ft}"),
            ));
        }
        Ok(Self {
            stimp_ft,
            friction: friction_from_stimp(stimp_ft),
            time_step_s: crate::constants::DEFAULT_TIME_STEP_S,
            max_time_s: 60.0,
        })
    }

    pub fn stimp_ft(&self) -> f64 {
        self.stimp_ft
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// Closed-form roll-out distance for a putt struck at `ball_speed_mph`
    pub fn expected_distance_ft(&self, ball_speed_mph: f64) -> f64 {
        let v = mph_to_mps(ball_speed_mph);
        v * v / (2.0 * self.friction * GRAVITY_MPS2) / FT_TO_M
    }

    /// Integrate a putt until it stops
    pub fn roll(&self, ball_speed_mph: f64, hla_deg: f64) -> Result<PuttResult> {
        if !ball_speed_mph.is_finite() || ball_speed_mph <= 0.0 {
            return Err(FlightError::invalid_input(
                "ball_speed",
                format!("must be positive, got {ball_speed_mph}"),
            ));
        }
        if !hla_deg.is_finite() {
            return Err(FlightError::invalid_input("hla", "must be finite"));
        }

        let dt = self.time_step_s;
        let decel = self.friction * GRAVITY_MPS2;
        let hla = hla_deg.to_radians();
        let mut speed = mph_to_mps(ball_speed_mph);
        let mut travelled = 0.0;
        let mut time = 0.0;

        while speed > PUTT_STOP_SPEED_MPS && time < self.max_time_s {
            speed = (speed - decel * dt).max(0.0);
            travelled += speed * dt;
            time += dt;
        }

        let distance_ft = travelled / FT_TO_M;
        Ok(PuttResult {
            distance_ft,
            distance_yards: travelled * M_TO_YD,
            lateral_ft: distance_ft * hla.sin(),
            time_s: time,
            friction: self.friction,
        })
    }
}
