//! Physical constants and unit conversions used by the flight model
//!
//! The aerodynamic force law is evaluated in feet per second (the units the
//! drag and Magnus constants were fitted in), while ball state is kept in SI.

use std::f64::consts::PI;

/// Gravitational acceleration in ft/s²
pub const GRAVITY_FPS2: f64 = 32.174;

/// Gravitational acceleration in m/s², used for turf and green friction
pub const GRAVITY_MPS2: f64 = 9.81;

/// Regulation ball mass in ounces
pub const BALL_MASS_OZ: f64 = 1.62;

/// Regulation ball circumference in inches
pub const BALL_CIRCUMFERENCE_IN: f64 = 5.277;

/// Ball radius in meters, derived from the circumference
pub const BALL_RADIUS_M: f64 = (BALL_CIRCUMFERENCE_IN / (2.0 * PI)) / 12.0 * FT_TO_M;

/// Height of the ball centre when resting on the ground plane (m)
///
/// First contact with this plane while descending ends the carry.
pub const GROUND_CONTACT_HEIGHT_M: f64 = 0.021336;

/// Standard air density in lb/ft³ the calibration tables were tuned at
pub const STANDARD_AIR_DENSITY_LB_FT3: f64 = 0.0748;

/// Magnus force scaling constant
///
/// Multiplies `(Cl / omega) * |v|` and the `omega x v` cross product, all in
/// ft/s units, to give a Magnus acceleration in ft/s².
pub const MAGNUS_CONST: f64 = 0.00568249207;

/// Lift coefficient amplitude in `Cl = A * S^0.4`
pub const LIFT_AMPLITUDE: f64 = 0.217;

/// Exponent on the spin parameter in the lift law
pub const LIFT_EXPONENT: f64 = 0.4;

/// Spin decay time constant in seconds, independent of regime
pub const SPIN_DECAY_TIME_CONSTANT_S: f64 = 24.5;

/// Integration timestep the calibration was tuned with (~625 Hz)
pub const DEFAULT_TIME_STEP_S: f64 = 0.0016;

/// Simulated-time safety budget for one shot
pub const DEFAULT_MAX_TIME_S: f64 = 15.0;

/// Launch height of the ball centre (m); the regime tables were tuned from here
pub const DEFAULT_LAUNCH_HEIGHT_M: f64 = 3.146;

/// Downward contact speed above which the ball bounces instead of settling (m/s)
pub const BOUNCE_THRESHOLD_MPS: f64 = 0.5;

/// Fraction of vertical speed returned on a bounce
pub const VERTICAL_RESTITUTION: f64 = 0.5;

/// Horizontal speed at which a rolling ball is considered stopped (m/s)
pub const ROLL_STOP_SPEED_MPS: f64 = 0.01;

/// Speed below which aerodynamics are skipped and the ball is at rest (ft/s)
pub const MIN_AERO_SPEED_FPS: f64 = 0.1;

/// Spin below which the Magnus contribution is short-circuited (rad/s)
pub const MIN_MAGNUS_SPIN_RAD_S: f64 = 1.0;

/// Minimum threshold for preventing division by zero in general calculations
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;

// Unit conversions

/// Miles per hour to meters per second
pub const MPH_TO_MPS: f64 = 0.44704;

/// Meters per second to miles per hour (as used by the landing-speed tables)
pub const MPS_TO_MPH: f64 = 2.237;

/// Meters per second to feet per second
pub const MPS_TO_FPS: f64 = 3.28084;

/// Feet per second in one mile per hour
pub const FPS_PER_MPH: f64 = 1.467;

/// Feet to meters
pub const FT_TO_M: f64 = 0.3048;

/// Meters to yards
pub const M_TO_YD: f64 = 1.09361;

/// Yards to meters
pub const YD_TO_M: f64 = 0.9144;

/// Revolutions per minute to radians per second
pub const RPM_TO_RAD_S: f64 = PI / 30.0;

/// Radians per second to revolutions per minute
pub const RAD_S_TO_RPM: f64 = 30.0 / PI;

/// Convert a ball speed in mph to m/s
#[inline]
pub fn mph_to_mps(mph: f64) -> f64 {
    mph * MPH_TO_MPS
}

/// Convert a speed in ft/s to mph
#[inline]
pub fn fps_to_mph(fps: f64) -> f64 {
    fps / FPS_PER_MPH
}

#[inline]
pub fn rpm_to_rad_s(rpm: f64) -> f64 {
    rpm * RPM_TO_RAD_S
}

#[inline]
pub fn rad_s_to_rpm(rad_s: f64) -> f64 {
    rad_s * RAD_S_TO_RPM
}

#[inline]
pub fn meters_to_yards(m: f64) -> f64 {
    m * M_TO_YD
}

#[inline]
pub fn yards_to_meters(yd: f64) -> f64 {
    yd * YD_TO_M
}
