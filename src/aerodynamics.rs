//! Drag and lift coefficients for a spinning golf ball.
//!
//! All force-law inputs here are in ft/s (velocity) and rad/s (spin); the
//! accelerations returned are in ft/s². Speed-keyed tables take mph.

use nalgebra::Vector3;

use crate::constants::{
    fps_to_mph, rad_s_to_rpm, LIFT_AMPLITUDE, LIFT_EXPONENT, MAGNUS_CONST,
    MIN_MAGNUS_SPIN_RAD_S,
};
use crate::interpolation::Curve;
use crate::regime::PhysicsRegime;

/// Launches below this VLA use the universal low-trajectory Cd curve (deg)
pub const LOW_LAUNCH_VLA_DEG: f64 = 10.0;

/// Launches at or above this VLA get the high-loft drag discount (deg)
pub const HIGH_LOFT_VLA_DEG: f64 = 20.0;

/// Speed at which the low-speed lift ramp reaches full lift (mph)
pub const FULL_LIFT_SPEED_MPH: f64 = 60.0;

static LOW_LAUNCH_DRAG: Curve = Curve::new(&[(60.0, 0.60), (85.0, 0.55)]);

/// Drag coefficient for the current speed.
///
/// The base curve is picked from the initial VLA: low launches share one
/// curve regardless of regime, everything else uses the regime's own curve.
pub fn drag_coefficient(
    current_speed_mph: f64,
    initial_vla_deg: f64,
    regime: PhysicsRegime,
    initial_speed_mph: f64,
) -> f64 {
    if initial_vla_deg < LOW_LAUNCH_VLA_DEG {
        return LOW_LAUNCH_DRAG.interpolate(current_speed_mph);
    }

    let profile = regime.profile();
    let mut multiplier = profile.drag_multiplier;
    if let Some(fast) = profile.fast_shot_drag {
        if initial_speed_mph >= fast.min_initial_speed_mph {
            multiplier *= fast.multiplier;
        }
    }
    profile.drag_curve.interpolate(current_speed_mph) * multiplier
}

/// Drag scaling keyed on the current (decayed) spin rate
pub fn spin_drag_multiplier(regime: PhysicsRegime, current_spin_rpm: f64) -> f64 {
    regime.profile().spin_drag.interpolate(current_spin_rpm)
}

/// Drag discount for lofted launches, 1.0 below the high-loft threshold
pub fn high_loft_multiplier(regime: PhysicsRegime, current_speed_mph: f64, initial_vla_deg: f64) -> f64 {
    if initial_vla_deg < HIGH_LOFT_VLA_DEG {
        return 1.0;
    }
    regime.profile().high_loft_drag.interpolate(current_speed_mph)
}

/// Regime lift multiplier for the current flight-path angle
pub fn lift_coefficient_boost(regime: PhysicsRegime, current_vla_deg: f64) -> f64 {
    let boost = regime.profile().lift_boost;
    if current_vla_deg >= boost.min_vla_deg {
        boost.multiplier
    } else {
        1.0
    }
}

/// Lift coefficient from the spin parameter `omega / |v|`.
///
/// Returns 0.0 when the ball is not spinning or not moving, so callers never
/// divide by zero. Below 60 mph lift ramps linearly from the regime's floor.
pub fn lift_coefficient(regime: PhysicsRegime, spin_rad_s: f64, speed_fps: f64) -> f64 {
    if spin_rad_s <= 0.0 || speed_fps <= 0.0 {
        return 0.0;
    }
    let spin_parameter = spin_rad_s / speed_fps;
    let mut cl = LIFT_AMPLITUDE * spin_parameter.powf(LIFT_EXPONENT);

    let speed_mph = fps_to_mph(speed_fps);
    if speed_mph < FULL_LIFT_SPEED_MPH {
        let floor = regime.profile().low_speed_lift_floor;
        let fraction = speed_mph / FULL_LIFT_SPEED_MPH;
        cl *= floor + (1.0 - floor) * fraction;
    }
    cl
}

/// Angular velocity vector in the world frame (x lateral, y up, z downrange).
///
/// Pure backspin spins about -x; tilting the axis right (positive) adds a
/// vertical component that curves the ball toward +x.
pub fn spin_vector(spin_rad_s: f64, spin_axis_rad: f64) -> Vector3<f64> {
    // Sidespin turns about the vertical axis, and omega_y x v_z points along +x
    Vector3::new(
        -spin_rad_s * spin_axis_rad.cos(),
        spin_rad_s * spin_axis_rad.sin(),
        0.0,
    )
}

/// Coefficient model bound to one shot's regime and launch conditions.
#[derive(Debug, Clone, Copy)]
pub struct AeroModel {
    pub regime: PhysicsRegime,
    pub initial_speed_mph: f64,
    pub initial_vla_deg: f64,
    /// `k` in `a_drag = -k * Cd * |v| * v`
    pub drag_constant: f64,
}

impl AeroModel {
    pub fn new(regime: PhysicsRegime, initial_speed_mph: f64, initial_vla_deg: f64, drag_constant: f64) -> Self {
        Self {
            regime,
            initial_speed_mph,
            initial_vla_deg,
            drag_constant,
        }
    }

    /// Drag plus Magnus acceleration (ft/s²), gravity excluded
    pub fn acceleration_fps2(
        &self,
        velocity_fps: &Vector3<f64>,
        spin_rad_s: f64,
        spin_axis_rad: f64,
    ) -> Vector3<f64> {
        let speed = velocity_fps.norm();
        if speed <= 0.0 {
            return Vector3::zeros();
        }
        let speed_mph = fps_to_mph(speed);

        let cd = drag_coefficient(speed_mph, self.initial_vla_deg, self.regime, self.initial_speed_mph);
        let drag_factor = -self.drag_constant
            * cd
            * speed
            * spin_drag_multiplier(self.regime, rad_s_to_rpm(spin_rad_s))
            * high_loft_multiplier(self.regime, speed_mph, self.initial_vla_deg);
        let mut accel = velocity_fps * drag_factor;

        if spin_rad_s > MIN_MAGNUS_SPIN_RAD_S {
            let current_vla_deg = (velocity_fps.y / speed).clamp(-1.0, 1.0).asin().to_degrees();
            let cl = lift_coefficient(self.regime, spin_rad_s, speed)
                * lift_coefficient_boost(self.regime, current_vla_deg);
            let omega = spin_vector(spin_rad_s, spin_axis_rad);
            let magnus_factor = MAGNUS_CONST * (cl / spin_rad_s) * speed;
            accel += omega.cross(velocity_fps) * magnus_factor;
        }

        accel
    }
}
