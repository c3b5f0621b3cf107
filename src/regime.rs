//! Physics regime classification and per-regime calibration data.
//!
//! A regime is chosen once from the launch conditions and never changes while
//! the shot is simulated, so coefficient curves do not jump as the ball slows
//! through a regime boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::interpolation::Curve;

/// Initial ball speed below which every shot is a wedge (mph)
pub const WEDGE_MAX_SPEED_MPH: f64 = 65.0;

/// Initial ball speed at or above which every shot is a power shot (mph)
pub const POWER_MIN_SPEED_MPH: f64 = 85.0;

/// VLA below which a mid-speed shot is a low trajectory (deg)
pub const LOW_TRAJECTORY_MAX_VLA_DEG: f64 = 10.0;

/// VLA at or above which a mid-speed shot is a high iron (deg)
pub const HIGH_IRON_MIN_VLA_DEG: f64 = 20.0;

/// Named physics configuration selected from the initial launch conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhysicsRegime {
    Wedge,
    LowTrajectory,
    MidIron,
    HighIron,
    PowerShot,
}

impl PhysicsRegime {
    pub const ALL: [PhysicsRegime; 5] = [
        PhysicsRegime::Wedge,
        PhysicsRegime::LowTrajectory,
        PhysicsRegime::MidIron,
        PhysicsRegime::HighIron,
        PhysicsRegime::PowerShot,
    ];

    /// Classify a shot from its initial speed and vertical launch angle.
    ///
    /// Speed checks take priority over the launch angle: a 90 mph shot at 5°
    /// is a power shot, not a low trajectory.
    pub fn classify(initial_speed_mph: f64, initial_vla_deg: f64) -> Self {
        if initial_speed_mph < WEDGE_MAX_SPEED_MPH {
            PhysicsRegime::Wedge
        } else if initial_speed_mph >= POWER_MIN_SPEED_MPH {
            PhysicsRegime::PowerShot
        } else if initial_vla_deg < LOW_TRAJECTORY_MAX_VLA_DEG {
            PhysicsRegime::LowTrajectory
        } else if initial_vla_deg < HIGH_IRON_MIN_VLA_DEG {
            PhysicsRegime::MidIron
        } else {
            PhysicsRegime::HighIron
        }
    }

    /// Calibration data owned by this regime
    pub fn profile(self) -> &'static RegimeProfile {
        match self {
            PhysicsRegime::Wedge => &WEDGE,
            PhysicsRegime::LowTrajectory => &LOW_TRAJECTORY,
            PhysicsRegime::MidIron => &MID_IRON,
            PhysicsRegime::HighIron => &HIGH_IRON,
            PhysicsRegime::PowerShot => &POWER_SHOT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhysicsRegime::Wedge => "WEDGE",
            PhysicsRegime::LowTrajectory => "LOW_TRAJECTORY",
            PhysicsRegime::MidIron => "MID_IRON",
            PhysicsRegime::HighIron => "HIGH_IRON",
            PhysicsRegime::PowerShot => "POWER_SHOT",
        }
    }

    /// Short description of which launch conditions select this regime
    pub fn description(self) -> &'static str {
        match self {
            PhysicsRegime::Wedge => "speed < 65 mph",
            PhysicsRegime::LowTrajectory => "65-85 mph, VLA < 10°",
            PhysicsRegime::MidIron => "65-85 mph, 10° <= VLA < 20°",
            PhysicsRegime::HighIron => "65-85 mph, VLA >= 20°",
            PhysicsRegime::PowerShot => "speed >= 85 mph",
        }
    }
}

impl fmt::Display for PhysicsRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra base-drag multiplier for fast shots within a regime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastShotDrag {
    pub min_initial_speed_mph: f64,
    pub multiplier: f64,
}

/// Lift multiplier applied once the current VLA reaches a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftBoost {
    pub min_vla_deg: f64,
    pub multiplier: f64,
}

/// Every calibrated constant and curve a regime owns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeProfile {
    /// Cd against current speed (mph) for launches at or above 10° VLA
    pub drag_curve: Curve,
    /// Constant scale on `drag_curve`
    pub drag_multiplier: f64,
    pub fast_shot_drag: Option<FastShotDrag>,
    /// Drag multiplier against current spin (rpm)
    pub spin_drag: Curve,
    /// Drag discount against current speed (mph) for launches at or above 20°
    pub high_loft_drag: Curve,
    /// Fraction of nominal lift kept at zero speed; ramps to 1.0 at 60 mph
    pub low_speed_lift_floor: f64,
    pub lift_boost: LiftBoost,
    /// Base horizontal retention on a bounce before landing-speed and spin adjustments
    pub bounce_retention: f64,
    /// Rolling friction coefficient against current spin (rpm)
    pub rolling_friction: Curve,
    /// Scale on `rolling_friction` against current spin (rpm)
    pub friction_multiplier: Curve,
}

const IRON_DRAG: Curve = Curve::new(&[
    (55.0, 0.75),
    (75.0, 0.25),
    (100.0, 0.18),
    (126.0, 0.14),
    (150.0, 0.10),
]);

const IRON_SPIN_DRAG: Curve = Curve::with_step_below(
    &[(2000.0, 0.98), (3000.0, 1.01), (4000.0, 1.01), (5000.0, 0.88)],
    0.95,
);

const DEFAULT_HIGH_LOFT_DRAG: Curve = Curve::with_step_below(&[(30.0, 0.90), (50.0, 0.82)], 0.95);

const IRON_FRICTION: Curve = Curve::with_step_below(
    &[(2000.0, 0.045), (3000.0, 0.056), (4000.0, 0.078)],
    0.038,
);

static WEDGE: RegimeProfile = RegimeProfile {
    drag_curve: Curve::new(&[(55.0, 0.85), (75.0, 0.31), (100.0, 0.22)]),
    drag_multiplier: 1.0,
    fast_shot_drag: None,
    spin_drag: Curve::new(&[(3000.0, 1.05), (4000.0, 1.0), (5000.0, 0.85)]),
    high_loft_drag: Curve::with_step_below(&[(30.0, 0.90), (50.0, 0.80)], 0.95),
    low_speed_lift_floor: 0.3,
    lift_boost: LiftBoost { min_vla_deg: 20.0, multiplier: 1.22 },
    bounce_retention: 0.72,
    rolling_friction: Curve::new(&[(3000.0, 0.025), (4000.0, 0.040)]),
    friction_multiplier: Curve::new(&[(0.0, 1.0)]),
};

static LOW_TRAJECTORY: RegimeProfile = RegimeProfile {
    drag_curve: IRON_DRAG,
    drag_multiplier: 1.0,
    fast_shot_drag: None,
    spin_drag: IRON_SPIN_DRAG,
    high_loft_drag: DEFAULT_HIGH_LOFT_DRAG,
    low_speed_lift_floor: 0.4,
    lift_boost: LiftBoost { min_vla_deg: 20.0, multiplier: 1.05 },
    bounce_retention: 0.78,
    rolling_friction: Curve::with_step_below(
        &[(2000.0, 0.030), (3000.0, 0.040), (4000.0, 0.060)],
        0.025,
    ),
    friction_multiplier: Curve::new(&[(0.0, 0.70)]),
};

static MID_IRON: RegimeProfile = RegimeProfile {
    drag_curve: IRON_DRAG,
    drag_multiplier: 1.0,
    fast_shot_drag: Some(FastShotDrag { min_initial_speed_mph: 80.0, multiplier: 1.06 }),
    spin_drag: IRON_SPIN_DRAG,
    high_loft_drag: DEFAULT_HIGH_LOFT_DRAG,
    low_speed_lift_floor: 0.4,
    lift_boost: LiftBoost { min_vla_deg: 15.0, multiplier: 1.15 },
    bounce_retention: 0.75,
    rolling_friction: IRON_FRICTION,
    friction_multiplier: Curve::with_step_below(&[(2000.0, 1.4)], 1.0),
};

static HIGH_IRON: RegimeProfile = RegimeProfile {
    drag_curve: IRON_DRAG,
    drag_multiplier: 1.08,
    fast_shot_drag: None,
    spin_drag: IRON_SPIN_DRAG,
    high_loft_drag: DEFAULT_HIGH_LOFT_DRAG,
    low_speed_lift_floor: 0.4,
    lift_boost: LiftBoost { min_vla_deg: 20.0, multiplier: 1.05 },
    bounce_retention: 0.70,
    rolling_friction: IRON_FRICTION,
    friction_multiplier: Curve::with_step_below(&[(2000.0, 1.3)], 1.1),
};

static POWER_SHOT: RegimeProfile = RegimeProfile {
    drag_curve: Curve::new(&[(55.0, 0.78), (75.0, 0.30), (100.0, 0.22), (126.0, 0.18)]),
    drag_multiplier: 1.0,
    fast_shot_drag: None,
    spin_drag: Curve::new(&[(2000.0, 1.0), (3000.0, 1.05), (4000.0, 1.05), (5000.0, 0.90)]),
    high_loft_drag: DEFAULT_HIGH_LOFT_DRAG,
    low_speed_lift_floor: 0.4,
    lift_boost: LiftBoost { min_vla_deg: 15.0, multiplier: 1.10 },
    bounce_retention: 0.75,
    rolling_friction: IRON_FRICTION,
    friction_multiplier: Curve::new(&[(0.0, 1.1)]),
};
