//! Data-fitted distance models that can replace the integrated total.
//!
//! Each fit is a linear regression around a region's average launch:
//! `total = avg_total + a·Δspeed + b·ΔVLA + c·Δspin`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shot::ShotInput;

/// Ball speed at or above which the driver regression may take over (mph)
pub const DRIVER_MIN_SPEED_MPH: f64 = 140.0;

/// Launches at or above this VLA stay on the physics model (deg)
pub const DRIVER_MAX_VLA_DEG: f64 = 20.0;

/// Which model produces the reported total distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightModel {
    /// Five-regime integrated flight, bounce and roll
    #[default]
    Physics,
    /// Physics, except driver-speed launches use the driver regression total
    EmpiricalDriver,
    /// Multi-region regression for every shot
    Empirical,
}

impl FlightModel {
    pub fn as_str(self) -> &'static str {
        match self {
            FlightModel::Physics => "physics",
            FlightModel::EmpiricalDriver => "empirical_driver",
            FlightModel::Empirical => "empirical",
        }
    }

    /// Total distance from the regression, or `None` when physics governs the shot
    pub fn empirical_total_yards(self, shot: &ShotInput) -> Option<f64> {
        let speed = shot.ball_speed_mph;
        let vla = shot.vla_deg;
        let spin = shot.total_spin_rpm();
        match self {
            FlightModel::Physics => None,
            FlightModel::EmpiricalDriver => {
                if speed >= DRIVER_MIN_SPEED_MPH && vla < DRIVER_MAX_VLA_DEG {
                    Some(DRIVER_BASELINE.predict(speed, vla, spin))
                } else {
                    None
                }
            }
            FlightModel::Empirical => {
                Some(EmpiricalRegion::classify(speed, vla).fit().predict(speed, vla, spin))
            }
        }
    }
}

impl fmt::Display for FlightModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "physics" => Ok(FlightModel::Physics),
            "empirical_driver" | "driver" => Ok(FlightModel::EmpiricalDriver),
            "empirical" => Ok(FlightModel::Empirical),
            other => Err(format!(
                "unknown flight model '{other}' (expected physics, empirical-driver or empirical)"
            )),
        }
    }
}

/// Regression around a region's average launch
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionFit {
    pub avg_speed_mph: f64,
    pub avg_vla_deg: f64,
    pub avg_spin_rpm: f64,
    pub avg_total_yards: f64,
    pub speed_coeff: f64,
    pub vla_coeff: f64,
    pub spin_coeff: f64,
}

impl RegionFit {
    pub fn predict(&self, speed_mph: f64, vla_deg: f64, spin_rpm: f64) -> f64 {
        self.avg_total_yards
            + self.speed_coeff * (speed_mph - self.avg_speed_mph)
            + self.vla_coeff * (vla_deg - self.avg_vla_deg)
            + self.spin_coeff * (spin_rpm - self.avg_spin_rpm)
    }
}

/// Driver baseline: 150.3 mph, 9.9°, 2704 rpm carries 251 yards total
pub const DRIVER_BASELINE: RegionFit = RegionFit {
    avg_speed_mph: 150.3,
    avg_vla_deg: 9.9,
    avg_spin_rpm: 2704.0,
    avg_total_yards: 251.0,
    speed_coeff: 1.5,
    vla_coeff: 8.0,
    spin_coeff: 0.01,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmpiricalRegion {
    Wedge,
    Iron,
    Power,
    DriverLowVla,
    Driver,
}

impl EmpiricalRegion {
    pub fn classify(speed_mph: f64, vla_deg: f64) -> Self {
        if speed_mph < 65.0 {
            EmpiricalRegion::Wedge
        } else if speed_mph < 100.0 {
            EmpiricalRegion::Iron
        } else if speed_mph < 140.0 {
            EmpiricalRegion::Power
        } else if vla_deg < 13.0 {
            EmpiricalRegion::DriverLowVla
        } else {
            EmpiricalRegion::Driver
        }
    }

    pub fn fit(self) -> &'static RegionFit {
        match self {
            EmpiricalRegion::Wedge => &WEDGE_FIT,
            EmpiricalRegion::Iron => &IRON_FIT,
            EmpiricalRegion::Power => &POWER_FIT,
            EmpiricalRegion::DriverLowVla => &DRIVER_LOW_VLA_FIT,
            EmpiricalRegion::Driver => &DRIVER_FIT,
        }
    }
}

static WEDGE_FIT: RegionFit = RegionFit {
    avg_speed_mph: 53.408,
    avg_vla_deg: 28.524,
    avg_spin_rpm: 8091.1,
    avg_total_yards: 64.37,
    speed_coeff: 2.286,
    vla_coeff: 0.352,
    spin_coeff: 0.001092,
};

static IRON_FIT: RegionFit = RegionFit {
    avg_speed_mph: 83.771,
    avg_vla_deg: 19.893,
    avg_spin_rpm: 5568.3,
    avg_total_yards: 130.64,
    speed_coeff: 2.668,
    vla_coeff: 1.326,
    spin_coeff: 0.005048,
};

static POWER_FIT: RegionFit = RegionFit {
    avg_speed_mph: 121.453,
    avg_vla_deg: 15.437,
    avg_spin_rpm: 4568.3,
    avg_total_yards: 214.59,
    speed_coeff: 2.388,
    vla_coeff: 1.761,
    spin_coeff: 0.010370,
};

static DRIVER_LOW_VLA_FIT: RegionFit = RegionFit {
    avg_speed_mph: 156.090,
    avg_vla_deg: 10.175,
    avg_spin_rpm: 2784.2,
    avg_total_yards: 256.84,
    speed_coeff: 2.165,
    vla_coeff: 5.044,
    spin_coeff: 0.026762,
};

static DRIVER_FIT: RegionFit = RegionFit {
    avg_speed_mph: 156.090,
    avg_vla_deg: 15.718,
    avg_spin_rpm: 2784.2,
    avg_total_yards: 276.13,
    speed_coeff: 1.985,
    vla_coeff: 2.303,
    spin_coeff: 0.017888,
};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_driver_baseline() {
        let shot = ShotInput::new(150.3, 9.9, 0.0, 2704.0, 0.0);
        let total = FlightModel::EmpiricalDriver.empirical_total_yards(&shot);
        assert_abs_diff_eq!(total.unwrap_or_default(), 251.0, epsilon = 1e-9);
    }

    #[test]
    fn test_driver_regression_slopes() {
        let faster = DRIVER_BASELINE.predict(160.3, 9.9, 2704.0);
        assert_abs_diff_eq!(faster, 266.0, epsilon = 1e-9);
        let higher = DRIVER_BASELINE.predict(150.3, 11.9, 2704.0);
        assert_abs_diff_eq!(higher, 267.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empirical_driver_leaves_other_shots_to_physics() {
        let iron = ShotInput::new(120.0, 14.0, 0.0, 4500.0, 0.0);
        assert_eq!(FlightModel::EmpiricalDriver.empirical_total_yards(&iron), None);
        let lofted = ShotInput::new(150.0, 22.0, 0.0, 2500.0, 0.0);
        assert_eq!(FlightModel::EmpiricalDriver.empirical_total_yards(&lofted), None);
        assert_eq!(FlightModel::Physics.empirical_total_yards(&iron), None);
    }

    #[test]
    fn test_region_classification() {
        assert_eq!(EmpiricalRegion::classify(64.9, 30.0), EmpiricalRegion::Wedge);
        assert_eq!(EmpiricalRegion::classify(99.9, 20.0), EmpiricalRegion::Iron);
        assert_eq!(EmpiricalRegion::classify(100.0, 20.0), EmpiricalRegion::Power);
        assert_eq!(EmpiricalRegion::classify(150.0, 12.9), EmpiricalRegion::DriverLowVla);
        assert_eq!(EmpiricalRegion::classify(150.0, 13.0), EmpiricalRegion::Driver);
    }

    #[test]
    fn test_region_average_predicts_region_total() {
        let fit = EmpiricalRegion::Power.fit();
        let shot = ShotInput::new(fit.avg_speed_mph, fit.avg_vla_deg, 0.0, fit.avg_spin_rpm, 0.0);
        let total = FlightModel::Empirical.empirical_total_yards(&shot).unwrap_or_default();
        assert_abs_diff_eq!(total, 214.59, epsilon = 1e-9);
    }

    #[test]
    fn test_model_parsing() {
        assert_eq!("physics".parse::<FlightModel>(), Ok(FlightModel::Physics));
        assert_eq!("empirical-driver".parse::<FlightModel>(), Ok(FlightModel::EmpiricalDriver));
        assert_eq!("EMPIRICAL".parse::<FlightModel>(), Ok(FlightModel::Empirical));
        assert!("magic".parse::<FlightModel>().is_err());
        assert_eq!(FlightModel::default(), FlightModel::Physics);
    }
}
