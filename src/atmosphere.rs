//! Air density for the drag and Magnus force laws.
//!
//! The coefficient tables were tuned at a fixed air density of 0.0748 lb/ft³.
//! Other conditions scale that calibrated density by the ratio of moist-air
//! densities, so the default conditions reproduce the calibration exactly.

use serde::{Deserialize, Serialize};

use crate::constants::{BALL_CIRCUMFERENCE_IN, BALL_MASS_OZ, STANDARD_AIR_DENSITY_LB_FT3};
use crate::error::{FlightError, Result};

const R_DRY: f64 = 287.05; // Gas constant for dry air (J/(kg·K))
const R_VAPOR: f64 = 461.495; // Gas constant for water vapor

/// Sea-level standard pressure (hPa)
const SEA_LEVEL_PRESSURE_HPA: f64 = 1013.25;

/// Reference temperature the calibration data was recorded at (°C)
const REFERENCE_TEMPERATURE_C: f64 = 21.1;

const REFERENCE_HUMIDITY_PERCENT: f64 = 50.0;

/// Launch-site weather and elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphericConditions {
    pub temperature_c: f64,
    /// Station pressure; `None` uses the standard pressure at `altitude_m`
    pub pressure_hpa: Option<f64>,
    pub altitude_m: f64,
    pub humidity_percent: f64,
    /// Explicit density override, bypassing the weather model
    pub air_density_lb_ft3: Option<f64>,
}

impl Default for AtmosphericConditions {
    fn default() -> Self {
        Self {
            temperature_c: REFERENCE_TEMPERATURE_C,
            pressure_hpa: None,
            altitude_m: 0.0,
            humidity_percent: REFERENCE_HUMIDITY_PERCENT,
            air_density_lb_ft3: None,
        }
    }
}

impl AtmosphericConditions {
    pub fn with_density(air_density_lb_ft3: f64) -> Self {
        Self {
            air_density_lb_ft3: Some(air_density_lb_ft3),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(rho) = self.air_density_lb_ft3 {
            if !rho.is_finite() || rho <= 0.0 {
                return Err(FlightError::InvalidConfig(format!(
                    "air density must be positive, got {rho}"
                )));
            }
            return Ok(());
        }
        if !self.temperature_c.is_finite() || self.temperature_c <= -273.15 {
            return Err(FlightError::InvalidConfig(format!(
                "temperature {} °C is below absolute zero",
                self.temperature_c
            )));
        }
        if let Some(p) = self.pressure_hpa {
            if !p.is_finite() || p <= 0.0 {
                return Err(FlightError::InvalidConfig(format!(
                    "pressure must be positive, got {p} hPa"
                )));
            }
        }
        let station = self.station_pressure_hpa();
        if !self.altitude_m.is_finite() || !station.is_finite() || station <= 0.0 {
            return Err(FlightError::InvalidConfig(format!(
                "altitude {} m is outside the troposphere model",
                self.altitude_m
            )));
        }
        Ok(())
    }

    fn station_pressure_hpa(&self) -> f64 {
        self.pressure_hpa
            .unwrap_or_else(|| standard_pressure_hpa(self.altitude_m))
    }

    /// Air density in lb/ft³ as used by the drag constant
    pub fn density_lb_ft3(&self) -> f64 {
        if let Some(rho) = self.air_density_lb_ft3 {
            return rho;
        }
        let reference = Self::default();
        let ratio = moist_air_density_kg_m3(
            self.temperature_c,
            self.station_pressure_hpa(),
            self.humidity_percent,
        ) / moist_air_density_kg_m3(
            reference.temperature_c,
            reference.station_pressure_hpa(),
            reference.humidity_percent,
        );
        STANDARD_AIR_DENSITY_LB_FT3 * ratio
    }

    /// Drag force constant for a regulation ball in these conditions
    pub fn drag_constant(&self) -> f64 {
        calculate_drag_constant(self.density_lb_ft3())
    }
}

/// Standard-atmosphere pressure at an elevation in the troposphere (hPa)
pub fn standard_pressure_hpa(altitude_m: f64) -> f64 {
    SEA_LEVEL_PRESSURE_HPA * (1.0 - 2.25577e-5 * altitude_m).powf(5.25588)
}

/// Moist-air density from partial pressures of dry air and water vapor (kg/m³)
pub fn moist_air_density_kg_m3(temperature_c: f64, pressure_hpa: f64, humidity_percent: f64) -> f64 {
    let temp_k = temperature_c + 273.15;
    let humidity = humidity_percent.clamp(0.0, 100.0);

    // Saturation vapor pressure (Arden Buck)
    let es_hpa = if temperature_c >= 0.0 {
        6.1121 * ((18.678 - temperature_c / 234.5) * (temperature_c / (257.14 + temperature_c))).exp()
    } else {
        6.1115 * ((23.036 - temperature_c / 333.7) * (temperature_c / (279.82 + temperature_c))).exp()
    };

    let vapor_pressure_pa = humidity / 100.0 * es_hpa * 100.0;
    let dry_pressure_pa = (pressure_hpa * 100.0 - vapor_pressure_pa).max(0.0);

    dry_pressure_pa / (R_DRY * temp_k) + vapor_pressure_pa / (R_VAPOR * temp_k)
}

/// Drag force constant `k` in `a = -k * Cd * |v| * v` (ft/s units)
///
/// Scales with air density and cross-section, inversely with ball mass.
pub fn calculate_drag_constant(air_density_lb_ft3: f64) -> f64 {
    0.07182
        * air_density_lb_ft3
        * (5.125 / BALL_MASS_OZ)
        * (BALL_CIRCUMFERENCE_IN / 9.125).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_default_conditions_reproduce_calibrated_density() {
        let atmos = AtmosphericConditions::default();
        assert_eq!(atmos.density_lb_ft3(), STANDARD_AIR_DENSITY_LB_FT3);
    }

    #[test]
    fn test_drag_constant_at_calibrated_density() {
        let k = calculate_drag_constant(0.0748);
        assert_relative_eq!(k, 0.005681, max_relative = 1e-3);
        assert_eq!(AtmosphericConditions::default().drag_constant(), k);
    }

    #[test]
    fn test_altitude_thins_the_air() {
        let denver = AtmosphericConditions {
            altitude_m: 1609.0,
            ..AtmosphericConditions::default()
        };
        let ratio = denver.density_lb_ft3() / STANDARD_AIR_DENSITY_LB_FT3;
        assert!(ratio > 0.80 && ratio < 0.86, "ratio {ratio}");
    }

    #[test]
    fn test_hot_air_is_thinner() {
        let hot = AtmosphericConditions {
            temperature_c: 35.0,
            ..AtmosphericConditions::default()
        };
        let cold = AtmosphericConditions {
            temperature_c: 5.0,
            ..AtmosphericConditions::default()
        };
        assert!(hot.density_lb_ft3() < STANDARD_AIR_DENSITY_LB_FT3);
        assert!(cold.density_lb_ft3() > STANDARD_AIR_DENSITY_LB_FT3);
    }

    #[test]
    fn test_sea_level_dry_air_density() {
        let rho = moist_air_density_kg_m3(15.0, 1013.25, 0.0);
        assert_abs_diff_eq!(rho, 1.225, epsilon = 1e-3);
    }

    #[test]
    fn test_density_override_and_validation() {
        let atmos = AtmosphericConditions::with_density(0.07);
        assert_eq!(atmos.density_lb_ft3(), 0.07);
        assert!(atmos.validate().is_ok());
        assert!(AtmosphericConditions::with_density(0.0).validate().is_err());
        let bad = AtmosphericConditions {
            pressure_hpa: Some(-5.0),
            ..AtmosphericConditions::default()
        };
        assert!(bad.validate().is_err());
    }
}
