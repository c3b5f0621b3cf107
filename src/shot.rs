//! Launch conditions for a single shot.

use serde::{Deserialize, Serialize};

use crate::error::{FlightError, Result};

/// Launch conditions as measured at ball departure.
///
/// Spin is stored as backspin/sidespin components; total spin and spin axis
/// are derived on demand and convert back without loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotInput {
    pub ball_speed_mph: f64,
    /// Vertical launch angle (deg)
    pub vla_deg: f64,
    /// Horizontal launch angle (deg), positive right of target
    pub hla_deg: f64,
    pub backspin_rpm: f64,
    /// Positive sidespin curves the ball right
    pub sidespin_rpm: f64,
}

impl ShotInput {
    /// Shot from backspin and sidespin components
    pub fn new(ball_speed_mph: f64, vla_deg: f64, hla_deg: f64, backspin_rpm: f64, sidespin_rpm: f64) -> Self {
        Self {
            ball_speed_mph,
            vla_deg,
            hla_deg,
            backspin_rpm,
            sidespin_rpm,
        }
    }

    /// Shot from total spin and spin axis (0° = pure backspin, positive tilts right)
    pub fn from_total_spin(
        ball_speed_mph: f64,
        vla_deg: f64,
        hla_deg: f64,
        total_spin_rpm: f64,
        spin_axis_deg: f64,
    ) -> Self {
        let (backspin_rpm, sidespin_rpm) = spin_components(total_spin_rpm, spin_axis_deg);
        Self::new(ball_speed_mph, vla_deg, hla_deg, backspin_rpm, sidespin_rpm)
    }

    /// Normalise a launch-monitor record into a validated shot
    pub fn from_record(record: &LaunchRecord) -> Result<Self> {
        let shot = match (record.total_spin, record.spin_axis, record.backspin, record.sidespin) {
            (Some(total), axis, _, _) => {
                if total < 0.0 {
                    return Err(FlightError::invalid_input(
                        "total_spin",
                        format!("must be non-negative, got {total}"),
                    ));
                }
                Self::from_total_spin(
                    record.ball_speed,
                    record.vla,
                    record.hla,
                    total,
                    axis.unwrap_or(0.0),
                )
            }
            (None, _, Some(back), side) => Self::new(
                record.ball_speed,
                record.vla,
                record.hla,
                back,
                side.unwrap_or(0.0),
            ),
            (None, _, None, _) => {
                return Err(FlightError::invalid_input(
                    "spin",
                    "record needs total_spin or backspin",
                ))
            }
        };
        shot.validate()?;
        Ok(shot)
    }

    pub fn total_spin_rpm(&self) -> f64 {
        self.backspin_rpm.hypot(self.sidespin_rpm)
    }

    pub fn spin_axis_deg(&self) -> f64 {
        self.sidespin_rpm.atan2(self.backspin_rpm).to_degrees()
    }

    /// Reject inputs that would produce a NaN trajectory
    pub fn validate(&self) -> Result<()> {
        if !self.ball_speed_mph.is_finite() {
            return Err(FlightError::invalid_input(
                "ball_speed",
                format!("must be finite, got {}", self.ball_speed_mph),
            ));
        }
        if self.ball_speed_mph <= 0.0 {
            return Err(FlightError::invalid_input(
                "ball_speed",
                format!("must be positive, got {}", self.ball_speed_mph),
            ));
        }
        if !self.vla_deg.is_finite() || self.vla_deg.abs() > 90.0 {
            return Err(FlightError::invalid_input(
                "vla",
                format!("must be within ±90°, got {}", self.vla_deg),
            ));
        }
        if !self.hla_deg.is_finite() || self.hla_deg.abs() > 90.0 {
            return Err(FlightError::invalid_input(
                "hla",
                format!("must be within ±90°, got {}", self.hla_deg),
            ));
        }
        if !self.backspin_rpm.is_finite() || !self.sidespin_rpm.is_finite() {
            return Err(FlightError::invalid_input("spin", "must be finite"));
        }
        Ok(())
    }
}

/// Split total spin into (backspin, sidespin) components
pub fn spin_components(total_spin_rpm: f64, spin_axis_deg: f64) -> (f64, f64) {
    let axis = spin_axis_deg.to_radians();
    (total_spin_rpm * axis.cos(), total_spin_rpm * axis.sin())
}

/// Shot record as produced by the ingestion layer.
///
/// Either `total_spin` (with optional `spin_axis`) or `backspin` (with
/// optional `sidespin`) must be present; `total_spin` wins when both are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub ball_speed: f64,
    pub vla: f64,
    #[serde(default)]
    pub hla: f64,
    #[serde(default)]
    pub total_spin: Option<f64>,
    #[serde(default)]
    pub spin_axis: Option<f64>,
    #[serde(default)]
    pub backspin: Option<f64>,
    #[serde(default)]
    pub sidespin: Option<f64>,
}

/// Parse a launch-monitor direction string such as `"7.5 L"` or `"3.2R"`.
///
/// An `L` suffix forces the value negative and `R` forces it positive; a bare
/// number keeps its sign. Empty, `-` and unparseable strings yield `None`.
pub fn parse_direction(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }

    let (number, side) = match trimmed.chars().last() {
        Some('L') | Some('l') => (&trimmed[..trimmed.len() - 1], Some(-1.0)),
        Some('R') | Some('r') => (&trimmed[..trimmed.len() - 1], Some(1.0)),
        _ => (trimmed, None),
    };

    let value = number.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(match side {
        Some(sign) => value.abs() * sign,
        None => value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_total_spin_round_trip() {
        let shot = ShotInput::from_total_spin(120.0, 14.0, 0.0, 4500.0, -12.5);
        assert_abs_diff_eq!(shot.total_spin_rpm(), 4500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shot.spin_axis_deg(), -12.5, epsilon = 1e-9);

        let again = ShotInput::from_total_spin(
            shot.ball_speed_mph,
            shot.vla_deg,
            shot.hla_deg,
            shot.total_spin_rpm(),
            shot.spin_axis_deg(),
        );
        assert_abs_diff_eq!(again.backspin_rpm, shot.backspin_rpm, epsilon = 1e-9);
        assert_abs_diff_eq!(again.sidespin_rpm, shot.sidespin_rpm, epsilon = 1e-9);
    }

    #[test]
    fn test_components_to_axis() {
        let shot = ShotInput::new(100.0, 15.0, 0.0, 3000.0, 3000.0);
        assert_abs_diff_eq!(shot.spin_axis_deg(), 45.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shot.total_spin_rpm(), 3000.0 * 2f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_bad_speed() {
        for speed in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = ShotInput::new(speed, 12.0, 0.0, 3000.0, 0.0).validate();
            assert!(
                matches!(err, Err(FlightError::InvalidShotInput { field: "ball_speed", .. })),
                "speed {speed} accepted"
            );
        }
    }

    #[test]
    fn test_rejects_non_finite_angles_and_spin() {
        assert!(ShotInput::new(100.0, f64::NAN, 0.0, 3000.0, 0.0).validate().is_err());
        assert!(ShotInput::new(100.0, 12.0, 120.0, 3000.0, 0.0).validate().is_err());
        assert!(ShotInput::new(100.0, 12.0, 0.0, f64::NAN, 0.0).validate().is_err());
        assert!(ShotInput::new(100.0, -8.0, 0.0, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_from_record_total_spin_form() {
        let record = LaunchRecord {
            ball_speed: 150.3,
            vla: 9.9,
            hla: 0.0,
            total_spin: Some(2704.0),
            spin_axis: Some(0.0),
            ..LaunchRecord::default()
        };
        let shot = ShotInput::from_record(&record).unwrap();
        assert_eq!(shot.backspin_rpm, 2704.0);
        assert_eq!(shot.sidespin_rpm, 0.0);
    }

    #[test]
    fn test_from_record_component_form() {
        let record: LaunchRecord = serde_json::from_str(
            r#"{"ball_speed": 45, "vla": 22, "hla": 0, "backspin": 5000, "sidespin": 0}"#,
        )
        .unwrap();
        let shot = ShotInput::from_record(&record).unwrap();
        assert_eq!(shot.backspin_rpm, 5000.0);
        assert_eq!(shot.total_spin_rpm(), 5000.0);
    }

    #[test]
    fn test_from_record_requires_spin() {
        let record = LaunchRecord {
            ball_speed: 80.0,
            vla: 12.0,
            ..LaunchRecord::default()
        };
        assert!(ShotInput::from_record(&record).is_err());

        let negative = LaunchRecord {
            total_spin: Some(-10.0),
            ..record
        };
        assert!(ShotInput::from_record(&negative).is_err());
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("7.5 L"), Some(-7.5));
        assert_eq!(parse_direction("3.2R"), Some(3.2));
        assert_eq!(parse_direction("-3.2 R"), Some(3.2));
        assert_eq!(parse_direction(" -1.4 "), Some(-1.4));
        assert_eq!(parse_direction("0.0"), Some(0.0));
        assert_eq!(parse_direction("-"), None);
        assert_eq!(parse_direction(""), None);
        assert_eq!(parse_direction("abc"), None);
    }
}
