//! Calibration harness: replay measured launch-monitor shots through the
//! simulator and report per-regime error against the measured carry and
//! total.
//!
//! Input is a FlightScope-style CSV export. Direction columns may carry
//! `L`/`R` suffixes (`"7.5 L"`). Rows without a usable ball speed, launch
//! angle or spin, or with neither a carry nor a total, are skipped with a
//! warning.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;
use crate::regime::PhysicsRegime;
use crate::shot::{parse_direction, ShotInput};
use crate::trajectory_solver::{SimulationConfig, TrajectorySolver};

/// Raw FlightScope export row; numeric columns are parsed leniently
#[derive(Debug, Deserialize)]
struct FlightScopeRow {
    #[serde(rename = "Ball (mph)", default)]
    ball_mph: String,
    #[serde(rename = "Launch V (deg)", default)]
    launch_v_deg: String,
    #[serde(rename = "Launch H (deg)", default)]
    launch_h_deg: String,
    #[serde(rename = "Spin (rpm)", default)]
    spin_rpm: String,
    #[serde(rename = "Spin Axis (deg)", default)]
    spin_axis_deg: String,
    #[serde(rename = "Carry (yd)", default)]
    carry_yd: String,
    #[serde(rename = "Total (yd)", default)]
    total_yd: String,
}

/// One measured shot ready to replay. At least one of carry or total is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationShot {
    /// 1-based data row in the source file
    pub row: usize,
    pub shot: ShotInput,
    pub measured_carry_yards: Option<f64>,
    pub measured_total_yards: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub total_rows: usize,
    pub parsed: usize,
    pub skipped: usize,
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl FlightScopeRow {
    fn into_shot(self, row: usize) -> std::result::Result<CalibrationShot, String> {
        let speed = parse_number(&self.ball_mph)
            .filter(|s| *s > 0.0)
            .ok_or_else(|| format!("missing or zero ball speed '{}'", self.ball_mph))?;
        let vla = parse_number(&self.launch_v_deg)
            .ok_or_else(|| format!("missing launch angle '{}'", self.launch_v_deg))?;
        let spin = parse_number(&self.spin_rpm)
            .filter(|s| *s >= 0.0)
            .ok_or_else(|| format!("missing spin '{}'", self.spin_rpm))?;

        let carry = parse_number(&self.carry_yd);
        let total = parse_number(&self.total_yd);
        if carry.is_none() && total.is_none() {
            return Err("no measured carry or total".to_string());
        }

        let hla = parse_direction(&self.launch_h_deg).unwrap_or(0.0);
        let axis = parse_direction(&self.spin_axis_deg).unwrap_or(0.0);

        let shot = ShotInput::from_total_spin(speed, vla, hla, spin, axis);
        shot.validate().map_err(|e| e.to_string())?;

        Ok(CalibrationShot {
            row,
            shot,
            measured_carry_yards: carry,
            measured_total_yards: total,
        })
    }
}

/// Read calibration shots from any CSV source
pub fn read_flightscope_csv<R: io::Read>(reader: R) -> Result<(Vec<CalibrationShot>, LoadStats)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut shots = Vec::new();
    let mut stats = LoadStats::default();

    for (index, record) in csv_reader.deserialize::<FlightScopeRow>().enumerate() {
        let row = index + 1;
        stats.total_rows += 1;
        let parsed = match record {
            Ok(raw) => raw.into_shot(row),
            Err(e) => Err(e.to_string()),
        };
        match parsed {
            Ok(shot) => {
                stats.parsed += 1;
                shots.push(shot);
            }
            Err(reason) => {
                stats.skipped += 1;
                warn!(row, %reason, "skipping calibration row");
            }
        }
    }

    Ok((shots, stats))
}

pub fn load_flightscope_csv(path: impl AsRef<Path>) -> Result<(Vec<CalibrationShot>, LoadStats)> {
    let file = std::fs::File::open(path.as_ref())?;
    read_flightscope_csv(io::BufReader::new(file))
}

/// Allowed distance error per shot class (yards), applied to carry and total alike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TolerancePolicy {
    pub short_game_yards: f64,
    pub power_yards: f64,
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        Self {
            short_game_yards: 3.0,
            power_yards: 10.0,
        }
    }
}

impl TolerancePolicy {
    pub fn for_regime(&self, regime: PhysicsRegime) -> f64 {
        match regime {
            PhysicsRegime::PowerShot => self.power_yards,
            _ => self.short_game_yards,
        }
    }
}

/// Prediction against measurement for one replayed shot.
///
/// Errors are predicted minus measured and are only present when the
/// matching measurement is. A shot passes when every present error is
/// within tolerance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationOutcome {
    pub row: usize,
    pub regime: PhysicsRegime,
    pub ball_speed_mph: f64,
    pub vla_deg: f64,
    pub predicted_carry_yards: f64,
    pub predicted_total_yards: f64,
    pub measured_carry_yards: Option<f64>,
    pub measured_total_yards: Option<f64>,
    pub carry_error_yards: Option<f64>,
    pub total_error_yards: Option<f64>,
    pub tolerance_yards: f64,
    pub passed: bool,
}

/// Error summary over the shots that carry one kind of measurement
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ErrorStats {
    pub samples: usize,
    pub mean_abs_error: f64,
    pub mean_signed_error: f64,
    pub max_abs_error: f64,
}

impl ErrorStats {
    fn from_errors(errors: impl Iterator<Item = f64>) -> Self {
        let mut stats = ErrorStats::default();
        let mut abs_sum = 0.0;
        let mut signed_sum = 0.0;
        for error in errors {
            stats.samples += 1;
            abs_sum += error.abs();
            signed_sum += error;
            stats.max_abs_error = stats.max_abs_error.max(error.abs());
        }
        if stats.samples > 0 {
            stats.mean_abs_error = abs_sum / stats.samples as f64;
            stats.mean_signed_error = signed_sum / stats.samples as f64;
        }
        stats
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RegimeStats {
    pub count: usize,
    pub passed: usize,
    pub carry: ErrorStats,
    pub total: ErrorStats,
}

impl RegimeStats {
    fn from_outcomes<'a>(outcomes: impl Iterator<Item = &'a CalibrationOutcome> + Clone) -> Self {
        RegimeStats {
            count: outcomes.clone().count(),
            passed: outcomes.clone().filter(|o| o.passed).count(),
            carry: ErrorStats::from_errors(outcomes.clone().filter_map(|o| o.carry_error_yards)),
            total: ErrorStats::from_errors(outcomes.filter_map(|o| o.total_error_yards)),
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.passed as f64 / self.count as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub outcomes: Vec<CalibrationOutcome>,
    pub by_regime: BTreeMap<PhysicsRegime, RegimeStats>,
    pub overall: RegimeStats,
}

impl CalibrationReport {
    fn from_outcomes(outcomes: Vec<CalibrationOutcome>) -> Self {
        let by_regime = PhysicsRegime::ALL
            .iter()
            .filter_map(|regime| {
                let stats = RegimeStats::from_outcomes(outcomes.iter().filter(|o| o.regime == *regime));
                (stats.count > 0).then_some((*regime, stats))
            })
            .collect();
        let overall = RegimeStats::from_outcomes(outcomes.iter());
        Self {
            outcomes,
            by_regime,
            overall,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CalibrationOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

/// Replays measured shots through the simulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibrationHarness {
    pub config: SimulationConfig,
    pub tolerance: TolerancePolicy,
}

impl CalibrationHarness {
    pub fn new(config: SimulationConfig, tolerance: TolerancePolicy) -> Self {
        Self { config, tolerance }
    }

    /// Simulate every shot in parallel; outcomes keep input order
    pub fn run(&self, shots: &[CalibrationShot]) -> Result<CalibrationReport> {
        let outcomes = shots
            .par_iter()
            .map(|measured| self.replay(measured))
            .collect::<Result<Vec<_>>>()?;

        let report = CalibrationReport::from_outcomes(outcomes);
        for (regime, stats) in &report.by_regime {
            info!(
                regime = %regime,
                count = stats.count,
                passed = stats.passed,
                carry_mean_abs_error = stats.carry.mean_abs_error,
                total_mean_abs_error = stats.total.mean_abs_error,
                "calibration regime summary"
            );
        }
        info!(
            count = report.overall.count,
            passed = report.overall.passed,
            carry_mean_abs_error = report.overall.carry.mean_abs_error,
            total_mean_abs_error = report.overall.total.mean_abs_error,
            "calibration complete"
        );
        Ok(report)
    }

    fn replay(&self, measured: &CalibrationShot) -> Result<CalibrationOutcome> {
        let result = TrajectorySolver::new(measured.shot, self.config)?.solve()?;
        let tolerance = self.tolerance.for_regime(result.regime);
        let carry_error = measured.measured_carry_yards.map(|carry| result.carry_yards - carry);
        let total_error = measured.measured_total_yards.map(|total| result.total_yards - total);
        let passed = carry_error
            .into_iter()
            .chain(total_error)
            .all(|error| error.abs() <= tolerance);
        Ok(CalibrationOutcome {
            row: measured.row,
            regime: result.regime,
            ball_speed_mph: measured.shot.ball_speed_mph,
            vla_deg: measured.shot.vla_deg,
            predicted_carry_yards: result.carry_yards,
            predicted_total_yards: result.total_yards,
            measured_carry_yards: measured.measured_carry_yards,
            measured_total_yards: measured.measured_total_yards,
            carry_error_yards: carry_error,
            total_error_yards: total_error,
            tolerance_yards: tolerance,
            passed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SAMPLE: &str = "\
Ball (mph),Launch V (deg),Launch H (deg),Spin (rpm),Spin Axis (deg),Carry (yd),Total (yd)
61.4,14.3,1.4 R,1059,24.1 R,45.0,-
58.6,21.6,7.5 L,1393,32.5 L,52.7,70.4
-,-,-,-,-,-,-
0,12.0,0,2000,0,10,12
74.0,8.3,4.7 L,1276,1.4 L,,75.0
45.0,22.0,0,5000,0,-,-
";

    #[test]
    fn test_reads_flightscope_rows() {
        let (shots, stats) = read_flightscope_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(stats, LoadStats { total_rows: 6, parsed: 3, skipped: 3 });
        assert_eq!(shots.len(), 3);

        assert_eq!(shots[0].measured_carry_yards, Some(45.0));
        assert_eq!(shots[0].measured_total_yards, None);

        let second = &shots[1];
        assert_eq!(second.row, 2);
        assert_eq!(second.shot.hla_deg, -7.5);
        assert_abs_diff_eq!(second.shot.spin_axis_deg(), -32.5, epsilon = 1e-9);
        assert_abs_diff_eq!(second.shot.total_spin_rpm(), 1393.0, epsilon = 1e-9);
        assert_eq!(second.measured_carry_yards, Some(52.7));
        assert_eq!(second.measured_total_yards, Some(70.4));

        assert_eq!(shots[2].row, 5);
        assert_eq!(shots[2].measured_carry_yards, None);
        assert_eq!(shots[2].measured_total_yards, Some(75.0));
    }

    #[test]
    fn test_tolerance_policy() {
        let policy = TolerancePolicy::default();
        assert_eq!(policy.for_regime(PhysicsRegime::PowerShot), 10.0);
        assert_eq!(policy.for_regime(PhysicsRegime::Wedge), 3.0);
        assert_eq!(policy.for_regime(PhysicsRegime::HighIron), 3.0);
    }

    #[test]
    fn test_report_groups_by_regime() {
        let (shots, _) = read_flightscope_csv(SAMPLE.as_bytes()).unwrap();
        let report = CalibrationHarness::default().run(&shots).unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.outcomes.iter().map(|o| o.row).collect::<Vec<_>>(), vec![1, 2, 5]);
        assert_eq!(report.by_regime[&PhysicsRegime::Wedge].count, 2);
        assert_eq!(report.by_regime[&PhysicsRegime::LowTrajectory].count, 1);
        assert!(!report.by_regime.contains_key(&PhysicsRegime::PowerShot));
        assert_eq!(report.overall.count, 3);
        assert_eq!(report.failures().count(), report.overall.count - report.overall.passed);
    }

    #[test]
    fn test_compares_carry_when_measured() {
        let (shots, _) = read_flightscope_csv(SAMPLE.as_bytes()).unwrap();
        let report = CalibrationHarness::default().run(&shots).unwrap();

        // Carry only
        let first = &report.outcomes[0];
        let carry_error = first.carry_error_yards.unwrap();
        assert_abs_diff_eq!(carry_error, first.predicted_carry_yards - 45.0, epsilon = 1e-12);
        assert_eq!(first.total_error_yards, None);
        assert_eq!(first.passed, carry_error.abs() <= first.tolerance_yards);

        // Both measured: both compared, both must pass
        let second = &report.outcomes[1];
        let carry_error = second.carry_error_yards.unwrap();
        let total_error = second.total_error_yards.unwrap();
        assert_abs_diff_eq!(carry_error, second.predicted_carry_yards - 52.7, epsilon = 1e-12);
        assert_abs_diff_eq!(total_error, second.predicted_total_yards - 70.4, epsilon = 1e-12);
        assert_eq!(
            second.passed,
            carry_error.abs() <= second.tolerance_yards && total_error.abs() <= second.tolerance_yards
        );

        // Total only
        let third = &report.outcomes[2];
        assert_eq!(third.carry_error_yards, None);
        assert!(third.total_error_yards.is_some());

        let wedge = &report.by_regime[&PhysicsRegime::Wedge];
        assert_eq!(wedge.carry.samples, 2);
        assert_eq!(wedge.total.samples, 1);
        assert_eq!(report.overall.carry.samples, 2);
        assert_eq!(report.overall.total.samples, 2);
    }

    #[test]
    fn test_regime_stats_means() {
        let make = |carry_error: Option<f64>, total_error: f64, passed: bool| CalibrationOutcome {
            row: 1,
            regime: PhysicsRegime::Wedge,
            ball_speed_mph: 60.0,
            vla_deg: 20.0,
            predicted_carry_yards: 40.0,
            predicted_total_yards: 50.0 + total_error,
            measured_carry_yards: carry_error.map(|e| 40.0 - e),
            measured_total_yards: Some(50.0),
            carry_error_yards: carry_error,
            total_error_yards: Some(total_error),
            tolerance_yards: 3.0,
            passed,
        };
        let outcomes = [make(Some(-1.0), 2.0, true), make(None, -4.0, false)];
        let stats = RegimeStats::from_outcomes(outcomes.iter());
        assert_eq!(stats.count, 2);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.total.samples, 2);
        assert_abs_diff_eq!(stats.total.mean_abs_error, 3.0);
        assert_abs_diff_eq!(stats.total.mean_signed_error, -1.0);
        assert_abs_diff_eq!(stats.total.max_abs_error, 4.0);
        assert_eq!(stats.carry.samples, 1);
        assert_abs_diff_eq!(stats.carry.mean_signed_error, -1.0);
        assert_abs_diff_eq!(stats.pass_rate(), 0.5);
    }
}
