//! Regression checks against recorded model output and measured launch-monitor shots.

use golf_flight_engine::{
    load_flightscope_csv, CalibrationHarness, PhysicsRegime, ShotInput, SimulationConfig,
    TolerancePolicy, TrajectorySolver,
};
use serde::Deserialize;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[derive(Debug, Deserialize)]
struct BaselineRow {
    ball_speed: f64,
    vla: f64,
    hla: f64,
    total_spin: f64,
    spin_axis: f64,
    regime: PhysicsRegime,
    carry: f64,
    total: f64,
    lateral: f64,
}

#[test]
fn test_model_baseline() {
    let mut reader = csv::Reader::from_path(fixture("model_baseline.csv")).unwrap();
    let mut checked = 0;

    for row in reader.deserialize::<BaselineRow>() {
        let row = row.unwrap();
        let shot = ShotInput::from_total_spin(row.ball_speed, row.vla, row.hla, row.total_spin, row.spin_axis);
        let result = TrajectorySolver::new(shot, SimulationConfig::default())
            .unwrap()
            .solve()
            .unwrap();

        assert_eq!(result.regime, row.regime, "regime for {:?}", row);
        assert!(result.is_completed(), "timed out: {:?}", row);
        assert!(
            (result.carry_yards - row.carry).abs() < 0.5,
            "carry {:.2} vs baseline {:.2} for {:?}", result.carry_yards, row.carry, row
        );
        assert!(
            (result.total_yards - row.total).abs() < 0.5,
            "total {:.2} vs baseline {:.2} for {:?}", result.total_yards, row.total, row
        );
        assert!(
            (result.lateral_yards - row.lateral).abs() < 0.5,
            "lateral {:.2} vs baseline {:.2} for {:?}", result.lateral_yards, row.lateral, row
        );
        assert!(result.total_yards >= result.carry_yards);
        checked += 1;
    }

    assert_eq!(checked, 16);
}

#[test]
fn test_every_regime_is_covered_by_baseline() {
    let mut reader = csv::Reader::from_path(fixture("model_baseline.csv")).unwrap();
    let regimes: Vec<PhysicsRegime> = reader
        .deserialize::<BaselineRow>()
        .map(|row| row.unwrap().regime)
        .collect();
    for regime in PhysicsRegime::ALL {
        assert!(regimes.contains(&regime), "no baseline shot for {regime}");
    }
}

#[test]
fn test_tuned_totals_from_tee_height() {
    // Totals the regime tables were tuned to, launched from the default tee height
    let cases = [
        (45.0, 22.0, 5000.0, 47.68),
        (82.0, 16.0, 3500.0, 111.50),
        (150.3, 9.9, 2704.0, 175.67),
        (74.0, 8.3, 1276.0, 75.18),
    ];
    assert_eq!(SimulationConfig::default().launch_height_m, 3.146);
    for (speed, vla, spin, tuned_total) in cases {
        let result = TrajectorySolver::new(ShotInput::new(speed, vla, 0.0, spin, 0.0), SimulationConfig::default())
            .unwrap()
            .solve()
            .unwrap();
        assert!(
            (result.total_yards - tuned_total).abs() < 3.0,
            "total {:.2} vs tuned {:.2} for {} mph / {} deg", result.total_yards, tuned_total, speed, vla
        );
    }
}

#[test]
fn test_measured_shots_calibration() {
    let (shots, stats) = load_flightscope_csv(fixture("measured_shots.csv")).unwrap();
    assert_eq!(stats.total_rows, 12);
    assert_eq!(stats.parsed, 11);
    assert_eq!(stats.skipped, 1);
    assert!(shots.iter().all(|s| s.measured_carry_yards.is_some() && s.measured_total_yards.is_none()));

    let report = CalibrationHarness::new(SimulationConfig::default(), TolerancePolicy::default())
        .run(&shots)
        .unwrap();

    assert_eq!(report.outcomes.len(), 11);
    assert_eq!(report.overall.carry.samples, 11);
    assert_eq!(report.overall.total.samples, 0);
    assert!(
        report.overall.carry.mean_abs_error < 10.0,
        "mean carry error {:.2}", report.overall.carry.mean_abs_error
    );

    assert_eq!(report.by_regime[&PhysicsRegime::Wedge].count, 6);
    assert_eq!(report.by_regime[&PhysicsRegime::HighIron].count, 4);
    assert_eq!(report.by_regime[&PhysicsRegime::LowTrajectory].count, 1);

    // These rows are the short-game misses: the model comes up short on carry
    assert!(report.overall.carry.mean_signed_error < 0.0);
    for outcome in &report.outcomes {
        let measured = outcome.measured_carry_yards.unwrap();
        let error = outcome.carry_error_yards.unwrap();
        assert!((error - (outcome.predicted_carry_yards - measured)).abs() < 1e-12);
        assert_eq!(outcome.total_error_yards, None);
        assert_eq!(outcome.passed, error.abs() <= outcome.tolerance_yards);
        assert!(outcome.predicted_total_yards >= outcome.predicted_carry_yards);
    }
}

#[test]
fn test_looser_tolerance_passes_more_shots() {
    let (shots, _) = load_flightscope_csv(fixture("measured_shots.csv")).unwrap();
    let strict = CalibrationHarness::default().run(&shots).unwrap();
    let loose = CalibrationHarness::new(
        SimulationConfig::default(),
        TolerancePolicy {
            short_game_yards: 12.0,
            power_yards: 12.0,
        },
    )
    .run(&shots)
    .unwrap();

    assert!(loose.overall.passed > strict.overall.passed);
    assert_eq!(loose.overall.passed, 11);
}
