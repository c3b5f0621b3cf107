use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use golf_flight_engine::constants::{
    DEFAULT_MAX_TIME_S, DEFAULT_TIME_STEP_S, GRAVITY_MPS2, MAGNUS_CONST, STANDARD_AIR_DENSITY_LB_FT3,
};
use golf_flight_engine::{
    load_flightscope_csv, simulate_batch, CalibrationHarness, CalibrationReport, ErrorStats,
    FlightModel, LaunchRecord, PhysicsRegime, PuttResult, PuttSolver, RegimeStats, ShotInput,
    ShotResult, SimulationConfig, TolerancePolicy, TrajectorySolver,
};

#[derive(Parser)]
#[command(name = "golf-flight")]
#[command(author = "Golf Flight Engine Team")]
#[command(version = "0.1.0")]
#[command(about = "Golf ball flight, bounce and roll simulator", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Clone)]
struct SimulationArgs {
    /// JSON simulation config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Flight model (physics, empirical-driver, empirical)
    #[arg(long, value_parser = parse_model)]
    model: Option<FlightModel>,

    /// Time step (seconds)
    #[arg(long)]
    time_step: Option<f64>,

    /// Simulated-time budget (seconds)
    #[arg(long)]
    max_time: Option<f64>,

    /// Ball height at launch in meters [default: 3.146]
    #[arg(long)]
    launch_height: Option<f64>,

    /// Temperature (Celsius)
    #[arg(long)]
    temperature: Option<f64>,

    /// Station pressure (hPa); derived from altitude when omitted
    #[arg(long)]
    pressure: Option<f64>,

    /// Humidity (percentage 0-100)
    #[arg(long)]
    humidity: Option<f64>,

    /// Altitude (meters)
    #[arg(long)]
    altitude: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a single shot
    Simulate {
        /// Ball speed (mph)
        #[arg(short = 's', long)]
        speed: f64,

        /// Vertical launch angle (degrees, negative for a downward launch)
        #[arg(short = 'a', long, allow_hyphen_values = true)]
        vla: f64,

        /// Horizontal launch angle (degrees, positive right)
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        hla: f64,

        /// Total spin (rpm)
        #[arg(long, default_value = "0.0")]
        spin: f64,

        /// Spin axis (degrees, positive tilts right)
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        spin_axis: f64,

        /// Backspin (rpm); use with --sidespin instead of --spin/--spin-axis
        #[arg(long, conflicts_with_all = ["spin", "spin_axis"])]
        backspin: Option<f64>,

        /// Sidespin (rpm, positive curves right)
        #[arg(long, requires = "backspin", allow_hyphen_values = true)]
        sidespin: Option<f64>,

        #[command(flatten)]
        sim: SimulationArgs,

        /// Record trajectory samples every N seconds
        #[arg(long)]
        samples: Option<f64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Simulate every shot in a CSV file
    Batch {
        /// CSV with ball_speed, vla, hla, total_spin, spin_axis (or backspin, sidespin) columns
        #[arg(short = 'i', long)]
        input: PathBuf,

        #[command(flatten)]
        sim: SimulationArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "csv")]
        output: OutputFormat,
    },

    /// Compare simulated totals against a FlightScope export
    Calibrate {
        /// FlightScope CSV export
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Allowed error for wedge, low-trajectory and iron shots (yards)
        #[arg(long, default_value = "3.0")]
        short_game_tolerance: f64,

        /// Allowed error for power shots (yards)
        #[arg(long, default_value = "10.0")]
        power_tolerance: f64,

        #[command(flatten)]
        sim: SimulationArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Roll a putt on a green of given Stimpmeter speed
    Putt {
        /// Ball speed (mph)
        #[arg(short = 's', long)]
        speed: f64,

        /// Green speed (Stimpmeter feet)
        #[arg(long, default_value = "10.0")]
        stimp: f64,

        /// Horizontal launch angle (degrees, positive right)
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        hla: f64,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Display physics regimes and model constants
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

fn parse_model(raw: &str) -> Result<FlightModel, String> {
    raw.parse()
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn build_config(args: &SimulationArgs) -> Result<SimulationConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "loading simulation config");
            SimulationConfig::from_json_file(path)?
        }
        None => SimulationConfig::default(),
    };

    if let Some(model) = args.model {
        config.flight_model = model;
    }
    if let Some(step) = args.time_step {
        config.time_step_s = step;
    }
    if let Some(max_time) = args.max_time {
        config.max_time_s = max_time;
    }
    if let Some(height) = args.launch_height {
        config.launch_height_m = height;
    }
    if let Some(temperature) = args.temperature {
        config.atmosphere.temperature_c = temperature;
    }
    if let Some(pressure) = args.pressure {
        config.atmosphere.pressure_hpa = Some(pressure);
    }
    if let Some(humidity) = args.humidity {
        config.atmosphere.humidity_percent = humidity;
    }
    if let Some(altitude) = args.altitude {
        config.atmosphere.altitude_m = altitude;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Simulate {
            speed, vla, hla, spin, spin_axis, backspin, sidespin,
            sim, samples, output,
        } => {
            let mut config = build_config(&sim)?;
            if samples.is_some() {
                config.sample_interval_s = samples;
                config.validate()?;
            }

            let shot = match backspin {
                Some(back) => ShotInput::new(speed, vla, hla, back, sidespin.unwrap_or(0.0)),
                None => ShotInput::from_total_spin(speed, vla, hla, spin, spin_axis),
            };
            let solver = TrajectorySolver::new(shot, config)?;
            let result = solver.solve()?;
            if !result.is_completed() {
                warn!(
                    elapsed_s = result.elapsed_s,
                    "ball still moving at the time budget; distances are the best so far"
                );
            }

            display_shot_result(&shot, &result, output)?;
        },

        Commands::Batch { input, sim, output } => {
            let config = build_config(&sim)?;
            let records = read_launch_records(&input)?;
            info!(count = records.len(), "loaded batch shots");

            let mut shots = Vec::with_capacity(records.len());
            let mut rows = Vec::with_capacity(records.len());
            for (index, record) in records.iter().enumerate() {
                match ShotInput::from_record(record) {
                    Ok(shot) => {
                        rows.push(BatchRow::pending(index + 1, &shot));
                        shots.push(shot);
                    }
                    Err(e) => {
                        warn!(row = index + 1, error = %e, "skipping batch row");
                        rows.push(BatchRow::failed(index + 1, record, e.to_string()));
                    }
                }
            }

            let mut results = simulate_batch(&shots, &config).into_iter();
            for row in rows.iter_mut().filter(|r| r.error.is_none()) {
                match results.next() {
                    Some(Ok(result)) => row.fill(&result),
                    Some(Err(e)) => row.error = Some(e.to_string()),
                    None => row.error = Some("no result".to_string()),
                }
            }

            display_batch(&rows, output)?;
        },

        Commands::Calibrate {
            input, short_game_tolerance, power_tolerance, sim, output,
        } => {
            let config = build_config(&sim)?;
            let (shots, stats) = load_flightscope_csv(&input)?;
            info!(
                total_rows = stats.total_rows,
                parsed = stats.parsed,
                skipped = stats.skipped,
                "loaded calibration shots"
            );

            let tolerance = TolerancePolicy {
                short_game_yards: short_game_tolerance,
                power_yards: power_tolerance,
            };
            let report = CalibrationHarness::new(config, tolerance).run(&shots)?;
            display_calibration(&report, stats.skipped, output)?;
        },

        Commands::Putt { speed, stimp, hla, output } => {
            let solver = PuttSolver::new(stimp)?;
            let result = solver.roll(speed, hla)?;
            display_putt(&result, stimp, output)?;
        },

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║      GOLF FLIGHT ENGINE v0.1.0         ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Regime-based golf ball flight, bounce  ║");
            println!("║ and roll simulation.                   ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Physics regimes:                       ║");
            for regime in PhysicsRegime::ALL {
                println!("║ • {:<36} ║", regime.as_str());
            }
            println!("╠════════════════════════════════════════╣");
            println!("║ Time step:         {:>8.4} s          ║", DEFAULT_TIME_STEP_S);
            println!("║ Time budget:       {:>8.1} s          ║", DEFAULT_MAX_TIME_S);
            println!("║ Air density:       {:>8.4} lb/ft³     ║", STANDARD_AIR_DENSITY_LB_FT3);
            println!("║ Magnus constant:   {:>8.5}            ║", MAGNUS_CONST);
            println!("║ Gravity:           {:>8.2} m/s²       ║", GRAVITY_MPS2);
            println!("╚════════════════════════════════════════╝");
            println!();
            for regime in PhysicsRegime::ALL {
                println!("{:<15} {}", regime.as_str(), regime.description());
            }
        }
    }

    Ok(())
}

fn read_launch_records(path: &Path) -> Result<Vec<LaunchRecord>, Box<dyn Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

#[derive(Debug, Serialize)]
struct BatchRow {
    row: usize,
    ball_speed_mph: f64,
    vla_deg: f64,
    hla_deg: f64,
    total_spin_rpm: f64,
    spin_axis_deg: f64,
    regime: Option<PhysicsRegime>,
    carry_yards: Option<f64>,
    roll_yards: Option<f64>,
    total_yards: Option<f64>,
    lateral_yards: Option<f64>,
    apex_m: Option<f64>,
    flight_time_s: Option<f64>,
    completed: Option<bool>,
    error: Option<String>,
}

impl BatchRow {
    fn pending(row: usize, shot: &ShotInput) -> Self {
        Self {
            row,
            ball_speed_mph: shot.ball_speed_mph,
            vla_deg: shot.vla_deg,
            hla_deg: shot.hla_deg,
            total_spin_rpm: shot.total_spin_rpm(),
            spin_axis_deg: shot.spin_axis_deg(),
            regime: None,
            carry_yards: None,
            roll_yards: None,
            total_yards: None,
            lateral_yards: None,
            apex_m: None,
            flight_time_s: None,
            completed: None,
            error: None,
        }
    }

    fn failed(row: usize, record: &LaunchRecord, error: String) -> Self {
        let shot = ShotInput::new(record.ball_speed, record.vla, record.hla, 0.0, 0.0);
        Self {
            total_spin_rpm: record.total_spin.unwrap_or(0.0),
            spin_axis_deg: record.spin_axis.unwrap_or(0.0),
            error: Some(error),
            ..Self::pending(row, &shot)
        }
    }

    fn fill(&mut self, result: &ShotResult) {
        self.regime = Some(result.regime);
        self.carry_yards = Some(result.carry_yards);
        self.roll_yards = Some(result.roll_yards);
        self.total_yards = Some(result.total_yards);
        self.lateral_yards = Some(result.lateral_yards);
        self.apex_m = Some(result.apex_m);
        self.flight_time_s = Some(result.flight_time_s);
        self.completed = Some(result.is_completed());
    }
}

#[derive(Debug, Serialize)]
struct ShotReport<'a> {
    shot: &'a ShotInput,
    result: &'a ShotResult,
}

fn display_shot_result(shot: &ShotInput, result: &ShotResult, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ShotReport { shot, result })?);
        },

        OutputFormat::Csv => {
            if result.samples.is_empty() {
                println!("regime,carry_yards,roll_yards,total_yards,lateral_yards,apex_m,flight_time_s,bounces,status");
                println!("{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.3},{},{}",
                    result.regime, result.carry_yards, result.roll_yards, result.total_yards,
                    result.lateral_yards, result.apex_m, result.flight_time_s,
                    result.bounce_count, if result.is_completed() { "completed" } else { "timed_out" });
            } else {
                println!("time,x,y,z,speed,spin,phase");
                for p in &result.samples {
                    println!("{:.3},{:.3},{:.3},{:.3},{:.3},{:.0},{}",
                        p.time_s, p.position_m[0], p.position_m[1], p.position_m[2],
                        p.speed_mps, p.spin_rpm, p.phase);
                }
            }
        },

        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║             SHOT RESULTS               ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Regime:            {:<19} ║", result.regime.as_str());
            println!("║ Model:             {:<19} ║", result.model.as_str());
            println!("║ Ball Speed:        {:>8.1} mph        ║", shot.ball_speed_mph);
            println!("║ Launch Angle:      {:>8.1} °          ║", shot.vla_deg);
            println!("║ Total Spin:        {:>8.0} rpm        ║", shot.total_spin_rpm());
            println!("╠════════════════════════════════════════╣");
            println!("║ Carry:             {:>8.2} yd         ║", result.carry_yards);
            println!("║ Roll:              {:>8.2} yd         ║", result.roll_yards);
            println!("║ Total:             {:>8.2} yd         ║", result.total_yards);
            println!("║ Lateral:           {:>8.2} yd         ║", result.lateral_yards);
            println!("║ Apex:              {:>8.2} m          ║", result.apex_m);
            println!("║ Flight Time:       {:>8.3} s          ║", result.flight_time_s);
            println!("║ Bounces:           {:>8}            ║", result.bounce_count);
            println!("║ Final Phase:       {:<19} ║", result.final_phase.to_string());
            println!("╚════════════════════════════════════════╝");

            if !result.samples.is_empty() {
                println!("\nTrajectory Samples:");
                println!("┌──────────┬──────────┬──────────┬──────────┬──────────┐");
                println!("│ Time (s) │  X (m)   │  Y (m)   │  Z (m)   │ Vel(m/s) │");
                println!("├──────────┼──────────┼──────────┼──────────┼──────────┤");
                for p in &result.samples {
                    println!("│ {:>8.3} │ {:>8.2} │ {:>8.2} │ {:>8.2} │ {:>8.2} │",
                        p.time_s, p.position_m[0], p.position_m[1], p.position_m[2], p.speed_mps);
                }
                println!("└──────────┴──────────┴──────────┴──────────┴──────────┘");
            }
        },
    }

    Ok(())
}

fn display_batch(rows: &[BatchRow], format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        },

        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        },

        OutputFormat::Table => {
            println!("┌──────┬────────┬────────┬────────────────┬──────────┬──────────┐");
            println!("│  Row │  Speed │    VLA │ Regime         │ Carry yd │ Total yd │");
            println!("├──────┼────────┼────────┼────────────────┼──────────┼──────────┤");
            for row in rows {
                match (&row.regime, row.carry_yards, row.total_yards) {
                    (Some(regime), Some(carry), Some(total)) => {
                        println!("│ {:>4} │ {:>6.1} │ {:>6.1} │ {:<14} │ {:>8.2} │ {:>8.2} │",
                            row.row, row.ball_speed_mph, row.vla_deg, regime.as_str(), carry, total);
                    }
                    _ => {
                        println!("│ {:>4} │ {:>6.1} │ {:>6.1} │ {:<14} │ {:>8} │ {:>8} │",
                            row.row, row.ball_speed_mph, row.vla_deg, "error", "-", "-");
                    }
                }
            }
            println!("└──────┴────────┴────────┴────────────────┴──────────┴──────────┘");
        },
    }

    Ok(())
}

fn display_calibration(report: &CalibrationReport, skipped: usize, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        },

        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            for outcome in &report.outcomes {
                writer.serialize(outcome)?;
            }
            writer.flush()?;
        },

        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║         CALIBRATION SUMMARY            ║");
            println!("║         {:>4} shots, {:>4} skipped       ║", report.overall.count, skipped);
            println!("╚════════════════════════════════════════╝");
            println!("┌────────────────┬───────┬────────┬──────────┬──────────┬──────────┬──────────┐");
            println!("│ Regime         │ Shots │ Passed │ Carry |e|│ Carry e  │ Total |e|│ Total e  │");
            println!("├────────────────┼───────┼────────┼──────────┼──────────┼──────────┼──────────┤");
            for (regime, stats) in &report.by_regime {
                print_regime_stats(regime.as_str(), stats);
            }
            println!("├────────────────┼───────┼────────┼──────────┼──────────┼──────────┼──────────┤");
            print_regime_stats("overall", &report.overall);
            println!("└────────────────┴───────┴────────┴──────────┴──────────┴──────────┴──────────┘");

            let failures: Vec<_> = report.failures().collect();
            if !failures.is_empty() {
                println!("\nOutside tolerance:");
                for outcome in failures {
                    if let (Some(measured), Some(error)) = (outcome.measured_carry_yards, outcome.carry_error_yards) {
                        println!("  row {:>4}  {:<14} carry predicted {:>7.2} yd  measured {:>7.2} yd  ({:+.2})",
                            outcome.row, outcome.regime.as_str(), outcome.predicted_carry_yards, measured, error);
                    }
                    if let (Some(measured), Some(error)) = (outcome.measured_total_yards, outcome.total_error_yards) {
                        println!("  row {:>4}  {:<14} total predicted {:>7.2} yd  measured {:>7.2} yd  ({:+.2})",
                            outcome.row, outcome.regime.as_str(), outcome.predicted_total_yards, measured, error);
                    }
                }
            }
        },
    }

    Ok(())
}

fn print_regime_stats(label: &str, stats: &RegimeStats) {
    let cell = |errors: &ErrorStats, value: f64| {
        if errors.samples == 0 { "-".to_string() } else { format!("{:.2}", value) }
    };
    println!("│ {:<14} │ {:>5} │ {:>6} │ {:>8} │ {:>8} │ {:>8} │ {:>8} │",
        label, stats.count, stats.passed,
        cell(&stats.carry, stats.carry.mean_abs_error), cell(&stats.carry, stats.carry.mean_signed_error),
        cell(&stats.total, stats.total.mean_abs_error), cell(&stats.total, stats.total.mean_signed_error));
}

fn display_putt(result: &PuttResult, stimp: f64, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        },

        OutputFormat::Csv => {
            println!("stimp_ft,distance_ft,distance_yards,lateral_ft,time_s,friction");
            println!("{:.1},{:.2},{:.2},{:.2},{:.3},{:.4}",
                stimp, result.distance_ft, result.distance_yards,
                result.lateral_ft, result.time_s, result.friction);
        },

        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║             PUTT RESULTS               ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Green Speed:       {:>8.1} ft         ║", stimp);
            println!("║ Friction:          {:>8.4}            ║", result.friction);
            println!("║ Distance:          {:>8.2} ft         ║", result.distance_ft);
            println!("║ Lateral:           {:>8.2} ft         ║", result.lateral_ft);
            println!("║ Roll Time:         {:>8.2} s          ║", result.time_s);
            println!("╚════════════════════════════════════════╝");
        },
    }

    Ok(())
}
