//! # Golf Flight Engine
//!
//! Golf ball flight, bounce and roll simulation. Each shot is classified into
//! one of five physics regimes from its launch speed and angle; the regime
//! selects drag, lift and ground-contact parameters tuned against
//! launch-monitor measurements.

// Re-export the main types and functions
pub use atmosphere::AtmosphericConditions;
pub use calibration::{
    load_flightscope_csv, read_flightscope_csv, CalibrationHarness, CalibrationOutcome,
    CalibrationReport, CalibrationShot, ErrorStats, LoadStats, RegimeStats, TolerancePolicy,
};
pub use empirical::FlightModel;
pub use error::{FlightError, Result};
pub use flight::{BallState, Phase};
pub use putting::{PuttResult, PuttSolver};
pub use regime::PhysicsRegime;
pub use shot::{parse_direction, LaunchRecord, ShotInput};
pub use trajectory_sampling::{TrajectoryFlag, TrajectorySample};
pub use trajectory_solver::{
    simulate, simulate_batch, ShotResult, SimulationConfig, SimulationStatus, TrajectorySolver,
};
pub use worker::{JobHandle, SimulationResponse, SimulationWorker};

// Module declarations
pub mod aerodynamics;
pub mod atmosphere;
pub mod calibration;
pub mod constants;
pub mod empirical;
pub mod error;
pub mod flight;
pub mod ground;
pub mod interpolation;
pub mod putting;
pub mod regime;
pub mod shot;
pub mod spin_decay;
pub mod trajectory_sampling;
pub mod trajectory_solver;
pub mod worker;
