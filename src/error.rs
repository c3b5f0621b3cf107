use thiserror::Error;

/// Errors surfaced by the flight engine and its calibration tooling.
#[derive(Debug, Error)]
pub enum FlightError {
    #[error("invalid shot input: {field} {reason}")]
    InvalidShotInput { field: &'static str, reason: String },

    #[error(
        "simulation did not come to rest within {elapsed_s:.2}s \
         (best carry {best_carry_yards:.1} yd, best total {best_total_yards:.1} yd)"
    )]
    SimulationTimeout {
        elapsed_s: f64,
        best_carry_yards: f64,
        best_total_yards: f64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("simulation worker disconnected")]
    WorkerDisconnected,

    #[error("simulation cancelled after {elapsed_s:.3}s")]
    Cancelled { elapsed_s: f64 },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlightError {
    pub(crate) fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidShotInput { field, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, FlightError>;
