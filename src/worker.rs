//! Background simulation thread.
//!
//! Keeps trajectory integration off the caller's thread: shots are submitted
//! over a channel and results polled without blocking. Each job carries its
//! own cancellation flag, checked by the solver between timesteps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::debug;

use crate::error::{FlightError, Result};
use crate::shot::ShotInput;
use crate::trajectory_solver::{ShotResult, SimulationConfig, TrajectorySolver};

struct Job {
    id: u64,
    shot: ShotInput,
    cancel: Arc<AtomicBool>,
}

/// Finished job as delivered back to the submitting thread
#[derive(Debug)]
pub struct SimulationResponse {
    pub id: u64,
    pub result: Result<ShotResult>,
}

/// Handle to a submitted shot
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub id: u64,
    cancel: Arc<AtomicBool>,
}

impl JobHandle {
    /// Ask the worker to abandon this shot at the next timestep
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

pub struct SimulationWorker {
    req_tx: Option<mpsc::Sender<Job>>,
    result_rx: mpsc::Receiver<SimulationResponse>,
    handle: Option<JoinHandle<()>>,
    next_id: u64,
}

impl SimulationWorker {
    /// Start a worker thread that simulates every shot with `config`
    pub fn spawn(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let (req_tx, req_rx) = mpsc::channel::<Job>();
        let (result_tx, result_rx) = mpsc::channel::<SimulationResponse>();

        let handle = std::thread::Builder::new()
            .name("flight-sim".into())
            .spawn(move || {
                while let Ok(job) = req_rx.recv() {
                    let result = if job.cancel.load(Ordering::Relaxed) {
                        Err(FlightError::Cancelled { elapsed_s: 0.0 })
                    } else {
                        TrajectorySolver::new(job.shot, config)
                            .and_then(|solver| solver.solve_with_cancel(&job.cancel))
                    };
                    debug!(id = job.id, ok = result.is_ok(), "worker finished shot");
                    if result_tx.send(SimulationResponse { id: job.id, result }).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            req_tx: Some(req_tx),
            result_rx,
            handle: Some(handle),
            next_id: 0,
        })
    }

    /// Queue a shot; results come back in submission order
    pub fn submit(&mut self, shot: ShotInput) -> Result<JobHandle> {
        let sender = self.req_tx.as_ref().ok_or(FlightError::WorkerDisconnected)?;
        let id = self.next_id;
        self.next_id += 1;
        let cancel = Arc::new(AtomicBool::new(false));
        sender
            .send(Job {
                id,
                shot,
                cancel: Arc::clone(&cancel),
            })
            .map_err(|_| FlightError::WorkerDisconnected)?;
        Ok(JobHandle { id, cancel })
    }

    /// Non-blocking: return whatever results are ready
    pub fn poll_completed(&self) -> Vec<SimulationResponse> {
        let mut results = Vec::new();
        while let Ok(response) = self.result_rx.try_recv() {
            results.push(response);
        }
        results
    }

    /// Block until the next result arrives
    pub fn recv(&self) -> Result<SimulationResponse> {
        self.result_rx.recv().map_err(|_| FlightError::WorkerDisconnected)
    }

    /// Block for at most `timeout`; `Ok(None)` if nothing finished in time
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<SimulationResponse>> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(response) => Ok(Some(response)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(FlightError::WorkerDisconnected),
        }
    }
}

impl Drop for SimulationWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.req_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regime::PhysicsRegime;

    #[test]
    fn test_worker_round_trip() {
        let mut worker = SimulationWorker::spawn(SimulationConfig::default()).unwrap();
        let wedge = worker.submit(ShotInput::new(45.0, 22.0, 0.0, 5000.0, 0.0)).unwrap();
        let power = worker.submit(ShotInput::new(120.0, 14.0, 0.0, 4500.0, 0.0)).unwrap();
        assert_eq!((wedge.id, power.id), (0, 1));

        let first = worker.recv().unwrap();
        let second = worker.recv().unwrap();
        assert_eq!(first.id, 0);
        assert_eq!(first.result.unwrap().regime, PhysicsRegime::Wedge);
        assert_eq!(second.id, 1);
        assert_eq!(second.result.unwrap().regime, PhysicsRegime::PowerShot);
        assert!(worker.poll_completed().is_empty());
    }

    #[test]
    fn test_worker_matches_direct_solve() {
        let shot = ShotInput::from_total_spin(82.0, 16.0, 0.0, 3500.0, 0.0);
        let direct = TrajectorySolver::new(shot, SimulationConfig::default())
            .unwrap()
            .solve()
            .unwrap();

        let mut worker = SimulationWorker::spawn(SimulationConfig::default()).unwrap();
        worker.submit(shot).unwrap();
        let response = worker.recv_timeout(Duration::from_secs(30)).unwrap().unwrap();
        assert_eq!(response.result.unwrap(), direct);
    }

    #[test]
    fn test_invalid_shot_is_reported_not_fatal() {
        let mut worker = SimulationWorker::spawn(SimulationConfig::default()).unwrap();
        worker.submit(ShotInput::new(-1.0, 10.0, 0.0, 3000.0, 0.0)).unwrap();
        worker.submit(ShotInput::new(100.0, 12.0, 0.0, 3000.0, 0.0)).unwrap();
        assert!(matches!(
            worker.recv().unwrap().result,
            Err(FlightError::InvalidShotInput { .. })
        ));
        assert!(worker.recv().unwrap().result.is_ok());
    }

    #[test]
    fn test_cancelled_job() {
        let mut worker = SimulationWorker::spawn(SimulationConfig::default()).unwrap();
        let handle = {
            // Keep the worker busy so the second job is still queued when cancelled
            worker.submit(ShotInput::new(165.0, 11.0, 0.0, 2400.0, 10.0)).unwrap();
            worker.submit(ShotInput::new(150.0, 10.0, 0.0, 2700.0, 0.0)).unwrap()
        };
        handle.cancel();

        let first = worker.recv().unwrap();
        let second = worker.recv().unwrap();
        assert!(first.result.is_ok() || matches!(first.result, Err(FlightError::Cancelled { .. })));
        assert_eq!(second.id, handle.id);
        assert!(matches!(second.result, Err(FlightError::Cancelled { .. })));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimulationConfig {
            max_time_s: -1.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            SimulationWorker::spawn(config),
            Err(FlightError::InvalidConfig(_))
        ));
    }
}
