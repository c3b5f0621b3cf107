//! Fixed-interval trajectory recording.
//!
//! Samples are taken every `sample_interval_s` of simulated time. Event points
//! are recorded on top of the interval grid and tagged with a `TrajectoryFlag`.

use serde::{Deserialize, Serialize};

use crate::flight::{BallState, Phase};

/// Notable events attached to a trajectory sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryFlag {
    Launch,
    Apex,
    Landing,
    Final,
}

impl TrajectoryFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrajectoryFlag::Launch => "launch",
            TrajectoryFlag::Apex => "apex",
            TrajectoryFlag::Landing => "landing",
            TrajectoryFlag::Final => "final",
        }
    }
}

/// Single trajectory sample point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time_s: f64,
    /// `[lateral, height, downrange]` in meters
    pub position_m: [f64; 3],
    pub speed_mps: f64,
    pub spin_rpm: f64,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<TrajectoryFlag>,
}

impl TrajectorySample {
    fn from_state(time_s: f64, state: &BallState) -> Self {
        Self {
            time_s,
            position_m: [state.position.x, state.position.y, state.position.z],
            speed_mps: state.speed_mps(),
            spin_rpm: state.spin_rpm(),
            phase: state.phase,
            flags: Vec::new(),
        }
    }
}

/// Collects samples at a fixed simulated-time interval plus event points.
///
/// A recorder without an interval records nothing, so the solver can always
/// feed it without branching.
#[derive(Debug, Clone)]
pub struct TrajectoryRecorder {
    interval_s: Option<f64>,
    next_sample_s: f64,
    last_vy: f64,
    samples: Vec<TrajectorySample>,
}

impl TrajectoryRecorder {
    pub fn new(interval_s: Option<f64>) -> Self {
        Self {
            interval_s: interval_s.filter(|i| *i > 0.0),
            next_sample_s: 0.0,
            last_vy: 0.0,
            samples: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval_s.is_some()
    }

    pub fn record_launch(&mut self, state: &BallState) {
        let Some(interval) = self.interval_s else {
            return;
        };
        self.push(0.0, state, Some(TrajectoryFlag::Launch));
        self.next_sample_s = interval;
        self.last_vy = state.velocity.y;
    }

    /// Observe the state after one integration step
    pub fn observe(&mut self, time_s: f64, state: &BallState, landed_now: bool) {
        let Some(interval) = self.interval_s else {
            return;
        };

        let apex = state.phase == Phase::Flight && self.last_vy > 0.0 && state.velocity.y <= 0.0;
        self.last_vy = state.velocity.y;

        if apex {
            self.push(time_s, state, Some(TrajectoryFlag::Apex));
        }
        if landed_now {
            self.push(time_s, state, Some(TrajectoryFlag::Landing));
        }
        // Tolerance absorbs drift in the accumulated step time
        if time_s + 1e-9 >= self.next_sample_s {
            self.push(time_s, state, None);
            while self.next_sample_s <= time_s + 1e-9 {
                self.next_sample_s += interval;
            }
        }
    }

    /// Record the final state and hand back every sample in time order
    pub fn finish(mut self, time_s: f64, state: &BallState) -> Vec<TrajectorySample> {
        if self.is_enabled() {
            self.push(time_s, state, Some(TrajectoryFlag::Final));
        }
        self.samples
    }

    fn push(&mut self, time_s: f64, state: &BallState, flag: Option<TrajectoryFlag>) {
        if let Some(last) = self.samples.last_mut() {
            if (last.time_s - time_s).abs() < 1e-12 {
                if let Some(flag) = flag {
                    if !last.flags.contains(&flag) {
                        last.flags.push(flag);
                    }
                }
                return;
            }
        }
        let mut sample = TrajectorySample::from_state(time_s, state);
        sample.flags.extend(flag);
        self.samples.push(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shot::ShotInput;

    fn state() -> BallState {
        BallState::launch(&ShotInput::new(100.0, 20.0, 0.0, 3000.0, 0.0), 0.0)
    }

    #[test]
    fn test_disabled_recorder_collects_nothing() {
        let mut recorder = TrajectoryRecorder::new(None);
        let s = state();
        recorder.record_launch(&s);
        recorder.observe(0.5, &s, true);
        assert!(recorder.finish(1.0, &s).is_empty());
    }

    #[test]
    fn test_interval_sampling_and_events() {
        let mut recorder = TrajectoryRecorder::new(Some(0.1));
        let mut s = state();
        recorder.record_launch(&s);

        let dt = 0.025;
        let mut t = 0.0;
        for i in 1..=20 {
            t += dt;
            if i == 10 {
                s.velocity.y = -1.0;
            }
            recorder.observe(t, &s, i == 15);
        }
        let samples = recorder.finish(t, &s);

        let times: Vec<f64> = samples.iter().map(|p| (p.time_s * 1000.0).round() / 1000.0).collect();
        assert_eq!(times, vec![0.0, 0.1, 0.2, 0.25, 0.3, 0.375, 0.4, 0.5]);
        assert_eq!(samples[0].flags, vec![TrajectoryFlag::Launch]);
        assert_eq!(samples[3].flags, vec![TrajectoryFlag::Apex]);
        assert_eq!(samples[5].flags, vec![TrajectoryFlag::Landing]);
        assert_eq!(samples.last().map(|p| p.flags.clone()), Some(vec![TrajectoryFlag::Final]));
    }
}
