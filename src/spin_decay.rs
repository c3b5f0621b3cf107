//! Spin decay for a golf ball in flight and on the ground
//!
//! Spin magnitude decays exponentially with a fixed time constant; the spin
//! axis never changes. The same law runs through flight, bounce and roll.

use crate::constants::SPIN_DECAY_TIME_CONSTANT_S;

/// Parameters affecting spin decay rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinDecayParameters {
    /// e-folding time of the spin rate in seconds
    pub time_constant_s: f64,
}

impl SpinDecayParameters {
    pub fn new() -> Self {
        Self {
            time_constant_s: SPIN_DECAY_TIME_CONSTANT_S,
        }
    }

    /// Multiplicative factor applied to spin over one step of `dt` seconds
    #[inline]
    pub fn step_factor(&self, dt: f64) -> f64 {
        if dt <= 0.0 || self.time_constant_s <= 0.0 {
            return 1.0;
        }
        (-dt / self.time_constant_s).exp()
    }
}

impl Default for SpinDecayParameters {
    fn default() -> Self {
        Self::new()
    }
}

/// Spin rate after one integration step.
///
/// The factor is never above 1.0, so spin is non-increasing across steps.
#[inline]
pub fn update_spin_rate(spin_rad_s: f64, dt: f64, params: &SpinDecayParameters) -> f64 {
    spin_rad_s * params.step_factor(dt)
}
