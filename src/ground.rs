//! Ground interaction: carry snapshot, bounce, roll and stop.
//!
//! Contact is checked after every integration step. The ball keeps flying
//! through the aerodynamic step while on the ground; this module only
//! corrects its vertical state and applies restitution or turf friction.

use tracing::{debug, trace};

use crate::constants::{
    BOUNCE_THRESHOLD_MPS, GRAVITY_MPS2, GROUND_CONTACT_HEIGHT_M, MPS_TO_MPH, ROLL_STOP_SPEED_MPS,
    VERTICAL_RESTITUTION,
};
use crate::flight::{BallState, Phase};
use crate::interpolation::Curve;
use crate::regime::{PhysicsRegime, RegimeProfile};

/// Shift of the regime's bounce retention against landing horizontal speed (mph)
static LANDING_SPEED_RETENTION_OFFSET: Curve =
    Curve::new(&[(30.0, 0.08), (40.0, -0.07), (60.0, -0.27), (80.0, -0.37)]);

/// Retention scale against spin at landing (rpm); high spin checks up
static LANDING_SPIN_RETENTION: Curve = Curve::new(&[(2000.0, 1.0), (3000.0, 0.90), (5000.0, 0.70)]);

/// Outcome of one contact check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundEvent {
    /// Vertical speed reflected, horizontal speed scaled by `retention`
    Bounce { landing_speed_mph: f64, retention: f64 },
    /// Friction slowed the ball from `from_mps` to `to_mps`
    Roll { from_mps: f64, to_mps: f64 },
    Stopped,
}

/// Regime-specific bounce and roll behaviour.
#[derive(Debug, Clone, Copy)]
pub struct GroundModel {
    pub regime: PhysicsRegime,
    profile: &'static RegimeProfile,
    pub time_step_s: f64,
}

impl GroundModel {
    pub fn new(regime: PhysicsRegime, time_step_s: f64) -> Self {
        Self {
            regime,
            profile: regime.profile(),
            time_step_s,
        }
    }

    /// Horizontal velocity retention for a bounce at the given landing state
    pub fn landing_retention(&self, landing_speed_mph: f64, spin_rpm: f64) -> f64 {
        let base = self.profile.bounce_retention + LANDING_SPEED_RETENTION_OFFSET.interpolate(landing_speed_mph);
        base * LANDING_SPIN_RETENTION.interpolate(spin_rpm)
    }

    /// Rolling friction coefficient for the current spin
    pub fn rolling_friction(&self, spin_rpm: f64) -> f64 {
        self.profile.rolling_friction.interpolate(spin_rpm)
            * self.profile.friction_multiplier.interpolate(spin_rpm)
    }

    /// Resolve contact with the ground plane after an integration step.
    ///
    /// Returns `None` while the ball is above the plane or rising.
    pub fn resolve_contact(&self, state: &mut BallState) -> Option<GroundEvent> {
        if state.position.y > GROUND_CONTACT_HEIGHT_M || state.velocity.y >= 0.0 {
            return None;
        }

        if state.record_landing() {
            debug!(
                regime = %self.regime,
                carry_yards = state.carry_yards().unwrap_or_default(),
                "ball landed"
            );
        }
        state.position.y = GROUND_CONTACT_HEIGHT_M;

        if state.velocity.y.abs() > BOUNCE_THRESHOLD_MPS {
            return Some(self.bounce(state));
        }

        // A soft first touchdown still passes through bouncing
        if state.phase == Phase::Flight {
            debug!("ball bouncing");
            state.phase = Phase::Bouncing;
        }
        if state.phase != Phase::Rolling {
            debug!(from = %state.phase, "ball rolling");
            state.phase = Phase::Rolling;
            state.velocity.y = 0.0;
        }
        Some(self.roll(state))
    }

    fn bounce(&self, state: &mut BallState) -> GroundEvent {
        state.velocity.y = -state.velocity.y * VERTICAL_RESTITUTION;

        let landing_speed_mph = state.horizontal_speed_mps() * MPS_TO_MPH;
        let retention = self.landing_retention(landing_speed_mph, state.spin_rpm());
        state.velocity.x *= retention;
        state.velocity.z *= retention;

        // A skip while rolling keeps the ball in the rolling phase
        if state.phase == Phase::Flight {
            debug!("ball bouncing");
            state.phase = Phase::Bouncing;
        }
        trace!(landing_speed_mph, retention, vy = state.velocity.y, "bounce");

        GroundEvent::Bounce {
            landing_speed_mph,
            retention,
        }
    }

    fn roll(&self, state: &mut BallState) -> GroundEvent {
        let speed = state.horizontal_speed_mps();
        if speed <= ROLL_STOP_SPEED_MPS {
            debug!(total_yards = state.horizontal_distance_yards(), "ball stopped");
            state.phase = Phase::Stopped;
            return GroundEvent::Stopped;
        }

        let decel = self.rolling_friction(state.spin_rpm()) * GRAVITY_MPS2;
        // Friction can stop the ball but never reverse it
        let new_speed = (speed - decel * self.time_step_s).max(0.0);
        let scale = new_speed / speed;
        state.velocity.x *= scale;
        state.velocity.z *= scale;

        GroundEvent::Roll {
            from_mps: speed,
            to_mps: new_speed,
        }
    }
}
