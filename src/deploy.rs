//! Deployment decision: maps the operating mode to the spring's deploy
//! target, with retract hysteresis.

use crate::params::{Mode, RetractHysteresis};

/// Maps mode changes to a deploy/retract target.
///
/// Entering an engaged mode deploys immediately. Leaving one arms a
/// retract deadline on the frame clock; any mode change before it expires
/// cancels it, so a brief dip back to idle never visibly retracts the
/// group. A deadline observed after being superseded is a no-op by
/// construction (it no longer exists).
pub struct DeploymentController {
    hysteresis: RetractHysteresis,
    deployed: bool,
    /// Frame-clock time at which to retract, if a retract is pending
    retract_at: Option<f32>,
}

impl DeploymentController {
    pub fn new(hysteresis: RetractHysteresis) -> Self {
        Self {
            hysteresis,
            deployed: false,
            retract_at: None,
        }
    }

    /// Record a mode change at frame-clock time `now` (seconds)
    pub fn set_mode(&mut self, mode: Mode, now: f32) {
        // Every mode change cancels a pending retract
        self.retract_at = None;
        if mode.is_engaged() {
            self.deployed = true;
        } else if self.deployed {
            self.retract_at = Some(now + self.hysteresis.hold_secs);
        }
    }

    /// Advance to frame-clock time `now` and return the deploy target
    pub fn update(&mut self, now: f32) -> bool {
        if let Some(deadline) = self.retract_at {
            if now >= deadline {
                self.deployed = false;
                self.retract_at = None;
            }
        }
        self.deployed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> DeploymentController {
        DeploymentController::new(RetractHysteresis::default())
    }

    #[test]
    fn engaged_mode_deploys_immediately() {
        let mut c = controller();
        assert!(!c.update(0.0));
        c.set_mode(Mode::Listening, 0.0);
        assert!(c.update(0.0));
        c.set_mode(Mode::Transmitting, 1.0);
        assert!(c.update(1.0));
    }

    #[test]
    fn brief_idle_dip_never_retracts() {
        let mut c = controller();
        c.set_mode(Mode::Listening, 0.0);
        c.set_mode(Mode::Idle, 1.0);
        // Still deployed during the hold window
        assert!(c.update(5.0));
        // Re-engaging cancels the pending retract
        c.set_mode(Mode::Listening, 6.0);
        assert!(c.update(20.0));
        assert!(c.update(100.0));
    }

    #[test]
    fn idle_past_hold_retracts_exactly_once() {
        let mut c = controller();
        c.set_mode(Mode::Listening, 0.0);
        c.set_mode(Mode::Idle, 1.0);
        assert!(c.update(8.9));
        assert!(!c.update(9.0));
        // No pending deadline remains afterwards
        assert!(c.retract_at.is_none());
        assert!(!c.update(50.0));
    }

    #[test]
    fn timer_restarts_on_each_mode_change() {
        let mut c = controller();
        c.set_mode(Mode::Listening, 0.0);
        c.set_mode(Mode::Idle, 1.0); // retract at 9.0
        c.set_mode(Mode::Idle, 8.5); // restarted: retract at 16.5
        assert!(c.update(9.0));
        assert!(c.update(16.4));
        assert!(!c.update(16.5));
    }

    #[test]
    fn idle_while_retracted_stays_retracted() {
        let mut c = controller();
        c.set_mode(Mode::Idle, 0.0);
        assert!(!c.update(100.0));
        assert!(c.retract_at.is_none());
    }
}
