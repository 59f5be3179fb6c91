//! Deploy/retract spring: a single-axis, unit-mass oscillator integrated
//! with semi-implicit Euler.

use crate::params::SpringParams;

/// Spring state driving the deployable group's visual scale.
///
/// Position and velocity persist across frames; the target is rewritten
/// whenever the deployment decision changes.
#[derive(Debug, Clone)]
pub struct SpringState {
    pub position: f32,
    pub velocity: f32,
    pub target: f32,
    params: SpringParams,
}

impl SpringState {
    /// Start at rest, retracted
    pub fn new(params: SpringParams) -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            target: 0.0,
            params,
        }
    }

    /// Set the deploy target (true = 1.0, false = 0.0)
    pub fn set_deployed(&mut self, deployed: bool) {
        self.target = if deployed { 1.0 } else { 0.0 };
    }

    /// Advance the spring by `delta` seconds and return the new position.
    ///
    /// Position is clamped at zero so the deployable geometry never
    /// inverts. Runs every frame; there is no settle condition.
    pub fn step(&mut self, delta: f32) -> f32 {
        let displacement = self.position - self.target;
        let spring_force = -self.params.stiffness * displacement;
        let damping_force = -self.params.damping * self.velocity;
        self.velocity += (spring_force + damping_force) * delta;
        self.position = (self.position + self.velocity * delta).max(0.0);
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spring() -> SpringState {
        SpringState::new(SpringParams::default())
    }

    #[test]
    fn converges_to_deploy_target() {
        let mut s = spring();
        s.set_deployed(true);
        // 4 simulated seconds at 120 Hz is far beyond the settle time
        for _ in 0..480 {
            s.step(1.0 / 120.0);
        }
        assert!((s.position - 1.0).abs() < 1e-3, "position {}", s.position);
        assert!(s.velocity.abs() < 1e-2);
    }

    #[test]
    fn never_goes_negative() {
        let mut s = spring();
        s.set_deployed(true);
        for _ in 0..60 {
            s.step(1.0 / 60.0);
        }
        s.set_deployed(false);
        for _ in 0..600 {
            let p = s.step(1.0 / 60.0);
            assert!(p >= 0.0);
        }
        assert!(s.position < 1e-3);
    }

    #[test]
    fn underdamped_overshoot_is_small() {
        // Damping ratio ~0.87: a slight overshoot past the target is
        // expected, a large one is not.
        let mut s = spring();
        s.set_deployed(true);
        let mut peak = 0.0f32;
        for _ in 0..1200 {
            peak = peak.max(s.step(1.0 / 240.0));
        }
        assert!(peak > 1.0);
        assert!(peak < 1.1, "overshoot too large: {}", peak);
    }
}
