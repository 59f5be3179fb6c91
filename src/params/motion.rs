//! Spring, hysteresis, fade, and overlay sway parameters.

/// Deploy/retract spring constants (unit mass, single axis).
///
/// stiffness 160 / damping 22 gives a damping ratio of ~0.87, slightly
/// under-critical. The small overshoot on deploy is intentional; do not
/// "fix" the ratio.
#[derive(Debug, Clone)]
pub struct SpringParams {
    /// Restoring force per unit displacement (1/s^2)
    pub stiffness: f32,

    /// Damping force per unit velocity (1/s)
    pub damping: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 160.0,
            damping: 22.0,
        }
    }
}

/// Retract hysteresis: how long the deployable group stays out after the
/// mode drops back to idle. A brief dip never visibly retracts the group.
#[derive(Debug, Clone)]
pub struct RetractHysteresis {
    /// Delay between leaving an engaged mode and retracting (seconds)
    pub hold_secs: f32,
}

impl Default for RetractHysteresis {
    fn default() -> Self {
        Self { hold_secs: 8.0 }
    }
}

/// Transient text overlay fade timing
#[derive(Debug, Clone)]
pub struct FadeTiming {
    /// Opacity rise rate while fading in (1/s)
    pub rise_per_sec: f32,

    /// Opacity fall rate while fading out (1/s)
    pub fall_per_sec: f32,

    /// Time fully visible before fade-out begins (seconds)
    pub hold_secs: f32,

    /// Maximum visible characters; longer text is truncated to one less
    /// plus a trailing ellipsis
    pub max_chars: usize,
}

impl Default for FadeTiming {
    fn default() -> Self {
        Self {
            rise_per_sec: 2.5,
            fall_per_sec: 1.2,
            hold_secs: 4.2,
            max_chars: 64,
        }
    }
}

/// Continuous overlay sway while visible, independent of fade phase
#[derive(Debug, Clone)]
pub struct OverlaySway {
    /// Overlay rest height (world units)
    pub base_y: f32,

    /// Vertical bob: `base_y + sin(time * freq) * amplitude`
    pub bob_freq_rad_per_s: f32,
    pub bob_amplitude: f32,

    /// Yaw wobble: `sin(time * freq) * amplitude` (radians)
    pub wobble_freq_rad_per_s: f32,
    pub wobble_amplitude_rad: f32,
}

impl Default for OverlaySway {
    fn default() -> Self {
        Self {
            base_y: -3.4,
            bob_freq_rad_per_s: 0.6,
            bob_amplitude: 0.12,
            wobble_freq_rad_per_s: 0.3,
            wobble_amplitude_rad: 0.08,
        }
    }
}
