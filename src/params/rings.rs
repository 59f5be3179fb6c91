//! Ring layout and spectrum-to-ring pulse mapping parameters.

/// Concentric ring layout
#[derive(Debug, Clone)]
pub struct RingLayout {
    /// Number of rings
    pub count: usize,

    /// Inner radius of ring 0 (world units)
    pub base_radius: f32,

    /// Radius increment per ring (world units)
    pub radius_step: f32,

    /// Ring band width (world units)
    pub width: f32,

    /// Every n-th ring takes the gold tint, the rest are cyan
    pub gold_every: usize,
}

impl Default for RingLayout {
    fn default() -> Self {
        Self {
            count: 12,
            base_radius: 1.88,
            radius_step: 0.14,
            width: 0.032,
            gold_every: 3,
        }
    }
}

impl RingLayout {
    /// Inner radius of ring `i` (world units)
    pub fn inner_radius(&self, i: usize) -> f32 {
        self.base_radius + i as f32 * self.radius_step
    }
}

/// Mapping from band intensity `x` in [0,1] to ring prominence.
///
/// Deliberately unsmoothed: rings track the spectrum instantaneously, the
/// perceived "snap" is part of the look.
#[derive(Debug, Clone)]
pub struct RingPulse {
    /// Scale multiplier = 1 + span * x
    pub scale_span: f32,

    /// Opacity = floor + span * x
    pub opacity_floor: f32,
    pub opacity_span: f32,
}

impl Default for RingPulse {
    fn default() -> Self {
        Self {
            scale_span: 0.32,
            opacity_floor: 0.35,
            opacity_span: 0.65,
        }
    }
}

impl RingPulse {
    /// Scale multiplier for band intensity `x` in [0,1]
    pub fn scale(&self, x: f32) -> f32 {
        1.0 + self.scale_span * x
    }

    /// Opacity for band intensity `x` in [0,1]
    pub fn opacity(&self, x: f32) -> f32 {
        self.opacity_floor + self.opacity_span * x
    }
}
