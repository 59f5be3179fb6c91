//! Particle shell geometry and rotation parameters.

/// Particle shell construction parameters.
///
/// The shell is sampled once at startup; only shader uniforms change
/// afterwards, so these values never matter past `ParticleField::new`.
#[derive(Debug, Clone)]
pub struct FieldShell {
    /// Number of particles in the shell
    pub particle_count: usize,

    /// Mean shell radius (world units)
    pub radius: f32,

    /// Shell thickness (world units); points land in radius ± thickness/2
    pub thickness: f32,

    /// Fraction of particles tinted gold instead of cyan (0..1)
    pub gold_fraction: f32,

    /// RNG seed for shell sampling (fixed so construction is deterministic)
    pub seed: u64,

    /// Yaw offset per elapsed second (radians); applied absolutely, not
    /// accumulated
    pub yaw_rate_rad_per_s: f32,

    /// Pitch oscillation: `sin(time * freq) * amplitude`
    pub pitch_freq_rad_per_s: f32,

    /// Pitch oscillation amplitude (radians)
    pub pitch_amplitude_rad: f32,
}

impl Default for FieldShell {
    fn default() -> Self {
        Self {
            particle_count: 16_384,
            radius: 2.4,
            thickness: 0.45,
            gold_fraction: 0.08,
            seed: 7,
            yaw_rate_rad_per_s: 0.035,
            pitch_freq_rad_per_s: 0.12,
            pitch_amplitude_rad: 0.06,
        }
    }
}

impl FieldShell {
    /// Inner shell radius (world units)
    pub fn inner_radius(&self) -> f32 {
        self.radius - self.thickness / 2.0
    }

    /// Outer shell radius (world units)
    pub fn outer_radius(&self) -> f32 {
        self.radius + self.thickness / 2.0
    }
}
