//! GPU-resident particle shell.
//!
//! Geometry is sampled once at startup and never mutated; every frame the
//! host derives a handful of scalar uniforms and the vertex stage does the
//! per-particle displacement. CPU cost per frame is O(1) in particle count.

use bytemuck::{Pod, Zeroable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::params::{FieldShell, ModeStyle};

/// Cyan particle tint (linear RGB)
const PARTICLE_CYAN: [f32; 3] = [0.0, 0.96, 1.0];
/// Gold particle tint (linear RGB)
const PARTICLE_GOLD: [f32; 3] = [1.0, 0.78, 0.25];

/// Immutable per-particle data (base position + tint)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub color: [f32; 3],
    pub _pad1: f32,
}

/// Scalar uniforms pushed to the particle shader each frame
#[derive(Debug, Clone, Copy)]
pub struct FieldMotion {
    /// Elapsed seconds since animator start
    pub time: f32,
    /// Normalized spectrum volume in [0, 1]
    pub volume: f32,
    /// Point size (world units), from the mode style table
    pub point_size: f32,
    /// Half the render surface height in logical pixels (perspective
    /// attenuation)
    pub viewport_scale: f32,
    /// Whole-field yaw, set absolutely from elapsed time (radians)
    pub yaw: f32,
    /// Whole-field pitch oscillation (radians)
    pub pitch: f32,
}

/// Fixed particle shell with per-frame uniform derivation
pub struct ParticleField {
    shell: FieldShell,
    vertices: Vec<ParticleVertex>,
}

impl ParticleField {
    /// Sample the shell once.
    ///
    /// Longitude is uniform; latitude uses inverse-cosine sampling
    /// (uniform cos φ) so the poles do not cluster. Radius is uniform in
    /// [inner, outer].
    pub fn new(shell: FieldShell) -> Self {
        let mut rng = StdRng::seed_from_u64(shell.seed);
        let inner = shell.inner_radius();
        let vertices = (0..shell.particle_count)
            .map(|_| {
                let theta = rng.gen::<f32>() * TAU;
                let cos_phi = rng.gen::<f32>() * 2.0 - 1.0;
                let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
                let r = inner + rng.gen::<f32>() * shell.thickness;

                let color = if rng.gen::<f32>() < shell.gold_fraction {
                    PARTICLE_GOLD
                } else {
                    PARTICLE_CYAN
                };
                ParticleVertex {
                    position: [
                        r * sin_phi * theta.cos(),
                        r * cos_phi,
                        r * sin_phi * theta.sin(),
                    ],
                    _pad0: 0.0,
                    color,
                    _pad1: 0.0,
                }
            })
            .collect();
        Self { shell, vertices }
    }

    /// Base geometry for the instance buffer (uploaded once)
    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    pub fn count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Derive this frame's uniforms. No per-particle work happens here.
    ///
    /// `surface_height_px` is the physical surface height; `scale_factor`
    /// is the window's hidpi factor, so the viewport scale stays in
    /// logical pixels and point attenuation does not grow with DPI.
    pub fn animate(
        &self,
        time: f32,
        volume: f32,
        style: &ModeStyle,
        surface_height_px: u32,
        scale_factor: f64,
    ) -> FieldMotion {
        FieldMotion {
            time,
            volume,
            point_size: style.point_size,
            viewport_scale: surface_height_px as f32 / scale_factor as f32 / 2.0,
            yaw: time * self.shell.yaw_rate_rad_per_s,
            pitch: (time * self.shell.pitch_freq_rad_per_s).sin() * self.shell.pitch_amplitude_rad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Mode;

    #[test]
    fn shell_has_expected_count_and_radii() {
        let shell = FieldShell::default();
        let field = ParticleField::new(shell.clone());
        assert_eq!(field.count(), 16_384);

        for v in field.vertices() {
            let [x, y, z] = v.position;
            let r = (x * x + y * y + z * z).sqrt();
            assert!(r >= shell.inner_radius() - 1e-4 && r <= shell.outer_radius() + 1e-4);
        }
    }

    #[test]
    fn tint_split_is_mostly_cyan() {
        let field = ParticleField::new(FieldShell::default());
        let gold = field
            .vertices()
            .iter()
            .filter(|v| v.color == PARTICLE_GOLD)
            .count();
        let fraction = gold as f32 / field.count() as f32;
        assert!(fraction > 0.06 && fraction < 0.10, "gold {}", fraction);
    }

    #[test]
    fn construction_is_deterministic() {
        let a = ParticleField::new(FieldShell::default());
        let b = ParticleField::new(FieldShell::default());
        assert_eq!(a.vertices(), b.vertices());
    }

    #[test]
    fn animate_leaves_geometry_untouched() {
        let field = ParticleField::new(FieldShell::default());
        let before = field.vertices().to_vec();
        for frame in 0..100 {
            let t = frame as f32 / 60.0;
            field.animate(t, 0.8, &Mode::Transmitting.style(), 720, 1.0);
        }
        assert_eq!(field.vertices(), before.as_slice());
    }

    #[test]
    fn motion_uniforms_follow_mode_and_viewport() {
        let field = ParticleField::new(FieldShell::default());
        let m = field.animate(2.0, 0.5, &Mode::Transmitting.style(), 720, 1.0);
        assert_eq!(m.point_size, 0.022);
        assert_eq!(m.viewport_scale, 360.0);
        assert!((m.yaw - 2.0 * 0.035).abs() < 1e-6);
        assert!((m.pitch - (2.0f32 * 0.12).sin() * 0.06).abs() < 1e-6);

        let idle = field.animate(2.0, 0.5, &Mode::Idle.style(), 720, 1.0);
        assert_eq!(idle.point_size, 0.015);
    }

    #[test]
    fn viewport_scale_is_in_logical_pixels() {
        // A 2x hidpi surface reports twice the physical pixels for the
        // same logical size; attenuation must not scale with DPI
        let field = ParticleField::new(FieldShell::default());
        let hidpi = field.animate(0.0, 0.0, &Mode::Idle.style(), 1440, 2.0);
        let lodpi = field.animate(0.0, 0.0, &Mode::Idle.style(), 720, 1.0);
        assert_eq!(hidpi.viewport_scale, 360.0);
        assert_eq!(hidpi.viewport_scale, lodpi.viewport_scale);
    }

    #[test]
    fn latitude_is_not_pole_clustered() {
        // With uniform cos(phi), |y|/r should be uniform: its mean is 0.5
        let field = ParticleField::new(FieldShell::default());
        let mean: f32 = field
            .vertices()
            .iter()
            .map(|v| {
                let [x, y, z] = v.position;
                y.abs() / (x * x + y * y + z * z).sqrt()
            })
            .sum::<f32>()
            / field.count() as f32;
        assert!((mean - 0.5).abs() < 0.02, "mean |cos phi| = {}", mean);
    }
}
