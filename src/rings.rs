//! Concentric spectrum rings: maps frequency bands to ring scale and
//! opacity, one band per ring, every frame.

use bytemuck::{Pod, Zeroable};

use crate::params::{RingLayout, RingPulse};
use crate::spectrum::SpectrumSampler;

/// Cyan ring tint (linear RGB)
const RING_CYAN: [f32; 3] = [0.0, 0.96, 1.0];
/// Gold ring tint (linear RGB)
const RING_GOLD: [f32; 3] = [1.0, 0.78, 0.25];

/// Per-ring instance data uploaded to the ring pipeline each frame
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct RingInstance {
    /// Inner radius before scaling (world units)
    pub radius: f32,
    /// Band width (world units)
    pub width: f32,
    /// Scale multiplier from band intensity
    pub scale: f32,
    /// Opacity from band intensity
    pub opacity: f32,
    /// Tint (linear RGB) + padding for 16-byte stride alignment
    pub color: [f32; 3],
    pub _pad: f32,
}

/// Fixed ring set with per-frame pulse state
pub struct RingSet {
    layout: RingLayout,
    pulse: RingPulse,
    instances: Vec<RingInstance>,
}

impl RingSet {
    pub fn new(layout: RingLayout, pulse: RingPulse) -> Self {
        let instances = (0..layout.count)
            .map(|i| RingInstance {
                radius: layout.inner_radius(i),
                width: layout.width,
                scale: 1.0,
                opacity: pulse.opacity(0.0),
                color: if (i + 1) % layout.gold_every == 0 {
                    RING_GOLD
                } else {
                    RING_CYAN
                },
                _pad: 0.0,
            })
            .collect();
        Self {
            layout,
            pulse,
            instances,
        }
    }

    /// Update every ring from the current spectrum.
    ///
    /// Ring `i` reads bin `floor(i / count * bins)`. No smoothing: the
    /// rings track the spectrum instantaneously.
    pub fn update(&mut self, sampler: &SpectrumSampler) {
        let bins = sampler.bin_count();
        for (i, ring) in self.instances.iter_mut().enumerate() {
            let x = if bins == 0 {
                0.0
            } else {
                sampler.intensity(i * bins / self.layout.count)
            };
            ring.scale = self.pulse.scale(x);
            ring.opacity = self.pulse.opacity(x);
        }
    }

    /// Instance data for the ring pipeline
    pub fn instances(&self) -> &[RingInstance] {
        &self.instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::SpectrumSource;

    struct Gradient {
        bins: usize,
    }

    impl SpectrumSource for Gradient {
        fn bin_count(&self) -> usize {
            self.bins
        }
        fn fill(&self, buf: &mut [u8]) {
            for (i, b) in buf.iter_mut().enumerate() {
                *b = (i * 255 / (self.bins - 1)) as u8;
            }
        }
    }

    fn rings() -> RingSet {
        RingSet::new(RingLayout::default(), RingPulse::default())
    }

    #[test]
    fn layout_radii_and_colors() {
        let set = rings();
        assert_eq!(set.instances().len(), 12);
        for (i, ring) in set.instances().iter().enumerate() {
            let expected = 1.88 + i as f32 * 0.14;
            assert!((ring.radius - expected).abs() < 1e-6);
            assert_eq!(ring.width, 0.032);
            let gold = (i + 1) % 3 == 0;
            assert_eq!(ring.color == RING_GOLD, gold, "ring {}", i);
        }
    }

    #[test]
    fn silence_gives_floor_opacity_and_unit_scale() {
        let mut set = rings();
        let sampler = SpectrumSampler::new();
        set.update(&sampler);
        for ring in set.instances() {
            assert_eq!(ring.scale, 1.0);
            assert!((ring.opacity - 0.35).abs() < 1e-6);
        }
    }

    #[test]
    fn pulse_mapping_is_monotone_in_intensity() {
        let pulse = RingPulse::default();
        let mut prev_scale = f32::MIN;
        let mut prev_opacity = f32::MIN;
        for step in 0..=10 {
            let x = step as f32 / 10.0;
            let s = pulse.scale(x);
            let o = pulse.opacity(x);
            assert!(s > prev_scale);
            assert!(o > prev_opacity);
            prev_scale = s;
            prev_opacity = o;
        }
        assert!((pulse.scale(1.0) - 1.32).abs() < 1e-6);
        assert!((pulse.opacity(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn source_loss_drops_rings_to_ambient() {
        let mut set = rings();
        let mut sampler = SpectrumSampler::new();
        sampler.sample(Some(&Gradient { bins: 64 }));
        set.update(&sampler);
        assert!(set.instances()[11].scale > 1.25);

        // With the source gone the rings must not stay lit at the
        // last-seen spectrum
        sampler.sample(None);
        set.update(&sampler);
        for ring in set.instances() {
            assert_eq!(ring.scale, 1.0);
            assert!((ring.opacity - 0.35).abs() < 1e-6);
        }
    }

    #[test]
    fn rings_map_ascending_bins() {
        let mut set = rings();
        let mut sampler = SpectrumSampler::new();
        sampler.sample(Some(&Gradient { bins: 120 }));
        set.update(&sampler);

        // Bin index grows with ring index, so scale must be non-decreasing
        let scales: Vec<f32> = set.instances().iter().map(|r| r.scale).collect();
        for pair in scales.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        // Ring 0 reads bin 0 (silent), ring 11 a loud high bin
        assert!((scales[0] - 1.0).abs() < 1e-6);
        assert!(scales[11] > 1.25);
    }
}
