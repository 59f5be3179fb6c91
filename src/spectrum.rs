//! Spectrum sampling: reduce a frequency-domain byte buffer to a
//! normalized volume and per-bin intensities.
//!
//! The sampler never allocates per frame; its buffer is reused for the
//! lifetime of the current source and replaced exactly once when the
//! source's bin count changes.

/// A capability that fills a fixed-size buffer with the current
/// frequency-domain magnitudes, one byte (0-255) per bin.
///
/// Owned by the audio subsystem; the animation core only borrows it per
/// frame, and tolerates it being absent.
pub trait SpectrumSource {
    /// Number of frequency bins this source produces
    fn bin_count(&self) -> usize;

    /// Overwrite `buf` with the current magnitudes. `buf.len()` always
    /// equals `bin_count()` when called through the sampler.
    fn fill(&self, buf: &mut [u8]);
}

/// Per-frame spectrum reader with a reusable buffer.
pub struct SpectrumSampler {
    buffer: Vec<u8>,
    /// Whether the most recent `sample` call saw a live source; while
    /// false, every read reports silence regardless of buffer contents
    has_source: bool,
}

impl SpectrumSampler {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            has_source: false,
        }
    }

    /// Read the current spectrum and return the normalized mean volume in
    /// [0, 1].
    ///
    /// Fails soft: with no source, returns 0.0 and every subsequent
    /// `intensity`/`bin_count` read reports silence until a source comes
    /// back. The buffer itself is left untouched, so a returning source
    /// with the same bin count reuses the allocation; it is resized only
    /// when the source's bin count differs (a source swap), never per
    /// frame.
    pub fn sample(&mut self, source: Option<&dyn SpectrumSource>) -> f32 {
        let Some(source) = source else {
            self.has_source = false;
            return 0.0;
        };

        let bins = source.bin_count();
        if bins == 0 {
            self.has_source = false;
            return 0.0;
        }
        if self.buffer.len() != bins {
            self.buffer.resize(bins, 0);
        }
        source.fill(&mut self.buffer);
        self.has_source = true;

        let sum: u32 = self.buffer.iter().map(|&b| b as u32).sum();
        sum as f32 / (bins as f32 * 255.0)
    }

    /// Intensity of bin `index` in [0, 1]; 0.0 when out of range or while
    /// the source is absent.
    pub fn intensity(&self, index: usize) -> f32 {
        if !self.has_source {
            return 0.0;
        }
        self.buffer
            .get(index)
            .map(|&b| b as f32 / 255.0)
            .unwrap_or(0.0)
    }

    /// Number of readable bins (0 while the source is absent)
    pub fn bin_count(&self) -> usize {
        if self.has_source {
            self.buffer.len()
        } else {
            0
        }
    }
}

impl Default for SpectrumSampler {
    fn default() -> Self {
        Self::new()
    }
}
