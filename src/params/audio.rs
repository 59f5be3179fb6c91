//! FFT analysis configuration.

/// FFT analysis configuration for the capture thread
#[derive(Debug, Clone)]
pub struct FftConfig {
    /// FFT window size in samples (must be a power of 2)
    pub fft_size: usize,

    /// Analysis interval (milliseconds); 50 ms = 20 Hz spectrum refresh
    pub update_interval_ms: u64,

    /// Decibel floor mapped to magnitude 0 (matches analyser-style scaling)
    pub min_db: f32,

    /// Decibel ceiling mapped to magnitude 255
    pub max_db: f32,
}

impl Default for FftConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            update_interval_ms: 50,
            min_db: -100.0,
            max_db: -30.0,
        }
    }
}

impl FftConfig {
    /// Number of frequency bins the analysis publishes (half the window)
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            ));
        }
        if self.min_db >= self.max_db {
            return Err(format!(
                "dB range is empty: {} >= {}",
                self.min_db, self.max_db
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FftConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bin_count(), 512);
    }

    #[test]
    fn rejects_non_power_of_two() {
        let config = FftConfig {
            fft_size: 1000,
            ..FftConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
