//! FFT analysis thread: raw capture samples in, byte magnitudes out.

use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::params::FftConfig;

/// Spawn the analysis thread.
///
/// Every `update_interval_ms` it takes one Hann-windowed FFT over the
/// oldest `fft_size` samples, folds each bin magnitude through the
/// configured dB range to a 0-255 byte, and publishes the result. The
/// input buffer is drained by half the window for 50% overlap.
pub fn spawn_fft_thread(
    config: FftConfig,
    fft_buffer: Arc<Mutex<Vec<f32>>>,
    spectrum: Arc<Mutex<Vec<u8>>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let mut scratch = vec![Complex::new(0.0f32, 0.0); config.fft_size];

        loop {
            thread::sleep(Duration::from_millis(config.update_interval_ms));

            let mut buf = fft_buffer.lock().unwrap();
            if buf.len() < config.fft_size {
                continue;
            }

            for i in 0..config.fft_size {
                let window = hann_window(i, config.fft_size);
                scratch[i] = Complex::new(buf[i] * window, 0.0);
            }
            // 50% overlap
            buf.drain(0..config.fft_size / 2);
            drop(buf);

            fft.process(&mut scratch);

            let mut out = spectrum.lock().unwrap();
            let norm = 2.0 / config.fft_size as f32;
            for (i, byte) in out.iter_mut().enumerate() {
                *byte = magnitude_to_byte(scratch[i].norm() * norm, &config);
            }
        }
    })
}

/// Hann window function for FFT analysis
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Fold a linear magnitude through the configured dB range to a byte,
/// analyser-style: min_db -> 0, max_db -> 255.
fn magnitude_to_byte(magnitude: f32, config: &FftConfig) -> u8 {
    let db = 20.0 * magnitude.max(1e-10).log10();
    let normalized = (db - config.min_db) / (config.max_db - config.min_db);
    (normalized.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_window_shape() {
        let size = 1024;
        // 0 at the edges, 1 at the center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn magnitude_scaling_spans_byte_range() {
        let config = FftConfig::default();
        // Silence clamps to 0
        assert_eq!(magnitude_to_byte(0.0, &config), 0);
        // A magnitude above the dB ceiling clamps to 255
        assert_eq!(magnitude_to_byte(1.0, &config), 255);
        // Something in between lands in between
        let mid = magnitude_to_byte(10f32.powf(-65.0 / 20.0), &config);
        assert!(mid > 100 && mid < 155, "mid byte {}", mid);
    }
}
