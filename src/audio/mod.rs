//! Audio capture and FFT analysis.
//!
//! The animation core only consumes a [`SpectrumSource`]; this module is
//! the collaborator that provides one, by capturing the default input
//! device with cpal and analysing it on a worker thread with rustfft.

mod fft;

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::info;

use crate::params::FftConfig;
use crate::spectrum::SpectrumSource;

/// Audio system managing capture and FFT analysis
pub struct AudioSystem {
    /// Shared byte-magnitude spectrum (thread-safe)
    spectrum: Arc<Mutex<Vec<u8>>>,
    bin_count: usize,

    /// Capture stream (kept alive; dropped on teardown)
    _stream: cpal::Stream,

    /// FFT analysis thread handle
    _fft_thread: Option<thread::JoinHandle<()>>,
}

impl AudioSystem {
    /// Create and start the audio system with the given configuration
    pub fn new(config: FftConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("invalid FFT config: {e}"))?;

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow!("no audio input device found"))?;
        let stream_config = device
            .default_input_config()
            .context("failed to get input config")?;

        let sample_rate = stream_config.sample_rate().0;
        let channels = stream_config.channels() as usize;
        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels,
            "audio capture started"
        );

        // Shared state between the capture callback and the FFT thread
        let fft_buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
        let fft_buffer_cb = Arc::clone(&fft_buffer);

        let bin_count = config.bin_count();
        let spectrum = Arc::new(Mutex::new(vec![0u8; bin_count]));
        let spectrum_fft = Arc::clone(&spectrum);

        // Bound the pending sample backlog so a stalled FFT thread cannot
        // grow the buffer without limit
        let backlog_cap = config.fft_size * 8;

        let stream = device
            .build_input_stream(
                &stream_config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mut buf = fft_buffer_cb.lock().unwrap();
                    // Fold to mono by taking channel 0
                    for frame in data.chunks(channels) {
                        buf.push(frame[0]);
                    }
                    let len = buf.len();
                    if len > backlog_cap {
                        buf.drain(0..len - backlog_cap);
                    }
                },
                |err| tracing::warn!("audio stream error: {err}"),
                None,
            )
            .context("failed to build input stream")?;

        stream.play().context("failed to start input stream")?;

        let fft_thread = fft::spawn_fft_thread(config, fft_buffer, spectrum_fft);

        Ok(Self {
            spectrum,
            bin_count,
            _stream: stream,
            _fft_thread: Some(fft_thread),
        })
    }

    /// A spectrum source handle for the frame loop
    pub fn source(&self) -> CaptureSource {
        CaptureSource {
            spectrum: Arc::clone(&self.spectrum),
            bin_count: self.bin_count,
        }
    }
}

/// Spectrum source backed by the shared capture spectrum
pub struct CaptureSource {
    spectrum: Arc<Mutex<Vec<u8>>>,
    bin_count: usize,
}

impl SpectrumSource for CaptureSource {
    fn bin_count(&self) -> usize {
        self.bin_count
    }

    fn fill(&self, buf: &mut [u8]) {
        let spectrum = self.spectrum.lock().unwrap();
        let n = buf.len().min(spectrum.len());
        buf[..n].copy_from_slice(&spectrum[..n]);
    }
}
