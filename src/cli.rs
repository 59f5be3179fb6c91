//! Command-line argument parsing.

use clap::Parser;

use crate::params::{FftConfig, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Arclight")]
#[command(about = "Audio-reactive HUD visualizer", long_about = None)]
pub struct Args {
    /// Run without audio capture (spectrum-driven visuals stay ambient)
    #[arg(long)]
    pub no_audio: bool,

    /// Drive a scripted mode/text timeline instead of waiting for input
    #[arg(long)]
    pub demo: bool,

    /// FFT window size in samples (power of 2)
    #[arg(long, value_name = "SAMPLES", default_value = "1024")]
    pub fft_size: usize,

    /// Window width in pixels
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,
}

impl Args {
    /// FFT configuration from the command line
    pub fn fft_config(&self) -> FftConfig {
        FftConfig {
            fft_size: self.fft_size,
            ..FftConfig::default()
        }
    }

    /// Render configuration from the command line
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..RenderConfig::default()
        }
    }
}
