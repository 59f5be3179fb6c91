//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (world units, seconds, Hz, pixels)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod field;
mod mode;
mod motion;
mod render;
mod rings;

// Re-export all types
pub use audio::FftConfig;
pub use field::FieldShell;
pub use mode::{Mode, ModeStyle};
pub use motion::{FadeTiming, OverlaySway, RetractHysteresis, SpringParams};
pub use render::RenderConfig;
pub use rings::{RingLayout, RingPulse};
