//! Transient text overlay lifecycle: fade-in, hold, fade-out.

use crate::params::{FadeTiming, OverlaySway};

/// Fade phase of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Initial and terminal state; no per-frame work, nothing rendered
    #[default]
    Hidden,
    FadeIn,
    Hold,
    FadeOut,
}

/// Overlay position offsets while visible (continuous sway, independent of
/// fade phase)
#[derive(Debug, Clone, Copy)]
pub struct SwayOffsets {
    pub y: f32,
    pub yaw_rad: f32,
}

/// Fade lifecycle for the transient response text.
///
/// A new qualifying text (>= 3 visible characters) restarts the cycle from
/// FadeIn regardless of the current phase, re-arming the hold deadline; the
/// superseded deadline can never fire because it is overwritten. Texts
/// shorter than 3 characters are ignored entirely.
pub struct ResponsePhaseMachine {
    timing: FadeTiming,
    sway: OverlaySway,
    phase: Phase,
    opacity: f32,
    text: String,
    /// Frame-clock time at which the hold phase ends, while armed
    hold_until: Option<f32>,
}

impl ResponsePhaseMachine {
    pub fn new(timing: FadeTiming, sway: OverlaySway) -> Self {
        Self {
            timing,
            sway,
            phase: Phase::Hidden,
            opacity: 0.0,
            text: String::new(),
            hold_until: None,
        }
    }

    /// Submit new response text at frame-clock time `now`.
    ///
    /// Returns true if the text qualified and the cycle (re)started.
    pub fn submit(&mut self, text: &str, now: f32) -> bool {
        if text.chars().count() < 3 {
            return false;
        }
        self.text = truncate_display(text, self.timing.max_chars);
        self.opacity = 0.0;
        self.phase = Phase::FadeIn;
        self.hold_until = Some(now + self.timing.hold_secs);
        true
    }

    /// Advance the fade by `delta` seconds at frame-clock time `now`.
    ///
    /// While hidden this is a no-op.
    pub fn tick(&mut self, delta: f32, now: f32) {
        match self.phase {
            Phase::Hidden => {}
            Phase::FadeIn => {
                self.opacity = (self.opacity + delta * self.timing.rise_per_sec).min(1.0);
                if self.opacity >= 1.0 {
                    self.phase = Phase::Hold;
                }
            }
            Phase::Hold => {
                // Deadline is only honored while still holding; a newer
                // text would have re-armed it
                if let Some(deadline) = self.hold_until {
                    if now >= deadline {
                        self.hold_until = None;
                        self.phase = Phase::FadeOut;
                    }
                }
            }
            Phase::FadeOut => {
                self.opacity = (self.opacity - delta * self.timing.fall_per_sec).max(0.0);
                if self.opacity <= 0.0 {
                    self.phase = Phase::Hidden;
                }
            }
        }
    }

    /// Sway offsets at elapsed time `time` (seconds); only meaningful while
    /// visible.
    pub fn sway_offsets(&self, time: f32) -> SwayOffsets {
        SwayOffsets {
            y: self.sway.base_y
                + (time * self.sway.bob_freq_rad_per_s).sin() * self.sway.bob_amplitude,
            yaw_rad: (time * self.sway.wobble_freq_rad_per_s).sin() * self.sway.wobble_amplitude_rad,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True while the overlay contributes to the frame
    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Hidden
    }
}

/// Truncate to `max_chars` visible characters, replacing the tail with a
/// single ellipsis when the source is longer. Counts chars, not bytes.
fn truncate_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> ResponsePhaseMachine {
        ResponsePhaseMachine::new(FadeTiming::default(), OverlaySway::default())
    }

    #[test]
    fn short_text_is_ignored() {
        let mut m = machine();
        assert!(!m.submit("ok", 0.0));
        assert_eq!(m.phase(), Phase::Hidden);
        assert_eq!(m.opacity(), 0.0);
        assert_eq!(m.text(), "");
    }

    #[test]
    fn qualifying_text_starts_fade_in() {
        let mut m = machine();
        assert!(m.submit("Understood, Commander.", 0.0));
        assert_eq!(m.phase(), Phase::FadeIn);
        assert_eq!(m.opacity(), 0.0);
        assert_eq!(m.text(), "Understood, Commander.");
    }

    #[test]
    fn long_text_truncates_with_ellipsis() {
        let mut m = machine();
        let long: String = "x".repeat(100);
        m.submit(&long, 0.0);
        assert_eq!(m.text().chars().count(), 64);
        assert!(m.text().ends_with('…'));
        assert_eq!(&m.text()[..63], &long[..63]);
    }

    #[test]
    fn exactly_limit_is_untouched() {
        let mut m = machine();
        let text: String = "y".repeat(64);
        m.submit(&text, 0.0);
        assert_eq!(m.text(), text);
    }

    #[test]
    fn full_cycle_timing() {
        let mut m = machine();
        m.submit("Understood, Commander.", 0.0);

        // Fade-in at 2.5/s: full opacity after 0.4 s of accumulated delta
        let dt = 0.01;
        let mut now = 0.0;
        for _ in 0..39 {
            now += dt;
            m.tick(dt, now);
        }
        assert_eq!(m.phase(), Phase::FadeIn);
        // A couple more ticks absorb float accumulation error around 0.4 s
        for _ in 0..3 {
            now += dt;
            m.tick(dt, now);
        }
        assert_eq!(m.phase(), Phase::Hold);
        assert_eq!(m.opacity(), 1.0);

        // Hold until 4.2 s after submission
        m.tick(dt, 4.19);
        assert_eq!(m.phase(), Phase::Hold);
        m.tick(dt, 4.2);
        assert_eq!(m.phase(), Phase::FadeOut);

        // Fade-out at 1.2/s: ~0.833 s back to zero
        now = 4.2;
        for _ in 0..90 {
            now += dt;
            m.tick(dt, now);
        }
        assert_eq!(m.phase(), Phase::Hidden);
        assert_eq!(m.opacity(), 0.0);

        // Hidden does no further work
        m.tick(1.0, 100.0);
        assert_eq!(m.phase(), Phase::Hidden);
    }

    #[test]
    fn new_text_mid_fade_out_restarts_cycle() {
        let mut m = machine();
        m.submit("first message", 0.0);
        for i in 0..50 {
            m.tick(0.01, 0.01 * (i + 1) as f32);
        }
        m.tick(0.01, 5.0); // hold deadline fires
        assert_eq!(m.phase(), Phase::FadeOut);
        m.tick(0.1, 5.1);
        assert!(m.opacity() < 1.0);

        assert!(m.submit("second message", 5.2));
        assert_eq!(m.phase(), Phase::FadeIn);
        assert_eq!(m.opacity(), 0.0);
        assert_eq!(m.text(), "second message");

        // The re-armed hold deadline is relative to the new submission
        for i in 0..45 {
            m.tick(0.01, 5.2 + 0.01 * (i + 1) as f32);
        }
        assert_eq!(m.phase(), Phase::Hold);
        m.tick(0.01, 9.3);
        assert_eq!(m.phase(), Phase::Hold);
        m.tick(0.01, 9.4);
        assert_eq!(m.phase(), Phase::FadeOut);
    }

    #[test]
    fn sway_is_continuous() {
        let m = machine();
        let a = m.sway_offsets(0.0);
        let b = m.sway_offsets(1.3);
        assert!((a.y - OverlaySway::default().base_y).abs() < 1e-6);
        assert!((a.yaw_rad).abs() < 1e-6);
        assert_ne!(a.y, b.y);
    }
}
