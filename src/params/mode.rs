//! Operating modes and the per-mode style table.

/// Operating mode, supplied externally once per change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Listening,
    Transmitting,
}

/// Visuals that branch on the mode, collected in one exhaustive table so
/// the mapping stays centrally auditable.
#[derive(Debug, Clone, Copy)]
pub struct ModeStyle {
    /// Particle point size (world units)
    pub point_size: f32,

    /// Accent color for the deployable marker group (linear RGB)
    pub accent: [f32; 3],
}

impl Mode {
    /// Style table, one entry per mode
    pub fn style(self) -> ModeStyle {
        match self {
            Mode::Idle => ModeStyle {
                point_size: 0.015,
                accent: [0.0, 0.64, 0.78],
            },
            Mode::Listening => ModeStyle {
                point_size: 0.015,
                accent: [0.0, 0.96, 1.0],
            },
            Mode::Transmitting => ModeStyle {
                point_size: 0.022,
                accent: [1.0, 0.78, 0.25],
            },
        }
    }

    /// True for the modes that keep the marker group deployed
    pub fn is_engaged(self) -> bool {
        matches!(self, Mode::Listening | Mode::Transmitting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmit_enlarges_points() {
        assert_eq!(Mode::Transmitting.style().point_size, 0.022);
        assert_eq!(Mode::Idle.style().point_size, 0.015);
        assert_eq!(Mode::Listening.style().point_size, 0.015);
    }

    #[test]
    fn engaged_modes() {
        assert!(!Mode::Idle.is_engaged());
        assert!(Mode::Listening.is_engaged());
        assert!(Mode::Transmitting.is_engaged());
    }
}
