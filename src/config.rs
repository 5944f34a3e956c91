use core::fmt;

use super::types::{PanelKind, ScreenSize, PRESSURE_AREA_DIVISOR};

/// Tunables for one filter instance.
///
/// Time fields are milliseconds, distance fields are screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    pub max_touch_area: u16,
    pub min_movement: u16,
    pub max_static_time_ms: u16,
    pub max_simultaneous_touches: u8,
    pub touch_timeout_ms: u16,
    pub gesture_timeout_ms: u16,
    pub require_gesture: bool,
    pub edge_swipe_threshold: u16,
    pub swipe_min_distance: u16,
    pub debounce_time_ms: u16,
    pub pressure_threshold: u16,
}

pub const RESISTIVE_DEFAULTS: FilterConfig = FilterConfig {
    max_touch_area: 80,
    min_movement: 10,
    max_static_time_ms: 800,
    max_simultaneous_touches: 1,
    touch_timeout_ms: 1_500,
    gesture_timeout_ms: 700,
    require_gesture: false,
    edge_swipe_threshold: 50,
    swipe_min_distance: 150,
    debounce_time_ms: 50,
    pressure_threshold: 300,
};

pub const CAPACITIVE_DEFAULTS: FilterConfig = FilterConfig {
    max_touch_area: 50,
    min_movement: 5,
    max_static_time_ms: 500,
    max_simultaneous_touches: 2,
    touch_timeout_ms: 1_000,
    gesture_timeout_ms: 500,
    require_gesture: false,
    edge_swipe_threshold: 50,
    swipe_min_distance: 150,
    debounce_time_ms: 0,
    pressure_threshold: 0,
};

/// Fields rewritten by environment calibration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Calibration {
    max_touch_area: u16,
    max_static_time_ms: u16,
    max_simultaneous_touches: u8,
    require_gesture: bool,
    pressure_threshold: Option<u16>,
}

const RESISTIVE_WET: Calibration = Calibration {
    max_touch_area: 60,
    max_static_time_ms: 400,
    max_simultaneous_touches: 1,
    require_gesture: true,
    pressure_threshold: Some(400),
};

const RESISTIVE_DRY: Calibration = Calibration {
    max_touch_area: 80,
    max_static_time_ms: 800,
    max_simultaneous_touches: 1,
    require_gesture: false,
    pressure_threshold: Some(300),
};

const CAPACITIVE_WET: Calibration = Calibration {
    max_touch_area: 30,
    max_static_time_ms: 300,
    max_simultaneous_touches: 1,
    require_gesture: true,
    pressure_threshold: None,
};

const CAPACITIVE_DRY: Calibration = Calibration {
    max_touch_area: 50,
    max_static_time_ms: 500,
    max_simultaneous_touches: 2,
    require_gesture: false,
    pressure_threshold: None,
};

impl Default for FilterConfig {
    fn default() -> Self {
        Self::for_panel(PanelKind::default())
    }
}

impl FilterConfig {
    pub const fn for_panel(panel: PanelKind) -> Self {
        match panel {
            PanelKind::Resistive => RESISTIVE_DEFAULTS,
            PanelKind::Capacitive => CAPACITIVE_DEFAULTS,
        }
    }

    /// Panel defaults with the wet or dry calibration applied on top.
    pub fn calibrated(panel: PanelKind, wet: bool) -> Self {
        let mut config = Self::for_panel(panel);
        config.calibrate(panel, wet);
        config
    }

    pub fn calibrate(&mut self, panel: PanelKind, wet: bool) {
        let calibration = match (panel, wet) {
            (PanelKind::Resistive, true) => RESISTIVE_WET,
            (PanelKind::Resistive, false) => RESISTIVE_DRY,
            (PanelKind::Capacitive, true) => CAPACITIVE_WET,
            (PanelKind::Capacitive, false) => CAPACITIVE_DRY,
        };
        self.max_touch_area = calibration.max_touch_area;
        self.max_static_time_ms = calibration.max_static_time_ms;
        self.max_simultaneous_touches = calibration.max_simultaneous_touches;
        self.require_gesture = calibration.require_gesture;
        if let Some(threshold) = calibration.pressure_threshold {
            self.pressure_threshold = threshold;
        }
    }

    /// Restores the panel-specific subset of the defaults, keeping timeouts and
    /// gesture geometry as they are.
    pub fn optimize_for_panel(&mut self, panel: PanelKind) {
        let defaults = Self::for_panel(panel);
        self.max_touch_area = defaults.max_touch_area;
        self.min_movement = defaults.min_movement;
        self.max_static_time_ms = defaults.max_static_time_ms;
        self.debounce_time_ms = defaults.debounce_time_ms;
        self.pressure_threshold = defaults.pressure_threshold;
        self.max_simultaneous_touches = defaults.max_simultaneous_touches;
    }

    /// Whether a sample built by [`TouchSample::with_pressure`] can clear both
    /// the pressure floor and the area limit. The wet resistive table cannot:
    /// pressure 400 already estimates area 80, above its limit of 60.
    /// Controllers that report a real contact area are unaffected.
    ///
    /// [`TouchSample::with_pressure`]: crate::TouchSample::with_pressure
    pub fn accepts_pressure_derived_area(&self) -> bool {
        self.pressure_threshold / PRESSURE_AREA_DIVISOR <= self.max_touch_area
    }

    pub fn validate(&self, screen: ScreenSize) -> Result<(), ConfigError> {
        if self.max_simultaneous_touches == 0 {
            return Err(ConfigError::NoTouchesAllowed);
        }
        if self.require_gesture {
            if self.gesture_timeout_ms == 0 {
                return Err(ConfigError::ZeroGestureTimeout);
            }
            // A swipe has to start left of the edge threshold and end on screen.
            let reach = u32::from(screen.width).saturating_sub(1);
            if u32::from(self.swipe_min_distance) >= reach {
                return Err(ConfigError::SwipeUnreachable {
                    distance: self.swipe_min_distance,
                    width: screen.width,
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    NoTouchesAllowed,
    ZeroGestureTimeout,
    SwipeUnreachable { distance: u16, width: u16 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTouchesAllowed => f.write_str("max_simultaneous_touches must be at least 1"),
            Self::ZeroGestureTimeout => {
                f.write_str("gesture_timeout_ms must be non-zero when a gesture is required")
            }
            Self::SwipeUnreachable { distance, width } => write!(
                f,
                "swipe_min_distance {distance} cannot be covered on a {width}px wide screen"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_tables_match_defaults() {
        let resistive = FilterConfig::for_panel(PanelKind::Resistive);
        assert_eq!(resistive.max_touch_area, 80);
        assert_eq!(resistive.debounce_time_ms, 50);
        assert_eq!(resistive.pressure_threshold, 300);
        assert_eq!(resistive.max_simultaneous_touches, 1);

        let capacitive = FilterConfig::default();
        assert_eq!(capacitive, CAPACITIVE_DEFAULTS);
        assert_eq!(capacitive.debounce_time_ms, 0);
        assert_eq!(capacitive.touch_timeout_ms, 1_000);
    }

    #[test]
    fn wet_calibration_tightens_capacitive() {
        let wet = FilterConfig::calibrated(PanelKind::Capacitive, true);
        assert_eq!(wet.max_touch_area, 30);
        assert_eq!(wet.max_static_time_ms, 300);
        assert_eq!(wet.max_simultaneous_touches, 1);
        assert!(wet.require_gesture);
        assert_eq!(wet.pressure_threshold, 0);
        assert_eq!(wet.min_movement, CAPACITIVE_DEFAULTS.min_movement);
    }

    #[test]
    fn dry_calibration_restores_resistive_pressure() {
        let mut config = FilterConfig::calibrated(PanelKind::Resistive, true);
        assert_eq!(config.pressure_threshold, 400);
        config.calibrate(PanelKind::Resistive, false);
        assert_eq!(config.pressure_threshold, 300);
        assert!(!config.require_gesture);
    }

    #[test]
    fn optimize_keeps_timeouts() {
        let mut config = FilterConfig::for_panel(PanelKind::Capacitive);
        config.touch_timeout_ms = 4_000;
        config.max_touch_area = 5;
        config.optimize_for_panel(PanelKind::Resistive);
        assert_eq!(config.touch_timeout_ms, 4_000);
        assert_eq!(config.max_touch_area, 80);
        assert_eq!(config.debounce_time_ms, 50);
    }

    #[test]
    fn pressure_derived_area_fits_dry_tables_only() {
        assert!(FilterConfig::for_panel(PanelKind::Resistive).accepts_pressure_derived_area());
        assert!(FilterConfig::calibrated(PanelKind::Capacitive, true).accepts_pressure_derived_area());
        assert!(FilterConfig::calibrated(PanelKind::Resistive, false).accepts_pressure_derived_area());

        let mut wet = FilterConfig::calibrated(PanelKind::Resistive, true);
        assert!(!wet.accepts_pressure_derived_area());
        wet.max_touch_area = 80;
        assert!(wet.accepts_pressure_derived_area());
    }

    #[test]
    fn validate_rejects_dead_configs() {
        let screen = ScreenSize::new(320, 240);
        let mut config = FilterConfig::default();
        assert_eq!(config.validate(screen), Ok(()));

        config.max_simultaneous_touches = 0;
        assert_eq!(config.validate(screen), Err(ConfigError::NoTouchesAllowed));

        let mut config = FilterConfig::calibrated(PanelKind::Capacitive, true);
        assert_eq!(config.validate(screen), Ok(()));
        assert!(config.validate(ScreenSize::new(120, 240)).is_err());
        config.gesture_timeout_ms = 0;
        assert_eq!(config.validate(screen), Err(ConfigError::ZeroGestureTimeout));
    }
}
