use core::fmt;

use fixed::types::U32F32;

mod handler;
mod lifecycle;
mod stats;

pub use handler::{TouchCallbacks, TouchEventHandler, TouchListener, RELEASE_TIMEOUT_MS};
pub use lifecycle::LifecycleTracker;
pub use stats::FilterStats;

use super::classify;
use super::config::FilterConfig;
use super::gesture::{GestureGate, GestureLimits, GesturePhase};
use super::history::TouchHistory;
use super::types::{
    BatchOutcome, FilterOutcome, PanelKind, RejectReason, ScreenSize, TouchEvent, TouchSample,
};
use super::utils::abs_diff_i16;
use super::zones::{ZoneCoord, ZoneGrid, ZONE_MAP_LEN};

/// Water rejection filter for one touch panel.
///
/// Drive it from a single control loop: feed samples through
/// [`process_touch`](Self::process_touch) or
/// [`process_multi_touch`](Self::process_multi_touch) and call
/// [`tick`](Self::tick) every iteration so zone and gesture state expire.
pub struct FilterEngine {
    screen: ScreenSize,
    panel: PanelKind,
    config: FilterConfig,
    zones: ZoneGrid,
    history: TouchHistory,
    gesture: GestureGate,
    stats: FilterStats,
    last_accepted: Option<TouchSample>,
    lifecycle: LifecycleTracker,
}

impl FilterEngine {
    pub fn new(width: u16, height: u16, panel: PanelKind) -> Self {
        Self {
            screen: ScreenSize::new(width, height),
            panel,
            config: FilterConfig::for_panel(panel),
            zones: ZoneGrid::new(),
            history: TouchHistory::new(),
            gesture: GestureGate::new(),
            stats: FilterStats::default(),
            last_accepted: None,
            lifecycle: LifecycleTracker::new(),
        }
    }

    /// Starts over with the panel's default configuration.
    pub fn begin(&mut self) {
        self.begin_with(FilterConfig::for_panel(self.panel));
    }

    /// Starts over with `config`, dropping history, zones, gesture progress,
    /// and statistics.
    pub fn begin_with(&mut self, config: FilterConfig) {
        self.config = config;
        self.zones.clear();
        self.history.clear();
        self.gesture.reset();
        self.stats.reset();
        self.last_accepted = None;
        self.lifecycle.reset();
        log::info!(
            "filter: begin panel={} screen={}x{} gesture={}",
            self.panel,
            self.screen.width,
            self.screen.height,
            config.require_gesture
        );
    }

    pub fn process_touch(&mut self, sample: TouchSample) -> bool {
        self.process(sample).is_accepted()
    }

    pub fn process_xy(&mut self, x: i16, y: i16, now_ms: u64) -> bool {
        self.process_touch(TouchSample::new(x, y, now_ms))
    }

    pub fn process_xy_pressure(&mut self, x: i16, y: i16, pressure: u16, now_ms: u64) -> bool {
        self.process_touch(TouchSample::with_pressure(x, y, pressure, now_ms))
    }

    pub fn process(&mut self, sample: TouchSample) -> FilterOutcome {
        let outcome = self.evaluate(&sample);
        match outcome {
            FilterOutcome::Accepted => {
                log::trace!("filter: accept x={} y={}", sample.x, sample.y);
            }
            FilterOutcome::Repeat => {
                log::trace!("filter: repeat x={} y={}", sample.x, sample.y);
            }
            FilterOutcome::Rejected(reason) => {
                log::debug!(
                    "filter: reject reason={} x={} y={} t={}",
                    reason,
                    sample.x,
                    sample.y,
                    sample.timestamp_ms
                );
            }
        }
        outcome
    }

    fn evaluate(&mut self, sample: &TouchSample) -> FilterOutcome {
        if !self.screen.contains(sample.x, sample.y) {
            return FilterOutcome::Rejected(RejectReason::OutOfBounds);
        }
        if !sample.valid {
            return FilterOutcome::Rejected(RejectReason::NoContact);
        }

        if self.panel == PanelKind::Resistive {
            if let Some(outcome) = self.resistive_gate(sample) {
                return outcome;
            }
        }

        if self.config.require_gesture
            && !self
                .gesture
                .validate(sample, GestureLimits::from(&self.config))
        {
            return FilterOutcome::Rejected(RejectReason::GestureLocked);
        }

        if let Some(reason) = classify::single_touch_signal(
            &self.zones,
            &self.history,
            self.screen,
            sample,
            &self.config,
        ) {
            self.stats.record_rejected();
            return FilterOutcome::Rejected(reason);
        }

        self.history.push(*sample);
        if let Some(coord) = ZoneCoord::of(self.screen, sample.x, sample.y) {
            self.zones.mark(coord, sample.timestamp_ms);
        }
        self.last_accepted = Some(*sample);
        self.stats.record_accepted();
        FilterOutcome::Accepted
    }

    /// Pressure floor and contact bounce. `None` lets the sample continue.
    fn resistive_gate(&self, sample: &TouchSample) -> Option<FilterOutcome> {
        let config = &self.config;
        if config.pressure_threshold > 0 && sample.pressure < config.pressure_threshold {
            return Some(FilterOutcome::Rejected(RejectReason::LowPressure));
        }
        if config.debounce_time_ms == 0 {
            return None;
        }
        let last = self.last_accepted?;
        let elapsed = sample.timestamp_ms.saturating_sub(last.timestamp_ms);
        if elapsed >= u64::from(config.debounce_time_ms) {
            return None;
        }
        let same_contact = abs_diff_i16(sample.x, last.x) < config.min_movement
            && abs_diff_i16(sample.y, last.y) < config.min_movement;
        Some(if same_contact {
            FilterOutcome::Repeat
        } else {
            FilterOutcome::Rejected(RejectReason::Bounce)
        })
    }

    pub fn process_multi_touch(&mut self, samples: &[TouchSample]) -> bool {
        self.process_batch(samples).is_accepted()
    }

    /// Judges simultaneous contacts as a group first; a water-like batch is
    /// rejected once, otherwise every sample goes through [`process`](Self::process)
    /// and keeps its own effects.
    pub fn process_batch(&mut self, samples: &[TouchSample]) -> BatchOutcome {
        if samples.len() > usize::from(self.config.max_simultaneous_touches) {
            self.stats.record_rejected();
            log::debug!(
                "filter: reject batch count={} max={}",
                samples.len(),
                self.config.max_simultaneous_touches
            );
            return BatchOutcome::Rejected(RejectReason::TooManyContacts);
        }

        if let Some(reason) = classify::batch_signal(samples) {
            self.stats.record_rejected();
            log::debug!("filter: reject batch reason={} count={}", reason, samples.len());
            return BatchOutcome::Rejected(reason);
        }

        let (mut accepted, mut rejected) = (0u8, 0u8);
        for sample in samples {
            if self.process(*sample).is_accepted() {
                accepted = accepted.saturating_add(1);
            } else {
                rejected = rejected.saturating_add(1);
            }
        }
        BatchOutcome::Filtered { accepted, rejected }
    }

    /// Call once per control-loop iteration.
    pub fn tick(&mut self, now_ms: u64) {
        let cleared = self
            .zones
            .sweep(now_ms, u64::from(self.config.touch_timeout_ms));
        if cleared > 0 {
            log::trace!("filter: cleared {} zones at {}", cleared, now_ms);
        }
        self.gesture.expire(now_ms);
    }

    /// Lifecycle view of accepted samples. Pass a sample with `valid == false`
    /// once the contact is gone. Has no effect on filtering.
    pub fn touch_event(&mut self, sample: &TouchSample) -> TouchEvent {
        self.lifecycle.classify(sample, self.config.min_movement)
    }

    pub fn config(&self) -> FilterConfig {
        self.config
    }

    pub fn set_config(&mut self, config: FilterConfig) {
        self.config = config;
    }

    pub fn set_max_touch_area(&mut self, area: u16) {
        self.config.max_touch_area = area;
    }

    pub fn set_require_gesture(&mut self, require: bool) {
        self.config.require_gesture = require;
        if !require {
            self.gesture.reset();
        }
    }

    pub fn enable_gesture_mode(&mut self) {
        self.config.require_gesture = true;
        self.gesture.reset();
    }

    pub fn disable_gesture_mode(&mut self) {
        self.config.require_gesture = false;
        self.gesture.reset();
    }

    pub fn reset_gesture(&mut self) {
        self.gesture.reset();
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_active()
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    pub fn calibrate_for_environment(&mut self, wet: bool) {
        self.config.calibrate(self.panel, wet);
        log::info!(
            "filter: calibrated panel={} wet={} max_area={} gesture={}",
            self.panel,
            wet,
            self.config.max_touch_area,
            self.config.require_gesture
        );
        if !self.config.accepts_pressure_derived_area() {
            log::warn!(
                "filter: pressure floor {} estimates area above {}; pressure-only samples will be rejected",
                self.config.pressure_threshold,
                self.config.max_touch_area
            );
        }
    }

    pub fn set_wet_mode(&mut self, enabled: bool) {
        self.calibrate_for_environment(enabled);
    }

    pub fn optimize_for_panel(&mut self) {
        log::info!("filter: optimizing for {} panel", self.panel);
        self.config.optimize_for_panel(self.panel);
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn set_screen_size(&mut self, width: u16, height: u16) {
        self.screen = ScreenSize::new(width, height);
    }

    pub fn panel(&self) -> PanelKind {
        self.panel
    }

    pub fn panel_name(&self) -> &'static str {
        self.panel.name()
    }

    pub fn is_resistive(&self) -> bool {
        self.panel == PanelKind::Resistive
    }

    pub fn is_capacitive(&self) -> bool {
        self.panel == PanelKind::Capacitive
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    pub fn accepted(&self) -> u32 {
        self.stats.accepted
    }

    pub fn rejected(&self) -> u32 {
        self.stats.rejected
    }

    pub fn rejection_rate_percent(&self) -> U32F32 {
        self.stats.rejection_rate_percent()
    }

    pub fn reset_statistics(&mut self) {
        self.stats.reset();
    }

    pub fn zones(&self) -> &ZoneGrid {
        &self.zones
    }

    pub fn history(&self) -> &TouchHistory {
        &self.history
    }

    pub fn zone_map(&self) -> heapless::String<ZONE_MAP_LEN> {
        self.zones.render()
    }

    pub fn debug_info(&self) -> DebugInfo {
        DebugInfo {
            panel: self.panel,
            accepted: self.stats.accepted,
            rejected: self.stats.rejected,
            rejection_rate: self.rejection_rate_percent(),
            gesture: self.gesture.phase(),
        }
    }
}

/// Snapshot for serial consoles and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugInfo {
    pub panel: PanelKind,
    pub accepted: u32,
    pub rejected: u32,
    pub rejection_rate: U32F32,
    pub gesture: GesturePhase,
}

impl fmt::Display for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.rejection_rate.to_bits();
        let whole = bits >> 32;
        let hundredths = ((bits & 0xFFFF_FFFF) * 100) >> 32;
        writeln!(f, "=== Water Rejection Debug Info ===")?;
        writeln!(f, "Screen Type: {}", self.panel)?;
        writeln!(f, "Valid touches: {}", self.accepted)?;
        writeln!(f, "Water droplets rejected: {}", self.rejected)?;
        writeln!(f, "Rejection rate: {whole}.{hundredths:02}%")?;
        write!(f, "Gesture state: {}", self.gesture.label())
    }
}
