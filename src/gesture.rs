//! Edge-swipe unlock gate.
//!
//! `Idle -> Waiting` on a contact near the left edge, `Waiting -> Active` once
//! the contact has travelled far enough to the right before the gesture
//! timeout, and `Active -> Idle` after [`ACTIVE_WINDOW_MS`].

use statig::blocking::IntoStateMachineExt as _;

mod hsm;

use hsm::{DispatchContext, GestureHsm, GestureHsmEvent};

use super::config::FilterConfig;
use super::types::TouchSample;

/// How long an unlock stays valid.
pub const ACTIVE_WINDOW_MS: u64 = 30_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GesturePhase {
    #[default]
    Idle,
    Waiting,
    Active,
}

impl GesturePhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Waiting => "WAITING",
            Self::Active => "ACTIVE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureLimits {
    pub edge_swipe_threshold: u16,
    pub swipe_min_distance: u16,
    pub gesture_timeout_ms: u16,
}

impl From<&FilterConfig> for GestureLimits {
    fn from(config: &FilterConfig) -> Self {
        Self {
            edge_swipe_threshold: config.edge_swipe_threshold,
            swipe_min_distance: config.swipe_min_distance,
            gesture_timeout_ms: config.gesture_timeout_ms,
        }
    }
}

pub struct GestureGate {
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl Default for GestureGate {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureGate {
    pub fn new() -> Self {
        Self {
            machine: GestureHsm::new().state_machine(),
        }
    }

    /// Feeds one touch through the gate and reports whether touches are
    /// currently allowed through.
    pub fn validate(&mut self, sample: &TouchSample, limits: GestureLimits) -> bool {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(
            &GestureHsmEvent::Touch {
                sample: *sample,
                limits,
            },
            &mut context,
        );
        context.active
    }

    pub fn expire(&mut self, now_ms: u64) {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureHsmEvent::Expire { now_ms }, &mut context);
    }

    pub fn reset(&mut self) {
        self.machine = GestureHsm::new().state_machine();
    }

    pub fn phase(&self) -> GesturePhase {
        self.machine.inner().phase
    }

    pub fn is_active(&self) -> bool {
        self.phase() == GesturePhase::Active
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        match self.phase() {
            GesturePhase::Idle => None,
            _ => Some(self.machine.inner().deadline_ms),
        }
    }

    pub fn start_point(&self) -> Option<TouchSample> {
        self.machine.inner().start
    }
}
