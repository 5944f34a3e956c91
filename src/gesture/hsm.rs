use statig::prelude::*;

use super::{GestureLimits, GesturePhase, ACTIVE_WINDOW_MS};
use crate::types::TouchSample;

#[derive(Clone, Copy, Debug)]
pub(super) enum GestureHsmEvent {
    Touch {
        sample: TouchSample,
        limits: GestureLimits,
    },
    Expire {
        now_ms: u64,
    },
}

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct DispatchContext {
    pub(super) active: bool,
}

pub(super) struct GestureHsm {
    pub(super) phase: GesturePhase,
    pub(super) deadline_ms: u64,
    pub(super) start: Option<TouchSample>,
}

impl GestureHsm {
    pub(super) fn new() -> Self {
        Self {
            phase: GesturePhase::Idle,
            deadline_ms: 0,
            start: None,
        }
    }

    fn enter_idle(&mut self) {
        self.phase = GesturePhase::Idle;
        self.deadline_ms = 0;
        self.start = None;
    }

    fn expired(&self, now_ms: u64) -> bool {
        now_ms > self.deadline_ms
    }
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        context.active = false;
        match event {
            GestureHsmEvent::Touch { sample, limits } => {
                if i32::from(sample.x) < i32::from(limits.edge_swipe_threshold) {
                    self.phase = GesturePhase::Waiting;
                    self.deadline_ms = sample
                        .timestamp_ms
                        .saturating_add(u64::from(limits.gesture_timeout_ms));
                    self.start = Some(*sample);
                    log::debug!(
                        "gesture: edge contact x={} deadline={}",
                        sample.x,
                        self.deadline_ms
                    );
                    return Transition(State::waiting());
                }
                Handled
            }
            GestureHsmEvent::Expire { .. } => Handled,
        }
    }

    #[state]
    fn waiting(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        context.active = false;
        match event {
            GestureHsmEvent::Touch { sample, limits } => {
                if self.expired(sample.timestamp_ms) {
                    log::debug!("gesture: swipe timed out");
                    self.enter_idle();
                    return Transition(State::idle());
                }
                let start_x = self.start.map_or(0, |start| i32::from(start.x));
                if i32::from(sample.x) - start_x > i32::from(limits.swipe_min_distance) {
                    self.phase = GesturePhase::Active;
                    self.deadline_ms = sample.timestamp_ms.saturating_add(ACTIVE_WINDOW_MS);
                    context.active = true;
                    log::info!("gesture: unlocked until {}", self.deadline_ms);
                    return Transition(State::active());
                }
                Handled
            }
            GestureHsmEvent::Expire { now_ms } => {
                if self.expired(*now_ms) {
                    self.enter_idle();
                    return Transition(State::idle());
                }
                Handled
            }
        }
    }

    #[state]
    fn active(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        let now_ms = match event {
            GestureHsmEvent::Touch { sample, .. } => sample.timestamp_ms,
            GestureHsmEvent::Expire { now_ms } => *now_ms,
        };
        if self.expired(now_ms) {
            log::info!("gesture: unlock window closed");
            self.enter_idle();
            context.active = false;
            return Transition(State::idle());
        }
        context.active = true;
        Handled
    }
}
