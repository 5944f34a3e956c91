use super::FilterEngine;
use crate::types::{TouchEvent, TouchSample};

/// A contact that has not reported for longer than this is considered lifted.
pub const RELEASE_TIMEOUT_MS: u64 = 100;

/// Receives lifecycle events for accepted touches. Every hook is optional.
pub trait TouchListener {
    fn on_start(&mut self, _x: i16, _y: i16) {}
    fn on_move(&mut self, _x: i16, _y: i16) {}
    fn on_end(&mut self, _x: i16, _y: i16) {}
}

/// Plain function-pointer hooks.
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchCallbacks {
    pub on_start: Option<fn(i16, i16)>,
    pub on_move: Option<fn(i16, i16)>,
    pub on_end: Option<fn(i16, i16)>,
}

impl TouchCallbacks {
    pub fn set_start_callback(&mut self, callback: fn(i16, i16)) {
        self.on_start = Some(callback);
    }

    pub fn set_move_callback(&mut self, callback: fn(i16, i16)) {
        self.on_move = Some(callback);
    }

    pub fn set_end_callback(&mut self, callback: fn(i16, i16)) {
        self.on_end = Some(callback);
    }
}

impl TouchListener for TouchCallbacks {
    fn on_start(&mut self, x: i16, y: i16) {
        if let Some(callback) = self.on_start {
            callback(x, y);
        }
    }

    fn on_move(&mut self, x: i16, y: i16) {
        if let Some(callback) = self.on_move {
            callback(x, y);
        }
    }

    fn on_end(&mut self, x: i16, y: i16) {
        if let Some(callback) = self.on_end {
            callback(x, y);
        }
    }
}

/// Filters touches and dispatches their lifecycle to a listener in the same
/// call.
pub struct TouchEventHandler<L> {
    filter: FilterEngine,
    listener: L,
    last_touch: Option<TouchSample>,
    last_event: TouchEvent,
}

impl<L: TouchListener> TouchEventHandler<L> {
    pub fn new(filter: FilterEngine, listener: L) -> Self {
        Self {
            filter,
            listener,
            last_touch: None,
            last_event: TouchEvent::None,
        }
    }

    pub fn handle_touch(&mut self, x: i16, y: i16, now_ms: u64) -> TouchEvent {
        self.handle_sample(TouchSample::new(x, y, now_ms))
    }

    /// Returns the dispatched event, `TouchEvent::None` for rejected samples.
    pub fn handle_sample(&mut self, sample: TouchSample) -> TouchEvent {
        if !self.filter.process_touch(sample) {
            return TouchEvent::None;
        }
        let event = self.filter.touch_event(&sample);
        match event {
            TouchEvent::Start => self.listener.on_start(sample.x, sample.y),
            TouchEvent::Move => self.listener.on_move(sample.x, sample.y),
            TouchEvent::End => self.listener.on_end(sample.x, sample.y),
            TouchEvent::None => {}
        }
        self.last_event = event;
        self.last_touch = Some(sample);
        event
    }

    /// Ticks the filter and closes a contact that went quiet.
    pub fn update(&mut self, now_ms: u64) {
        self.filter.tick(now_ms);
        let Some(last) = self.last_touch else {
            return;
        };
        if now_ms.saturating_sub(last.timestamp_ms) > RELEASE_TIMEOUT_MS {
            let _ = self.filter.touch_event(&TouchSample::released(now_ms));
            self.listener.on_end(last.x, last.y);
            self.last_touch = None;
            self.last_event = TouchEvent::End;
        }
    }

    pub fn last_event(&self) -> TouchEvent {
        self.last_event
    }

    pub fn filter(&self) -> &FilterEngine {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterEngine {
        &mut self.filter
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_parts(self) -> (FilterEngine, L) {
        (self.filter, self.listener)
    }
}
