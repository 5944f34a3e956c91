use crate::types::{TouchEvent, TouchSample};
use crate::utils::abs_diff_i16;

/// Derives Start/Move/End from consecutive accepted samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct LifecycleTracker {
    anchor: Option<TouchSample>,
}

impl LifecycleTracker {
    pub const fn new() -> Self {
        Self { anchor: None }
    }

    pub fn is_pressed(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn reset(&mut self) {
        self.anchor = None;
    }

    /// The anchor only advances on Start and Move, so slow drift accumulates
    /// until it crosses `min_movement`.
    pub fn classify(&mut self, sample: &TouchSample, min_movement: u16) -> TouchEvent {
        if !sample.valid {
            return if self.anchor.take().is_some() {
                TouchEvent::End
            } else {
                TouchEvent::None
            };
        }
        let Some(anchor) = self.anchor else {
            self.anchor = Some(*sample);
            return TouchEvent::Start;
        };
        if abs_diff_i16(sample.x, anchor.x) > min_movement
            || abs_diff_i16(sample.y, anchor.y) > min_movement
        {
            self.anchor = Some(*sample);
            return TouchEvent::Move;
        }
        TouchEvent::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_move_end_sequence() {
        let mut tracker = LifecycleTracker::new();
        assert_eq!(
            tracker.classify(&TouchSample::released(0), 5),
            TouchEvent::None
        );
        assert_eq!(
            tracker.classify(&TouchSample::new(100, 100, 10), 5),
            TouchEvent::Start
        );
        assert_eq!(
            tracker.classify(&TouchSample::new(104, 103, 20), 5),
            TouchEvent::None
        );
        assert_eq!(
            tracker.classify(&TouchSample::new(106, 100, 30), 5),
            TouchEvent::Move
        );
        assert_eq!(
            tracker.classify(&TouchSample::new(108, 100, 40), 5),
            TouchEvent::None
        );
        assert!(tracker.is_pressed());
        assert_eq!(
            tracker.classify(&TouchSample::released(50), 5),
            TouchEvent::End
        );
        assert!(!tracker.is_pressed());
        assert_eq!(
            tracker.classify(&TouchSample::new(10, 10, 60), 5),
            TouchEvent::Start
        );
    }
}
