use heapless::HistoryBuffer;

use super::types::TouchSample;

pub const HISTORY_CAPACITY: usize = 20;

/// Last accepted samples; the newest overwrites the oldest once full.
pub struct TouchHistory {
    samples: HistoryBuffer<TouchSample, HISTORY_CAPACITY>,
}

impl Default for TouchHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchHistory {
    pub const fn new() -> Self {
        Self {
            samples: HistoryBuffer::new(),
        }
    }

    pub fn push(&mut self, sample: TouchSample) {
        self.samples.write(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.len() == 0
    }

    pub fn latest(&self) -> Option<&TouchSample> {
        self.samples.recent()
    }

    /// Stored samples in storage order. Callers that only count matches do not
    /// need chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &TouchSample> {
        self.samples.as_slice().iter()
    }

    pub fn oldest_first(&self) -> impl Iterator<Item = &TouchSample> {
        self.samples.oldest_ordered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_oldest_when_full() {
        let mut history = TouchHistory::new();
        assert!(history.is_empty());
        for t in 0..(HISTORY_CAPACITY as u64 + 3) {
            history.push(TouchSample::new(t as i16, 0, t));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.latest().map(|s| s.timestamp_ms), Some(22));
        assert_eq!(history.oldest_first().next().map(|s| s.timestamp_ms), Some(3));
        assert!(history.iter().all(|s| s.timestamp_ms >= 3));

        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }
}
