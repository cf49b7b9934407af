// src/smoothing.rs - Moving-average smoothing over a raw integer stream
use std::collections::VecDeque;

/// Fixed-capacity moving-average buffer.
///
/// Holds the `window` most recent raw samples and reports their truncating
/// integer mean. Two independent instances smooth the pitch and velocity
/// streams; they are never shared.
#[derive(Debug, Clone)]
pub struct SmoothingBuffer {
    window: usize,
    samples: VecDeque<i32>,
}

impl SmoothingBuffer {
    /// `window` must be >= 1; validated by the session config before any
    /// buffer is constructed.
    pub fn new(window: usize) -> Self {
        debug_assert!(window >= 1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
        }
    }

    /// Append one raw sample, evicting the oldest at capacity, and return
    /// the mean of the current contents (integer division, truncating
    /// toward zero).
    pub fn push(&mut self, raw: i32) -> i32 {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(raw);

        let sum: i64 = self.samples.iter().map(|&v| v as i64).sum();
        (sum / self.samples.len() as i64) as i32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_over_partial_fill() {
        let mut buf = SmoothingBuffer::new(4);
        assert_eq!(buf.push(10), 10);
        assert_eq!(buf.push(20), 15);
        assert_eq!(buf.push(30), 20);
    }

    #[test]
    fn mean_truncates_toward_zero() {
        let mut buf = SmoothingBuffer::new(4);
        buf.push(10);
        // (10 + 11) / 2 = 10.5 -> 10
        assert_eq!(buf.push(11), 10);
    }

    #[test]
    fn oldest_sample_evicted_at_capacity() {
        let mut buf = SmoothingBuffer::new(3);
        buf.push(1);
        buf.push(2);
        buf.push(3);
        // window is full; the 1 falls out: (2 + 3 + 60) / 3 = 21
        assert_eq!(buf.push(60), 21);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn window_of_one_passes_through() {
        let mut buf = SmoothingBuffer::new(1);
        assert_eq!(buf.push(99), 99);
        assert_eq!(buf.push(3), 3);
        assert_eq!(buf.len(), 1);
    }
}
