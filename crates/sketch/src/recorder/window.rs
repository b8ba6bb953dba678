//! Fixed-size window of the most recent samples.

use crate::constants::CURVE_WINDOW_LEN;
use crate::types::Sample;

/// Up to four samples in arrival order, stored inline.
///
/// Pushing onto a full window evicts the oldest sample first, so the length
/// never leaves `0..=4`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointWindow {
    samples: [Sample; CURVE_WINDOW_LEN],
    len: usize,
}

impl PointWindow {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == CURVE_WINDOW_LEN
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, sample: Sample) {
        if self.is_full() {
            self.evict_oldest();
        }
        self.samples[self.len] = sample;
        self.len += 1;
    }

    /// Drop the oldest sample, if any
    pub fn evict_oldest(&mut self) {
        if self.len == 0 {
            return;
        }
        self.samples[..self.len].rotate_left(1);
        self.len -= 1;
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples[..self.len]
    }

    /// The four samples of a full window, oldest first
    pub fn full(&self) -> Option<&[Sample; CURVE_WINDOW_LEN]> {
        if self.is_full() {
            Some(&self.samples)
        } else {
            None
        }
    }
}
