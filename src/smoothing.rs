use std::collections::VecDeque;

/// Weights applied newest to oldest once enough samples are held.
const CPU_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Smoothing {
    Uniform,
    Weighted,
}

/// Fixed-capacity window of recent samples; the oldest is evicted on overflow.
#[derive(Clone, Debug)]
pub struct SmoothingBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
    mode: Smoothing,
}

impl SmoothingBuffer {
    pub fn uniform(capacity: usize) -> Self {
        Self::new(capacity, Smoothing::Uniform)
    }

    pub fn weighted(capacity: usize) -> Self {
        Self::new(capacity, Smoothing::Weighted)
    }

    fn new(capacity: usize, mode: Smoothing) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            mode,
        }
    }

    pub fn push(&mut self, value: f64) -> f64 {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
        // Non-empty after the push above.
        self.smoothed().unwrap_or(value)
    }

    /// Current estimate, `None` until the first push.
    pub fn smoothed(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        if self.mode == Smoothing::Weighted && self.samples.len() >= CPU_WEIGHTS.len() {
            let weighted: f64 = self
                .samples
                .iter()
                .rev()
                .zip(CPU_WEIGHTS)
                .map(|(value, weight)| value * weight)
                .sum();
            return Some(weighted);
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
