//! Filtering algorithms for sensor data

/// A generic filter interface
pub trait Filter<T> {
    /// Filter the input data
    fn filter(&self, input: T) -> T;
}

/// Clamps range readings to a trusted ceiling.
///
/// Out-of-range, infinite and NaN returns all collapse to the ceiling, so a
/// distant background reads as flat instead of as a wall of edges.
#[derive(Debug, Clone, Copy)]
pub struct RangeClamp {
    max_trusted_range: f64,
}

impl RangeClamp {
    /// Create a new clamp with the given ceiling
    pub fn new(max_trusted_range: f64) -> Self {
        RangeClamp { max_trusted_range }
    }

    pub fn max_trusted_range(&self) -> f64 {
        self.max_trusted_range
    }

    /// Clamp a single reading
    #[inline]
    pub fn clamp(&self, range: f64) -> f64 {
        // f64::min returns the other operand for NaN
        range.min(self.max_trusted_range)
    }
}

impl Filter<f64> for RangeClamp {
    fn filter(&self, input: f64) -> f64 {
        self.clamp(input)
    }
}

impl Filter<Vec<f64>> for RangeClamp {
    fn filter(&self, mut input: Vec<f64>) -> Vec<f64> {
        for range in input.iter_mut() {
            *range = self.clamp(*range);
        }
        input
    }
}
