//! Laser scans and their normalized range frames.

use super::filters::{Filter, RangeClamp};
use crate::error::{AriesError, Result};

/// Raw scan as delivered by the range sensor.
///
/// Mirrors the fields of `sensor_msgs/LaserScan` the core cares about.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LaserScan {
    /// Start angle in radians
    pub angle_min: f64,
    /// End angle in radians
    pub angle_max: f64,
    /// Angular resolution (radians between consecutive readings)
    pub angle_increment: f64,
    /// Minimum valid range in meters
    pub range_min: f64,
    /// Maximum valid range in meters
    pub range_max: f64,
    /// Range measurements in meters
    pub ranges: Vec<f64>,
}

impl LaserScan {
    /// Create a new laser scan spanning `ranges.len()` samples from `angle_min`
    pub fn new(angle_min: f64, angle_increment: f64, range_max: f64, ranges: Vec<f64>) -> Self {
        let angle_max = angle_min + angle_increment * ranges.len().saturating_sub(1) as f64;
        LaserScan {
            angle_min,
            angle_max,
            angle_increment,
            range_min: 0.0,
            range_max,
            ranges,
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Copy of this scan with `range_max` lowered to the trusted ceiling.
    ///
    /// Visualization only; ranges are left untouched.
    pub fn diagnostic_echo(&self, max_trusted_range: f64) -> LaserScan {
        LaserScan {
            range_max: max_trusted_range,
            ..self.clone()
        }
    }
}

/// Immutable, clamped view of one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFrame {
    ranges: Vec<f64>,
    angle_min: f64,
    angle_increment: f64,
    range_max_clamp: f64,
}

impl RangeFrame {
    /// Normalize a raw scan: every reading becomes `min(reading, max_trusted_range)`.
    ///
    /// Fails fast on scans with fewer than two samples or a non-positive
    /// angle increment.
    pub fn normalize(scan: &LaserScan, max_trusted_range: f64) -> Result<Self> {
        if scan.ranges.len() < 2 {
            return Err(AriesError::DegenerateScan(format!(
                "scan has {} sample(s), need at least 2",
                scan.ranges.len()
            )));
        }
        if !(scan.angle_increment > 0.0) || !scan.angle_increment.is_finite() {
            return Err(AriesError::DegenerateScan(format!(
                "angle increment must be positive and finite, got {}",
                scan.angle_increment
            )));
        }

        let clamp = RangeClamp::new(max_trusted_range);
        Ok(RangeFrame {
            ranges: clamp.filter(scan.ranges.clone()),
            angle_min: scan.angle_min,
            angle_increment: scan.angle_increment,
            range_max_clamp: clamp.max_trusted_range(),
        })
    }

    pub fn ranges(&self) -> &[f64] {
        &self.ranges
    }

    pub fn range(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn angle_min(&self) -> f64 {
        self.angle_min
    }

    pub fn angle_increment(&self) -> f64 {
        self.angle_increment
    }

    pub fn range_max_clamp(&self) -> f64 {
        self.range_max_clamp
    }

    /// Sensor-frame angle of sample `index`
    pub fn angle_at(&self, index: usize) -> f64 {
        self.angle_min + index as f64 * self.angle_increment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn test_normalize_clamps_without_mutating_source() {
        let scan = LaserScan::new(0.0, 0.1, 5.0, vec![0.5, 2.0, f64::INFINITY, 1.0]);
        let frame = RangeFrame::normalize(&scan, 1.25).unwrap();

        assert_eq!(frame.ranges(), &[0.5, 1.25, 1.25, 1.0]);
        assert_eq!(scan.ranges[1], 2.0);
        assert!(scan.ranges[2].is_infinite());
        assert_eq!(frame.range_max_clamp(), 1.25);
    }

    #[test]
    fn test_single_sample_is_degenerate() {
        let scan = LaserScan::new(0.0, 0.1, 5.0, vec![1.0]);
        let err = RangeFrame::normalize(&scan, 1.25).unwrap_err();
        assert!(matches!(err, AriesError::DegenerateScan(_)));
    }

    #[test]
    fn test_empty_scan_is_degenerate() {
        let scan = LaserScan::default();
        assert!(RangeFrame::normalize(&scan, 1.25).is_err());
    }

    #[test]
    fn test_non_positive_increment_is_degenerate() {
        let scan = LaserScan::new(0.0, 0.0, 5.0, vec![1.0, 1.0]);
        assert!(RangeFrame::normalize(&scan, 1.25).is_err());

        let scan = LaserScan::new(0.0, -0.1, 5.0, vec![1.0, 1.0]);
        assert!(RangeFrame::normalize(&scan, 1.25).is_err());

        let scan = LaserScan::new(0.0, f64::NAN, 5.0, vec![1.0, 1.0]);
        assert!(RangeFrame::normalize(&scan, 1.25).is_err());
    }

    #[test]
    fn test_angle_at() {
        let scan = LaserScan::new(-1.0, TAU / 360.0, 5.0, vec![1.0; 360]);
        let frame = RangeFrame::normalize(&scan, 1.25).unwrap();
        assert_eq!(frame.angle_at(0), -1.0);
        assert!((frame.angle_at(180) - (-1.0 + std::f64::consts::PI)).abs() < 1e-12);
    }

    #[test]
    fn test_diagnostic_echo_only_touches_range_max() {
        let scan = LaserScan::new(0.0, 0.1, 12.0, vec![3.0, 0.4]);
        let echo = scan.diagnostic_echo(1.25);

        assert_eq!(echo.range_max, 1.25);
        assert_eq!(echo.ranges, scan.ranges);
        assert_eq!(echo.angle_increment, scan.angle_increment);
        assert_eq!(scan.range_max, 12.0);
    }
}
