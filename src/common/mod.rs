//! Common utilities and types for the Aries robot

/// Common types and utilities used across the codebase
pub mod types {
    /// A 2D point in meters
    pub type Point2D = nalgebra::Point2<f64>;

    /// A 2D displacement in meters
    pub type Vector2D = nalgebra::Vector2<f64>;
}

/// Angle helpers
pub mod angles {
    use std::f64::consts::FRAC_PI_2;

    /// Bearing of the "straight ahead" reference (90°)
    pub const RIGHT_ANGLE: f64 = FRAC_PI_2;

    /// True when `angle` lies within `tolerance` of 90°
    pub fn is_right_angle(angle: f64, tolerance: f64) -> bool {
        (angle - RIGHT_ANGLE).abs() <= tolerance
    }
}
