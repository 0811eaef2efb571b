//! Localization module

use super::beacon::Beacon;
use crate::common::angles::{is_right_angle, RIGHT_ANGLE};
use crate::common::types::{Point2D, Vector2D};
use crate::config::BeaconConfig;

/// Observer position in the beacon's world frame (meters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64) -> Self {
        Pose { x, y }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

impl From<Point2D> for Pose {
    fn from(point: Point2D) -> Self {
        Pose::new(point.x, point.y)
    }
}

/// Which side of the right post's perpendicular the observer is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearingCase {
    /// Right post bearing below 90°: observer left of the post
    LeftOfPost,
    /// Right post bearing at 90°: observer directly in front
    Ahead,
    /// Right post bearing above 90°: observer right of the post
    RightOfPost,
}

/// A localizer for the robot.
///
/// Recovers the observer position from the range and bearing of the right
/// post. Only valid while the sensor faces the beacon.
#[derive(Debug, Clone)]
pub struct Localizer {
    right_post_world: Point2D,
    right_angle_tolerance: f64,
}

impl Localizer {
    /// Create a new localizer anchored at the right post
    pub fn new(right_post_world: Point2D, right_angle_tolerance: f64) -> Self {
        Localizer {
            right_post_world,
            right_angle_tolerance,
        }
    }

    pub fn from_config(config: &BeaconConfig) -> Self {
        Self::new(
            config.right_post_world_location.to_point(),
            config.right_angle_tolerance,
        )
    }

    pub fn right_post_world(&self) -> Point2D {
        self.right_post_world
    }

    /// Classify a right post bearing against the 90° reference
    pub fn bearing_case(&self, bearing: f64) -> BearingCase {
        if is_right_angle(bearing, self.right_angle_tolerance) {
            BearingCase::Ahead
        } else if bearing < RIGHT_ANGLE {
            BearingCase::LeftOfPost
        } else {
            BearingCase::RightOfPost
        }
    }

    /// Compute the observer position from a matched beacon
    pub fn localize(&self, beacon: &Beacon) -> Pose {
        let range = beacon.right_post.range;
        let bearing = beacon.right_post.bearing;

        let offset = match self.bearing_case(bearing) {
            BearingCase::LeftOfPost => {
                let phi = RIGHT_ANGLE - bearing;
                Vector2D::new(-range * phi.sin(), range * phi.cos())
            }
            BearingCase::Ahead => Vector2D::new(0.0, range),
            BearingCase::RightOfPost => {
                let phi = bearing - RIGHT_ANGLE;
                Vector2D::new(range * phi.sin(), range * phi.cos())
            }
        };

        Pose::from(self.right_post_world + offset)
    }
}
