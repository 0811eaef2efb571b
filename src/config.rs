//! Configuration loading for the Aries core
//!
//! Every tunable threshold lives here as an explicit value that is handed to
//! the pipeline at construction. Files are TOML; missing sections and fields
//! fall back to the values the beacon hardware was built with.

use crate::common::types::Point2D;
use crate::error::{AriesError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct AriesConfig {
    #[serde(default)]
    pub beacon: BeaconConfig,
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub pivot: PivotConfig,
}

/// A fixed location in the beacon's world frame (meters)
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct WorldLocation {
    pub x: f64,
    pub y: f64,
}

impl WorldLocation {
    pub fn new(x: f64, y: f64) -> Self {
        WorldLocation { x, y }
    }

    pub fn to_point(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Beacon geometry and scan segmentation thresholds
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BeaconConfig {
    /// Distance between the two posts of the beacon (m)
    pub known_post_separation: f64,

    /// Allowed deviation from `known_post_separation`, inclusive (m)
    pub separation_tolerance: f64,

    /// Readings beyond this range are clamped to it before segmentation (m)
    pub max_trusted_range: f64,

    /// Minimum adjacent-sample delta that registers as an edge (m)
    pub edge_threshold: f64,

    /// Minimum samples between a right and a left edge for a trusted object
    pub min_span_width: usize,

    /// World coordinate of the right post; the localization anchor
    pub right_post_world_location: WorldLocation,

    /// World coordinate of the left post
    pub left_post_world_location: WorldLocation,

    /// Band (rad) around 90° that is treated as "directly ahead"
    pub right_angle_tolerance: f64,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        BeaconConfig {
            known_post_separation: 0.6096,
            separation_tolerance: 0.025,
            max_trusted_range: 1.25,
            edge_threshold: 0.025,
            min_span_width: 2,
            right_post_world_location: WorldLocation::new(0.9144, 0.0),
            left_post_world_location: WorldLocation::new(0.3175, 0.0),
            right_angle_tolerance: 1e-9,
        }
    }
}

impl BeaconConfig {
    /// Check that every threshold is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.known_post_separation > 0.0) {
            return Err(AriesError::Config(
                "known_post_separation must be positive".to_string(),
            ));
        }
        if !(self.separation_tolerance >= 0.0) {
            return Err(AriesError::Config(
                "separation_tolerance must be non-negative".to_string(),
            ));
        }
        if !(self.max_trusted_range > 0.0) {
            return Err(AriesError::Config(
                "max_trusted_range must be positive".to_string(),
            ));
        }
        if !(self.edge_threshold > 0.0) {
            return Err(AriesError::Config(
                "edge_threshold must be positive".to_string(),
            ));
        }
        if self.min_span_width < 1 {
            return Err(AriesError::Config(
                "min_span_width must be at least 1".to_string(),
            ));
        }
        if !(self.right_angle_tolerance >= 0.0) {
            return Err(AriesError::Config(
                "right_angle_tolerance must be non-negative".to_string(),
            ));
        }
        let right = self.right_post_world_location;
        if !(right.x.is_finite() && right.y.is_finite()) {
            return Err(AriesError::Config(
                "right_post_world_location must be finite".to_string(),
            ));
        }
        let left = self.left_post_world_location;
        if !(left.x.is_finite() && left.y.is_finite()) {
            return Err(AriesError::Config(
                "left_post_world_location must be finite".to_string(),
            ));
        }
        let surveyed = self.surveyed_post_separation();
        if (surveyed - self.known_post_separation).abs() > self.separation_tolerance {
            return Err(AriesError::Config(format!(
                "post locations are {:.4} m apart, outside {} ± {} m",
                surveyed, self.known_post_separation, self.separation_tolerance
            )));
        }
        Ok(())
    }

    /// Distance between the configured post locations
    pub fn surveyed_post_separation(&self) -> f64 {
        let right = self.right_post_world_location.to_point();
        let left = self.left_post_world_location.to_point();
        nalgebra::distance(&right, &left)
    }

    /// Apply named numeric overrides, then re-validate
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<()> {
        let mut updated = self.clone();

        for (name, &value) in params {
            match name.as_str() {
                "known_post_separation" => updated.known_post_separation = value,
                "separation_tolerance" => updated.separation_tolerance = value,
                "max_trusted_range" => updated.max_trusted_range = value,
                "edge_threshold" => updated.edge_threshold = value,
                "min_span_width" => {
                    if value < 1.0 || value.fract() != 0.0 {
                        return Err(AriesError::Config(format!(
                            "min_span_width must be a positive whole number, got {}",
                            value
                        )));
                    }
                    updated.min_span_width = value as usize;
                }
                "right_post_x" => updated.right_post_world_location.x = value,
                "right_post_y" => updated.right_post_world_location.y = value,
                "left_post_x" => updated.left_post_world_location.x = value,
                "left_post_y" => updated.left_post_world_location.y = value,
                "right_angle_tolerance" => updated.right_angle_tolerance = value,
                other => {
                    return Err(AriesError::Config(format!(
                        "Unknown beacon parameter '{}'",
                        other
                    )))
                }
            }
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

/// Topic names and loop rate for the ROS 2 node
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    pub scan_topic: String,
    pub vis_scan_topic: String,
    pub position_topic: String,
    pub frame_id: String,
    pub publish_vis_scan: bool,
    pub rate_hz: f64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            scan_topic: "scan".to_string(),
            vis_scan_topic: "vis_scan".to_string(),
            position_topic: "beacon_position".to_string(),
            frame_id: "map".to_string(),
            publish_vis_scan: true,
            rate_hz: 10.0,
        }
    }
}

/// Lidar pivot set-point follower settings
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PivotConfig {
    /// Angle the pivot is homed to on activation (rad)
    pub initial_angle: f64,
    pub min_angle: f64,
    pub max_angle: f64,
    pub rate_hz: f64,
}

impl Default for PivotConfig {
    fn default() -> Self {
        PivotConfig {
            initial_angle: 0.0,
            min_angle: -std::f64::consts::PI,
            max_angle: std::f64::consts::PI,
            rate_hz: 10.0,
        }
    }
}

impl PivotConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_angle <= self.max_angle) {
            return Err(AriesError::Config(
                "pivot min_angle must not exceed max_angle".to_string(),
            ));
        }
        if self.initial_angle < self.min_angle || self.initial_angle > self.max_angle {
            return Err(AriesError::Config(format!(
                "pivot initial_angle {} outside [{}, {}]",
                self.initial_angle, self.min_angle, self.max_angle
            )));
        }
        if !(self.rate_hz > 0.0) {
            return Err(AriesError::Config(
                "pivot rate_hz must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl AriesConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AriesConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.beacon.validate()?;
        self.pivot.validate()?;
        if !(self.node.rate_hz > 0.0) {
            return Err(AriesError::Config("node rate_hz must be positive".to_string()));
        }
        Ok(())
    }
}
