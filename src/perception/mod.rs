//! Perception module for the Aries robot
pub mod beacon;
pub mod filters;
pub mod localization;
pub mod object;
pub mod pipeline;
pub mod scan;
pub mod segmentation;
pub mod sensors;

use self::localization::Pose;
use self::pipeline::{BeaconPipeline, ScanOutcome};
use self::scan::LaserScan;
use crate::config::BeaconConfig;
use crate::error::{AriesError, Result};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use log::warn;
use std::any::Any;

/// Perception stack for the robot
pub struct PerceptionStack {
    base: LifecycleNodeBase,
    config: BeaconConfig,
    pipeline: Option<BeaconPipeline>,
    last_pose: Option<Pose>,
}

impl PerceptionStack {
    /// Create a new perception stack
    pub fn new(config: BeaconConfig) -> Self {
        PerceptionStack {
            base: LifecycleNodeBase::new("perception_stack"),
            config,
            pipeline: None,
            last_pose: None,
        }
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }

    pub fn config(&self) -> &BeaconConfig {
        &self.config
    }

    /// Process one scan. Only accepted while active.
    pub fn process_scan(&mut self, scan: &LaserScan) -> Result<ScanOutcome> {
        if !self.base.is_active() {
            return Err(AriesError::Lifecycle(format!(
                "{} is {:?}, not accepting scans",
                self.base.name,
                self.base.get_state()
            )));
        }
        let pipeline = self.pipeline.as_ref().ok_or_else(|| {
            AriesError::Lifecycle(format!("{} has no pipeline", self.base.name))
        })?;

        match pipeline.process(scan) {
            Ok(outcome) => {
                if let Some(pose) = outcome.pose {
                    self.last_pose = Some(pose);
                }
                Ok(outcome)
            }
            Err(e) => {
                warn!("Scan rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Get the most recent position fix
    pub fn last_pose(&self) -> Option<Pose> {
        self.last_pose
    }
}

impl LifecycleNode for PerceptionStack {
    fn on_configure(&mut self) -> Result<()> {
        self.pipeline = Some(BeaconPipeline::new(&self.config)?);
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<()> {
        if self.pipeline.is_none() {
            return Err(AriesError::Lifecycle(
                "perception stack must be configured before activation".to_string(),
            ));
        }
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<()> {
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<()> {
        self.pipeline = None;
        self.last_pose = None;
        self.base.set_state(State::Unconfigured);
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beacon_scan() -> LaserScan {
        let mut ranges = vec![1.0; 360];
        for range in &mut ranges[100..=105] {
            *range = 0.5;
        }
        for range in &mut ranges[170..=176] {
            *range = 0.55;
        }
        LaserScan::new(0.0, std::f64::consts::TAU / 360.0, 12.0, ranges)
    }

    #[test]
    fn test_rejects_scans_until_active() {
        let mut stack = PerceptionStack::new(BeaconConfig::default());
        assert!(stack.process_scan(&beacon_scan()).is_err());

        stack.on_configure().unwrap();
        assert_eq!(stack.state(), State::Inactive);
        assert!(stack.process_scan(&beacon_scan()).is_err());

        stack.on_activate().unwrap();
        let outcome = stack.process_scan(&beacon_scan()).unwrap();
        assert!(outcome.pose.is_some());
        assert_eq!(stack.last_pose(), outcome.pose);
    }

    #[test]
    fn test_activate_requires_configure() {
        let mut stack = PerceptionStack::new(BeaconConfig::default());
        assert!(stack.on_activate().is_err());
        assert_eq!(stack.state(), State::Unconfigured);
    }

    #[test]
    fn test_configure_fails_on_bad_config() {
        let config = BeaconConfig {
            known_post_separation: 0.0,
            ..BeaconConfig::default()
        };
        let mut stack = PerceptionStack::new(config);
        assert!(stack.on_configure().is_err());
        assert_eq!(stack.state(), State::Unconfigured);
    }

    #[test]
    fn test_missed_beacon_keeps_last_pose() {
        let mut stack = PerceptionStack::new(BeaconConfig::default());
        stack.on_configure().unwrap();
        stack.on_activate().unwrap();

        let fix = stack.process_scan(&beacon_scan()).unwrap().pose;
        let flat = LaserScan::new(0.0, 0.01, 12.0, vec![1.0; 100]);
        let outcome = stack.process_scan(&flat).unwrap();

        assert!(outcome.pose.is_none());
        assert_eq!(stack.last_pose(), fix);
    }

    #[test]
    fn test_cleanup_resets() {
        let mut stack = PerceptionStack::new(BeaconConfig::default());
        stack.on_configure().unwrap();
        stack.on_activate().unwrap();
        stack.process_scan(&beacon_scan()).unwrap();
        stack.on_deactivate().unwrap();
        stack.on_cleanup().unwrap();

        assert_eq!(stack.state(), State::Unconfigured);
        assert!(stack.last_pose().is_none());
    }
}
