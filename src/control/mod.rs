//! Control module for the Aries robot
pub mod controllers;

use self::controllers::{PivotController, PivotServo};
use crate::config::PivotConfig;
use crate::error::{AriesError, Result};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use std::any::Any;

/// Control stack for the lidar pivot
pub struct ControlStack {
    base: LifecycleNodeBase,
    pivot: PivotController,
}

impl ControlStack {
    /// Create a new control stack
    pub fn new<S: PivotServo + 'static>(servo: S, config: &PivotConfig) -> Result<Self> {
        Ok(ControlStack {
            base: LifecycleNodeBase::new("control_stack"),
            pivot: PivotController::new(servo, config)?,
        })
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }

    /// Request a new pivot angle; only accepted while active
    pub fn set_pivot_angle(&mut self, angle: f64) -> Result<f64> {
        if !self.base.is_active() {
            return Err(AriesError::Lifecycle("control stack is not active".to_string()));
        }
        self.pivot.request_angle(angle)
    }

    /// Run one control cycle
    pub fn update(&mut self) -> Result<bool> {
        if !self.base.is_active() {
            return Ok(false);
        }
        self.pivot.step()
    }

    pub fn pivot_angle(&self) -> Result<f64> {
        self.pivot.current_angle()
    }
}

impl LifecycleNode for ControlStack {
    fn on_configure(&mut self) -> Result<()> {
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<()> {
        self.pivot.home()?;
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<()> {
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<()> {
        self.base.set_state(State::Unconfigured);
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
