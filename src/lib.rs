pub mod common;
pub mod config;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod perception;

use crate::control::ControlStack;
use crate::error::Result;
use crate::lifecycle::LifecycleNode;
use crate::perception::PerceptionStack;

/// Core functionality for the Aries robot
pub struct AriesCore {
    components: Vec<Box<dyn LifecycleNode>>,
}

impl Default for AriesCore {
    fn default() -> Self {
        Self::new()
    }
}

impl AriesCore {
    /// Create a new instance of AriesCore
    pub fn new() -> Self {
        AriesCore {
            components: Vec::new(),
        }
    }

    /// Register a component with the core
    pub fn register<T: LifecycleNode + 'static>(&mut self, component: T) {
        self.components.push(Box::new(component));
    }

    /// Initialize all registered components
    pub fn init(&mut self) -> Result<()> {
        for component in &mut self.components {
            component.on_configure()?;
            component.on_activate()?;
        }
        Ok(())
    }

    /// Shutdown all registered components
    pub fn shutdown(&mut self) -> Result<()> {
        for component in &mut self.components {
            component.on_deactivate()?;
            component.on_cleanup()?;
        }
        Ok(())
    }

    /// Get a reference to the perception stack
    pub fn perception_stack_mut(&mut self) -> Option<&mut PerceptionStack> {
        self.components
            .iter_mut()
            .find_map(|component| component.as_any_mut().downcast_mut::<PerceptionStack>())
    }

    /// Get a reference to the control stack
    pub fn control_stack_mut(&mut self) -> Option<&mut ControlStack> {
        self.components
            .iter_mut()
            .find_map(|component| component.as_any_mut().downcast_mut::<ControlStack>())
    }
}
