//! Controllers for the lidar pivot

use crate::config::PivotConfig;
use crate::error::{AriesError, Result};
use log::debug;

/// A single-axis, position-controlled servo
pub trait PivotServo: Send + Sync {
    /// Command an absolute angle (rad)
    fn move_angle(&mut self, angle: f64) -> Result<()>;

    /// Read back the current angle (rad)
    fn read_angle(&self) -> Result<f64>;
}

/// Servo stand-in that reaches every commanded angle immediately
#[derive(Debug, Clone, Default)]
pub struct SimulatedServo {
    angle: f64,
}

impl SimulatedServo {
    pub fn new(angle: f64) -> Self {
        SimulatedServo { angle }
    }
}

impl PivotServo for SimulatedServo {
    fn move_angle(&mut self, angle: f64) -> Result<()> {
        if !angle.is_finite() {
            return Err(AriesError::Actuator(format!("invalid angle {}", angle)));
        }
        self.angle = angle;
        Ok(())
    }

    fn read_angle(&self) -> Result<f64> {
        Ok(self.angle)
    }
}

/// Set-point follower for the lidar pivot.
///
/// A requested angle is sent to the servo on the next `step`, once.
pub struct PivotController {
    servo: Box<dyn PivotServo>,
    initial_angle: f64,
    min_angle: f64,
    max_angle: f64,
    target_angle: f64,
    move_request: bool,
}

impl PivotController {
    /// Create a new controller
    pub fn new<S: PivotServo + 'static>(servo: S, config: &PivotConfig) -> Result<Self> {
        config.validate()?;
        Ok(PivotController {
            servo: Box::new(servo),
            initial_angle: config.initial_angle,
            min_angle: config.min_angle,
            max_angle: config.max_angle,
            target_angle: config.initial_angle,
            move_request: false,
        })
    }

    /// Send the servo to its initial angle
    pub fn home(&mut self) -> Result<()> {
        self.target_angle = self.initial_angle;
        self.move_request = false;
        self.servo.move_angle(self.initial_angle)
    }

    /// Request a new target; clamped into the configured range
    pub fn request_angle(&mut self, angle: f64) -> Result<f64> {
        if !angle.is_finite() {
            return Err(AriesError::Actuator(format!(
                "target angle must be finite, got {}",
                angle
            )));
        }
        self.target_angle = angle.clamp(self.min_angle, self.max_angle);
        self.move_request = true;
        Ok(self.target_angle)
    }

    /// Forward a pending request to the servo. Returns whether a move was sent.
    pub fn step(&mut self) -> Result<bool> {
        if !self.move_request {
            return Ok(false);
        }
        self.move_request = false;
        debug!("pivot -> {:.3} rad", self.target_angle);
        self.servo.move_angle(self.target_angle)?;
        Ok(true)
    }

    pub fn target_angle(&self) -> f64 {
        self.target_angle
    }

    pub fn is_move_pending(&self) -> bool {
        self.move_request
    }

    /// Current angle as reported by the servo
    pub fn current_angle(&self) -> Result<f64> {
        self.servo.read_angle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PivotController {
        PivotController::new(SimulatedServo::new(0.3), &PivotConfig::default()).unwrap()
    }

    #[test]
    fn test_home_moves_to_initial_angle() {
        let mut controller = controller();
        assert_eq!(controller.current_angle().unwrap(), 0.3);
        controller.home().unwrap();
        assert_eq!(controller.current_angle().unwrap(), 0.0);
    }

    #[test]
    fn test_request_is_sent_once() {
        let mut controller = controller();
        controller.request_angle(0.8).unwrap();
        assert!(controller.is_move_pending());

        assert!(controller.step().unwrap());
        assert!(!controller.step().unwrap());
        assert_eq!(controller.current_angle().unwrap(), 0.8);
    }

    #[test]
    fn test_latest_request_wins() {
        let mut controller = controller();
        controller.request_angle(0.2).unwrap();
        controller.request_angle(-0.4).unwrap();
        controller.step().unwrap();
        assert_eq!(controller.current_angle().unwrap(), -0.4);
    }

    #[test]
    fn test_request_is_clamped() {
        let config = PivotConfig {
            min_angle: -1.0,
            max_angle: 1.0,
            ..PivotConfig::default()
        };
        let mut controller = PivotController::new(SimulatedServo::default(), &config).unwrap();
        assert_eq!(controller.request_angle(2.5).unwrap(), 1.0);
        assert_eq!(controller.request_angle(-7.0).unwrap(), -1.0);
        assert_eq!(controller.target_angle(), -1.0);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let config = PivotConfig {
            min_angle: 1.0,
            max_angle: -1.0,
            ..PivotConfig::default()
        };
        assert!(PivotController::new(SimulatedServo::default(), &config).is_err());
    }

    #[test]
    fn test_rejects_non_finite_request() {
        let mut controller = controller();
        assert!(controller.request_angle(f64::NAN).is_err());
        assert!(!controller.is_move_pending());
    }
}
