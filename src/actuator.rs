//! Actuator forwarding boundary
//!
//! The consumer side of the drive core: reads the latest command from the
//! store on its own cadence and forwards it to whatever drives the motor
//! and steering servo. The core never retries a failed forward; if a
//! retry policy exists it belongs to the actuator implementation.

use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::drive::CommandStore;

/// Errors an actuator can report for a single forwarded command.
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    /// The actuator refused the command (out of range, interlocked, ...).
    #[error("Actuator rejected command: {0}")]
    Rejected(String),

    /// The link to the actuator failed.
    #[error("Actuator link error: {0}")]
    Link(String),
}

/// Sink for normalized drive commands.
pub trait DriveActuator: Send {
    /// Applies one command pair: speed in [-1, 1], steering in [0, 1].
    fn forward(&mut self, speed: f32, steering: f32) -> Result<(), ActuatorError>;

    /// Parks the drive train: motor stopped, steering centered.
    fn stop(&mut self) -> Result<(), ActuatorError> {
        self.forward(0.0, 0.5)
    }
}

/// Scaling from normalized commands to VESC-style duty/servo values.
///
/// `duty_for` caps the motor at `max_duty` and snaps very small speeds to
/// zero so the motor never creeps; `servo_for` compresses the steering
/// range into the servo's usable amplitude. Wire encoding and serial I/O
/// live outside this crate.
#[derive(Debug, Clone, Copy)]
pub struct VescScaling {
    /// Maximum duty cycle magnitude, 0.0 to 1.0.
    pub max_duty: f32,
    /// Servo position for full-left steering.
    pub servo_floor: f32,
    /// Usable servo span on top of the floor.
    pub servo_span: f32,
}

impl Default for VescScaling {
    fn default() -> Self {
        Self {
            max_duty: 0.3,
            servo_floor: 0.05,
            servo_span: 0.9,
        }
    }
}

impl VescScaling {
    /// Scaled duty-cycle value for a normalized speed.
    pub fn duty_for(&self, speed: f32) -> i32 {
        let speed = speed.clamp(-1.0, 1.0);
        if speed.abs() < 0.05 {
            return 0;
        }
        (speed * self.max_duty * 100_000.0) as i32
    }

    /// Servo position for a normalized steering value.
    pub fn servo_for(&self, steering: f32) -> f32 {
        self.servo_floor + steering.clamp(0.0, 1.0) * self.servo_span
    }
}

/// Simulation-style actuator: logs scaled commands instead of driving
/// hardware.
#[derive(Debug, Default)]
pub struct LogActuator {
    scaling: VescScaling,
}

impl LogActuator {
    pub fn new(scaling: VescScaling) -> Self {
        Self { scaling }
    }
}

impl DriveActuator for LogActuator {
    fn forward(&mut self, speed: f32, steering: f32) -> Result<(), ActuatorError> {
        debug!(
            "Forwarding: duty={} servo={:.4} (speed={:.2} steering={:.2})",
            self.scaling.duty_for(speed),
            self.scaling.servo_for(steering),
            speed,
            steering
        );
        Ok(())
    }
}

/// Consumer loop: forwards the latest command at a fixed cadence.
///
/// Runs until the shutdown signal arrives, then parks the actuator at
/// neutral. Forward failures are logged and skipped; the next tick sends
/// the then-current command.
pub async fn run_forward_loop(
    store: Arc<CommandStore>,
    mut actuator: Box<dyn DriveActuator>,
    interval_ms: u64,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    info!("Starting actuator forward loop: period {}ms", interval_ms);
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                info!("Shutdown signal received by forward loop");
                break;
            }

            _ = ticker.tick() => {
                let command = store.read();
                if let Err(e) = actuator.forward(command.speed, command.steering) {
                    warn!("Failed to forward command: {}", e);
                }
            }
        }
    }

    if let Err(e) = actuator.stop() {
        warn!("Failed to park actuator at neutral: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::DriveCommand;
    use std::sync::Mutex;

    #[test]
    fn duty_respects_cap_and_snap() {
        let scaling = VescScaling::default();

        assert_eq!(scaling.duty_for(1.0), 30_000);
        assert_eq!(scaling.duty_for(-1.0), -30_000);
        assert_eq!(scaling.duty_for(0.5), 15_000);
        // Creep guard
        assert_eq!(scaling.duty_for(0.04), 0);
        assert_eq!(scaling.duty_for(-0.04), 0);
        // Out-of-range speeds clamp to the cap
        assert_eq!(scaling.duty_for(3.0), 30_000);
    }

    #[test]
    fn servo_compresses_into_usable_range() {
        let scaling = VescScaling::default();

        assert!((scaling.servo_for(0.0) - 0.05).abs() < 1e-6);
        assert!((scaling.servo_for(0.5) - 0.5).abs() < 1e-6);
        assert!((scaling.servo_for(1.0) - 0.95).abs() < 1e-6);
        // Out-of-range steering clamps before scaling
        assert!((scaling.servo_for(2.0) - 0.95).abs() < 1e-6);
    }

    struct RecordingActuator {
        seen: Arc<Mutex<Vec<(f32, f32)>>>,
    }

    impl DriveActuator for RecordingActuator {
        fn forward(&mut self, speed: f32, steering: f32) -> Result<(), ActuatorError> {
            self.seen.lock().unwrap().push((speed, steering));
            Ok(())
        }
    }

    #[tokio::test]
    async fn forward_loop_pushes_latest_and_parks_on_shutdown() {
        let store = Arc::new(CommandStore::new());
        store.publish(DriveCommand {
            speed: 0.6,
            steering: 0.25,
        });

        let seen = Arc::new(Mutex::new(Vec::new()));
        let actuator = Box::new(RecordingActuator {
            seen: Arc::clone(&seen),
        });

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_forward_loop(Arc::clone(&store), actuator, 10, shutdown_rx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(()).unwrap();
        task.await.unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen.len() >= 2);
        // Every forwarded pair is the published command...
        assert!(seen[..seen.len() - 1]
            .iter()
            .all(|&(speed, steering)| speed == 0.6 && steering == 0.25));
        // ...and the loop parks the drive train on its way out.
        assert_eq!(*seen.last().unwrap(), (0.0, 0.5));
    }
}
