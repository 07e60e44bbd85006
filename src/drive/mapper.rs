//! Pure mapping from raw device readings to drive commands
//!
//! No state, no I/O: every function here is a total transformation over the
//! documented device range. Out-of-range raw values are the adapter
//! boundary's problem; the mapper assumes its inputs already sit in
//! [-100, 100].

use serde::{Deserialize, Serialize};

use crate::input::{Axis, RawSample};

/// Normalized motion command for the drive train.
///
/// `steering` runs 0.0 (full left) through 0.5 (center) to 1.0 (full
/// right). `speed` runs -1.0 (full reverse) through 0.0 (neutral) to 1.0
/// (full forward). A new command replaces the previous one atomically on
/// every sampling tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    pub speed: f32,
    pub steering: f32,
}

impl DriveCommand {
    /// Motor stopped, wheels centered.
    pub fn neutral() -> Self {
        Self {
            speed: 0.0,
            steering: 0.5,
        }
    }
}

impl Default for DriveCommand {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Which physical axis plays which role in the command mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRoles {
    /// Horizontal axis read for steering.
    pub steering: Axis,
    /// Unidirectional trigger driving forward.
    pub forward: Axis,
    /// Unidirectional trigger driving reverse.
    pub reverse: Axis,
}

impl Default for AxisRoles {
    fn default() -> Self {
        Self {
            steering: Axis::RightStickX,
            forward: Axis::RightTrigger,
            reverse: Axis::LeftTrigger,
        }
    }
}

/// Maps a horizontal axis reading in [-100, 100] to a steering position.
///
/// Linear: -100 maps to 0.0, 0 to 0.5, 100 to 1.0, clamped to [0, 1].
/// This is the one steering formula; algebraic restatements of the same
/// line are the same contract.
pub fn steering_position(axis: f32) -> f32 {
    (0.5 + axis / 200.0).clamp(0.0, 1.0)
}

/// Normalizes one trigger reading against the deadzone.
///
/// Strictly-greater comparison: a reading at the threshold is not pressed
/// and snaps to exactly 0.0. Hard cutoff, no falloff curve.
pub fn trigger_norm(raw: f32, deadzone: f32) -> f32 {
    if raw > deadzone {
        raw / 100.0
    } else {
        0.0
    }
}

/// Resolves the two normalized triggers into one signed speed.
///
/// Both triggers pressed past the deadzone forces neutral. This is a
/// safety rule: conflicting pedal input stops the motor rather than
/// averaging or picking a winner.
pub fn arbitrated_speed(forward_norm: f32, reverse_norm: f32) -> f32 {
    if forward_norm > 0.0 && reverse_norm > 0.0 {
        0.0
    } else {
        forward_norm - reverse_norm
    }
}

/// Full per-tick transformation from a raw sample to a drive command.
pub fn map_sample(sample: &RawSample, roles: AxisRoles, deadzone: f32) -> DriveCommand {
    let steering = steering_position(sample.axis(roles.steering));
    let forward = trigger_norm(sample.axis(roles.forward), deadzone);
    let reverse = trigger_norm(sample.axis(roles.reverse), deadzone);

    DriveCommand {
        speed: arbitrated_speed(forward, reverse),
        steering,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputDevice, MockInput};

    #[test]
    fn steering_endpoints() {
        assert_eq!(steering_position(-100.0), 0.0);
        assert_eq!(steering_position(0.0), 0.5);
        assert_eq!(steering_position(100.0), 1.0);
    }

    #[test]
    fn steering_is_monotonic_and_clamped() {
        let mut previous = f32::MIN;
        for raw in -100..=100 {
            let position = steering_position(raw as f32);
            assert!((0.0..=1.0).contains(&position));
            assert!(position > previous);
            previous = position;
        }

        // Beyond the documented device range the output stays pinned.
        assert_eq!(steering_position(-250.0), 0.0);
        assert_eq!(steering_position(250.0), 1.0);
    }

    #[test]
    fn deadzone_boundary_is_not_pressed() {
        assert_eq!(trigger_norm(10.0, 10.0), 0.0);
        assert_eq!(trigger_norm(9.9, 10.0), 0.0);
        assert_eq!(trigger_norm(-40.0, 10.0), 0.0);
        assert!((trigger_norm(10.1, 10.0) - 0.101).abs() < 1e-6);
        assert_eq!(trigger_norm(90.0, 10.0), 0.9);
    }

    #[test]
    fn one_active_trigger_wins_over_sub_deadzone_noise() {
        let forward = trigger_norm(90.0, 10.0);
        let reverse = trigger_norm(5.0, 10.0);
        assert_eq!(arbitrated_speed(forward, reverse), 0.9);
    }

    #[test]
    fn both_triggers_pressed_forces_neutral() {
        let forward = trigger_norm(90.0, 10.0);
        let reverse = trigger_norm(90.0, 10.0);
        assert_eq!(arbitrated_speed(forward, reverse), 0.0);

        // Magnitude does not matter once both are past the deadzone.
        assert_eq!(arbitrated_speed(trigger_norm(100.0, 10.0), trigger_norm(11.0, 10.0)), 0.0);
    }

    #[test]
    fn reverse_trigger_drives_negative_speed() {
        assert_eq!(arbitrated_speed(0.0, 0.75), -0.75);
        assert_eq!(arbitrated_speed(0.0, 0.0), 0.0);
    }

    #[test]
    fn map_sample_composes_roles_and_deadzone() {
        let mock = MockInput::connected();
        mock.set_axis(Axis::RightStickX, -100.0);
        mock.set_axis(Axis::RightTrigger, 60.0);
        mock.set_axis(Axis::LeftTrigger, 4.0);

        let mut device = mock.clone();
        let roles = AxisRoles::default();
        let sample = RawSample::collect(
            &mut device,
            0,
            &[roles.steering, roles.forward, roles.reverse],
        );
        let command = map_sample(&sample, roles, 10.0);

        assert_eq!(command.steering, 0.0);
        assert!((command.speed - 0.6).abs() < 1e-6);
    }

    #[test]
    fn idle_device_maps_to_neutral() {
        let mut device = MockInput::connected();
        let roles = AxisRoles::default();
        let sample = RawSample::collect(
            &mut device,
            0,
            &[roles.steering, roles.forward, roles.reverse],
        );

        assert_eq!(map_sample(&sample, roles, 10.0), DriveCommand::neutral());
        assert_eq!(device.button_count(0), 11);
    }
}
