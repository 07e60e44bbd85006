//! Input device boundary
//!
//! Everything the drive core knows about the physical controller goes
//! through the [`InputDevice`] trait: a polled, not pushed, view of one
//! device's axes and buttons. Backends:
//!
//! 1. [`gamepad`] - gilrs-backed adapter for real hardware
//! 2. [`mock`] - scriptable in-memory device for tests and dry runs

pub mod gamepad;
pub mod mock;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use gamepad::GamepadInput;
pub use mock::MockInput;

/// Axes the drive core can read, named device-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    LeftTrigger,
    RightTrigger,
}

/// Errors raised while bringing up an input backend.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to initialize input backend: {0}")]
    InitializationError(String),
}

/// Polled view of one connected input device.
///
/// The contract mirrors the sampling loop's tick: call [`poll`] once to
/// refresh the backend's internal device state, then read any number of
/// axis and button values for that tick. Reads without a preceding poll
/// return whatever the backend last cached, with no staleness guarantee.
///
/// [`poll`]: InputDevice::poll
pub trait InputDevice: Send {
    /// Reports whether a device is present at `id` right now.
    fn is_connected(&self, id: usize) -> bool;

    /// Refreshes internal device state once. Called once per sampling tick
    /// before any axis or button read.
    fn poll(&mut self);

    /// Current reading for `axis` on device `id`, in [-100.0, 100.0].
    /// Backends clamp to that range; a missing device or axis reads 0.
    fn axis_value(&self, id: usize, axis: Axis) -> f32;

    /// Current pressed state of the button at `index` on device `id`.
    fn button_pressed(&self, id: usize, index: usize) -> bool;

    /// Number of buttons the backend exposes for device `id`.
    fn button_count(&self, id: usize) -> usize;
}

/// Snapshot of device state at one sampling tick.
///
/// Built fresh each tick and dropped after mapping; nothing here is
/// retained across iterations.
#[derive(Debug, Clone)]
pub struct RawSample {
    axes: HashMap<Axis, f32>,
    buttons: Vec<bool>,
}

impl RawSample {
    /// Polls `device` once and reads the requested axes plus the full
    /// button bank for this tick.
    pub fn collect(device: &mut dyn InputDevice, id: usize, axes: &[Axis]) -> Self {
        device.poll();

        let axes = axes
            .iter()
            .map(|axis| (*axis, device.axis_value(id, *axis)))
            .collect();
        let buttons = (0..device.button_count(id))
            .map(|index| device.button_pressed(id, index))
            .collect();

        Self { axes, buttons }
    }

    /// Reading for `axis`, or 0.0 if it was not collected.
    pub fn axis(&self, axis: Axis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    /// Pressed state of the button at `index`; out-of-range reads false.
    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Number of buttons captured in this sample.
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_polls_before_reading() {
        let mock = MockInput::connected();
        mock.set_axis(Axis::RightStickX, 50.0);
        mock.set_button(3, true);

        let mut device = mock.clone();
        let sample = RawSample::collect(&mut device, 0, &[Axis::RightStickX]);

        assert_eq!(mock.poll_count(), 1);
        assert_eq!(sample.axis(Axis::RightStickX), 50.0);
        assert!(sample.button(3));
        assert!(!sample.button(0));
    }

    #[test]
    fn uncollected_axis_reads_zero() {
        let mut device = MockInput::connected();
        let sample = RawSample::collect(&mut device, 0, &[Axis::LeftTrigger]);

        assert_eq!(sample.axis(Axis::RightStickX), 0.0);
        assert!(!sample.button(99));
    }
}
