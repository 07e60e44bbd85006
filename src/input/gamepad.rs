//! gilrs-backed input device adapter

use gilrs::{Button, Gamepad, Gilrs};
use tracing::{debug, error, info};

use super::{Axis, InputDevice, InputError};

/// Fixed button index table for the gilrs backend.
///
/// Indices follow the common XInput layout: 0=A(South), 1=B(East),
/// 2=X(West), 3=Y(North), then bumpers, menu buttons, guide and stick
/// clicks.
const BUTTON_TABLE: [Button; 11] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
];

/// Real-hardware input backend on top of gilrs.
///
/// gilrs reports axes in [-1.0, 1.0]; this adapter rescales to the
/// [-100.0, 100.0] device range and clamps, so out-of-range readings never
/// reach the mapper.
pub struct GamepadInput {
    gilrs: Gilrs,
}

impl GamepadInput {
    pub fn new() -> Result<Self, InputError> {
        info!("Initializing gilrs input backend");
        let gilrs = match Gilrs::new() {
            Ok(g) => g,
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(InputError::InitializationError(e.to_string()));
            }
        };

        for (id, gamepad) in gilrs.gamepads() {
            info!(
                "Found gamepad [{}]: {} ({:?})",
                id,
                gamepad.name(),
                gamepad.uuid()
            );
        }

        Ok(Self { gilrs })
    }

    fn gamepad(&self, id: usize) -> Option<Gamepad<'_>> {
        self.gilrs
            .gamepads()
            .find(|(gamepad_id, _)| usize::from(*gamepad_id) == id)
            .map(|(_, gamepad)| gamepad)
    }
}

impl InputDevice for GamepadInput {
    fn is_connected(&self, id: usize) -> bool {
        self.gamepad(id)
            .map(|gamepad| gamepad.is_connected())
            .unwrap_or(false)
    }

    fn poll(&mut self) {
        // Drain the event queue; gilrs folds events into its cached
        // per-gamepad state, which the value reads below observe.
        while let Some(event) = self.gilrs.next_event() {
            debug!("gilrs event: {:?}", event.event);
        }
    }

    fn axis_value(&self, id: usize, axis: Axis) -> f32 {
        let Some(gamepad) = self.gamepad(id) else {
            return 0.0;
        };

        let raw = gamepad.value(map_axis(axis));
        (raw * 100.0).clamp(-100.0, 100.0)
    }

    fn button_pressed(&self, id: usize, index: usize) -> bool {
        let Some(gamepad) = self.gamepad(id) else {
            return false;
        };

        BUTTON_TABLE
            .get(index)
            .map(|button| gamepad.is_pressed(*button))
            .unwrap_or(false)
    }

    fn button_count(&self, _id: usize) -> usize {
        BUTTON_TABLE.len()
    }
}

// Triggers ride the Z axes, matching how gilrs reports analog triggers on
// Linux event devices.
fn map_axis(axis: Axis) -> gilrs::Axis {
    match axis {
        Axis::LeftStickX => gilrs::Axis::LeftStickX,
        Axis::LeftStickY => gilrs::Axis::LeftStickY,
        Axis::RightStickX => gilrs::Axis::RightStickX,
        Axis::RightStickY => gilrs::Axis::RightStickY,
        Axis::LeftTrigger => gilrs::Axis::LeftZ,
        Axis::RightTrigger => gilrs::Axis::RightZ,
    }
}
