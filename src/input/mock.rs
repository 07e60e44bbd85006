//! Scriptable in-memory input device
//!
//! Stands in for real hardware in tests and dry runs. Clones share one
//! underlying device, so a test can keep a handle and steer axis/button
//! state while the sampling loop owns another clone.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{Axis, InputDevice};

const MOCK_BUTTON_COUNT: usize = 11;

#[derive(Debug)]
struct MockState {
    connected: bool,
    axes: HashMap<Axis, f32>,
    buttons: Vec<bool>,
    poll_count: u64,
}

/// In-memory [`InputDevice`] exposing a single device at id 0.
#[derive(Debug, Clone)]
pub struct MockInput {
    state: Arc<Mutex<MockState>>,
}

impl MockInput {
    /// A connected device with centered axes and no buttons held.
    pub fn connected() -> Self {
        Self::with_connection(true)
    }

    /// A device slot with nothing plugged in.
    pub fn disconnected() -> Self {
        Self::with_connection(false)
    }

    fn with_connection(connected: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                connected,
                axes: HashMap::new(),
                buttons: vec![false; MOCK_BUTTON_COUNT],
                poll_count: 0,
            })),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.state.lock().unwrap().connected = connected;
    }

    pub fn set_axis(&self, axis: Axis, value: f32) {
        self.state.lock().unwrap().axes.insert(axis, value);
    }

    pub fn set_button(&self, index: usize, pressed: bool) {
        let mut state = self.state.lock().unwrap();
        if index < state.buttons.len() {
            state.buttons[index] = pressed;
        }
    }

    /// How many times the sampling side has polled so far.
    pub fn poll_count(&self) -> u64 {
        self.state.lock().unwrap().poll_count
    }
}

impl InputDevice for MockInput {
    fn is_connected(&self, id: usize) -> bool {
        id == 0 && self.state.lock().unwrap().connected
    }

    fn poll(&mut self) {
        self.state.lock().unwrap().poll_count += 1;
    }

    fn axis_value(&self, id: usize, axis: Axis) -> f32 {
        if id != 0 {
            return 0.0;
        }
        let state = self.state.lock().unwrap();
        state
            .axes
            .get(&axis)
            .copied()
            .unwrap_or(0.0)
            .clamp(-100.0, 100.0)
    }

    fn button_pressed(&self, id: usize, index: usize) -> bool {
        if id != 0 {
            return false;
        }
        let state = self.state.lock().unwrap();
        state.buttons.get(index).copied().unwrap_or(false)
    }

    fn button_count(&self, id: usize) -> usize {
        if id == 0 {
            MOCK_BUTTON_COUNT
        } else {
            0
        }
    }
}
