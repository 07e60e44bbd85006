//! Sampling loop with statum state machine for lifecycle safety
//!
//! Owns the input device and drives the whole polling cadence. Each state
//! has specific allowed operations enforced at compile time.
//!
//! # State Machine
//!
//! ```text
//! Initializing ──► Running ──► Stopping ──► Stopped
//!      │              │
//!      └── fails ──┐  └── one poll/map/publish cycle per tick
//!   DeviceNotFound │
//! ```
//!
//! # Per-tick pipeline
//!
//! ```text
//! InputDevice ──► RawSample ──► mapper ──► CommandStore
//!                     │
//!                     └──► EdgeDetector ──► FeedbackSink
//! ```

use chrono::Local;
use statum::{machine, state};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::feedback::FeedbackSink;
use crate::input::{InputDevice, RawSample};

use super::command_store::CommandStore;
use super::mapper::{map_sample, AxisRoles};

/// Configuration for the sampling loop, fixed at spawn.
///
/// # Examples
///
/// ```rust
/// use openrover::drive::DriveSettings;
///
/// // Tighter cadence for a low-latency rig
/// let settings = DriveSettings {
///     sample_interval_ms: 50,
///     trigger_deadzone: 15.0,
///     ..DriveSettings::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct DriveSettings {
    /// Index of the input device to sample.
    pub device_id: usize,

    /// Target polling period in milliseconds. A fixed cadence, not a
    /// busy-spin; lower values increase responsiveness at CPU cost.
    pub sample_interval_ms: u64,

    /// Trigger deadzone on the [-100, 100] device scale. Readings at or
    /// below this threshold count as not pressed.
    pub trigger_deadzone: f32,

    /// Which axes play the steering/forward/reverse roles.
    pub roles: AxisRoles,

    /// Button index → feedback event fired on each rising edge of that
    /// button (once per press, not once per tick while held).
    pub button_events: HashMap<usize, String>,
}

impl Default for DriveSettings {
    fn default() -> Self {
        let mut button_events = HashMap::new();
        button_events.insert(3, "horn".to_string());

        Self {
            device_id: 0,
            sample_interval_ms: 100,
            trigger_deadzone: 10.0,
            roles: AxisRoles::default(),
            button_events,
        }
    }
}

/// Errors raised while bringing up the sampling loop.
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("No input device connected at id {0}")]
    DeviceNotFound(usize),
}

/// Rising-edge detector over previous-tick button state.
///
/// Keyed by button index; a press reports true exactly once, holding the
/// button reports false until it is released and pressed again.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    last: HashMap<usize, bool>,
}

impl EdgeDetector {
    pub fn rising(&mut self, button: usize, pressed: bool) -> bool {
        let was_pressed = self.last.insert(button, pressed).unwrap_or(false);
        pressed && !was_pressed
    }
}

/// States for the sampling loop lifecycle using statum
#[state]
#[derive(Debug, Clone)]
pub enum SamplerState {
    Initializing, // Device verified, loop not yet started
    Running,      // Polling, mapping and publishing each tick
    Stopping,     // Shutdown signal observed, loop exited
    Stopped,      // Terminal; task joined by the owning handle
}

#[machine]
pub struct Sampler<S: SamplerState> {
    device: Box<dyn InputDevice>,
    settings: DriveSettings,
    store: Arc<CommandStore>,
    feedback: Box<dyn FeedbackSink>,
    edges: EdgeDetector,
}

impl<S: SamplerState> Sampler<S> {
    pub fn settings(&self) -> &DriveSettings {
        &self.settings
    }
}

impl Sampler<Initializing> {
    /// Verifies the configured device and builds the loop.
    ///
    /// Fails fast with [`SamplerError::DeviceNotFound`] when nothing is
    /// connected at the configured id; no poll is issued in that case and
    /// the loop never starts.
    pub fn create(
        device: Box<dyn InputDevice>,
        settings: DriveSettings,
        store: Arc<CommandStore>,
        feedback: Box<dyn FeedbackSink>,
    ) -> Result<Self, SamplerError> {
        if !device.is_connected(settings.device_id) {
            return Err(SamplerError::DeviceNotFound(settings.device_id));
        }

        info!(
            "Sampler created for device {} at {}ms period",
            settings.device_id, settings.sample_interval_ms
        );
        Ok(Self::new(
            device,
            settings,
            store,
            feedback,
            EdgeDetector::default(),
        ))
    }

    pub fn start(self) -> Sampler<Running> {
        info!("Sampler transitioning to Running state");
        self.transition()
    }
}

impl Sampler<Running> {
    /// One full tick: poll, map, publish, fire edge-triggered events.
    ///
    /// The store lock lives entirely inside `publish`; no lock is held
    /// across the device poll or the feedback calls.
    fn sample_once(&mut self) {
        let roles = self.settings.roles;
        let axes = [roles.steering, roles.forward, roles.reverse];
        let sample = RawSample::collect(self.device.as_mut(), self.settings.device_id, &axes);

        let command = map_sample(&sample, roles, self.settings.trigger_deadzone);
        self.store.publish(command);

        for (index, event_id) in &self.settings.button_events {
            let pressed = sample.button(*index);
            if self.edges.rising(*index, pressed) {
                info!("Button {} pressed, firing '{}'", index, event_id);
                self.feedback.trigger(event_id);
            }
        }
    }

    /// Main sampling loop with graceful shutdown support.
    ///
    /// Runs one tick per interval until the shutdown signal arrives; the
    /// signal is observed within at most one period plus the in-flight
    /// iteration. A device that disconnects mid-run is not detected here:
    /// the loop keeps polling and receives the backend's stale or default
    /// readings. Known limitation of this design.
    pub async fn run_until_shutdown(
        mut self,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> Sampler<Stopping> {
        info!(
            "Starting sampling loop: period {}ms",
            self.settings.sample_interval_ms
        );

        let mut ticker =
            tokio::time::interval(Duration::from_millis(self.settings.sample_interval_ms));

        // Stats for performance monitoring
        let mut ticks: u64 = 0;
        let mut last_stats_time = Local::now();
        let stats_interval = chrono::Duration::seconds(30);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received by sampling loop");
                    break;
                }

                _ = ticker.tick() => {
                    self.sample_once();
                    ticks += 1;

                    let now = Local::now();
                    if now - last_stats_time > stats_interval {
                        info!(
                            "Sampler stats: {} ticks in the last {} seconds",
                            ticks,
                            (now - last_stats_time).num_seconds()
                        );
                        ticks = 0;
                        last_stats_time = now;
                    }
                }
            }
        }

        debug!("Transitioning to Stopping state");
        self.transition()
    }
}

impl Sampler<Stopping> {
    /// Final cleanup; after this no further command is published.
    pub fn finish(self) -> Sampler<Stopped> {
        info!("Sampling loop stopped");
        self.transition()
    }
}

impl Sampler<Stopped> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_fires_once_per_press() {
        let mut edges = EdgeDetector::default();

        assert!(edges.rising(3, true));
        assert!(!edges.rising(3, true));
        assert!(!edges.rising(3, true));
        assert!(!edges.rising(3, false));
        assert!(edges.rising(3, true));
    }

    #[test]
    fn edges_are_tracked_per_button() {
        let mut edges = EdgeDetector::default();

        assert!(edges.rising(0, true));
        assert!(edges.rising(1, true));
        assert!(!edges.rising(0, true));
        assert!(!edges.rising(1, true));
    }

    #[test]
    fn unseen_button_starts_released() {
        let mut edges = EdgeDetector::default();
        assert!(!edges.rising(7, false));
        assert!(edges.rising(7, true));
    }
}
