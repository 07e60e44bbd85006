//! Drive Handle - Unified API for the sampling core
//!
//! Owns the sampling task and the shared command store, and exposes the
//! lifecycle surface: spawn, read speed/steering, shut down. The handle is
//! the single place where the background task is signalled and joined, so
//! no sampling activity can outlive the component.

use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::feedback::FeedbackSink;
use crate::input::{InputDevice, InputError};

pub use super::command_store::CommandStore;
pub use super::mapper::{AxisRoles, DriveCommand};
pub use super::sampler::{DriveSettings, EdgeDetector, Sampler, SamplerError};

/// Errors that can occur while spawning or stopping the drive core.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    /// The sampling loop refused to start, e.g. no device at the
    /// configured id.
    #[error("Sampler error: {0}")]
    Sampler(#[from] SamplerError),

    /// The input backend could not be initialized.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// The background sampling task failed to join cleanly.
    #[error("Task error: {0}")]
    Task(String),
}

/// Handle for the complete drive-control core.
///
/// Spawning starts one background tokio task running the
/// [`Sampler`](super::sampler::Sampler) state machine; readers query the
/// latest command through the handle (or a cloned store) at whatever
/// cadence suits them.
///
/// # Shutdown contract
///
/// [`shutdown`](DriveHandle::shutdown) sends the cooperative stop signal
/// and then awaits the task, so when it returns the loop has fully
/// stopped and nothing will write to the store again. Dropping the handle
/// without calling it still sends the signal as a backstop, but does not
/// wait for the task to finish.
///
/// # Examples
///
/// ```rust,no_run
/// use openrover::drive::{DriveHandle, DriveSettings};
/// use openrover::feedback::LogFeedback;
/// use openrover::input::MockInput;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let device = MockInput::connected();
/// let mut drive = DriveHandle::spawn(
///     Box::new(device),
///     Box::new(LogFeedback::default()),
///     Some(DriveSettings::default()),
/// )?;
///
/// let steering = drive.get_steering();
/// let speed = drive.get_speed();
/// println!("steering {steering:.2}, speed {speed:.2}");
///
/// drive.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriveHandle {
    store: Arc<CommandStore>,
    task_handle: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl DriveHandle {
    /// Verifies the device and starts the sampling task.
    ///
    /// Fails with [`DriveError::Sampler`] (`DeviceNotFound`) when nothing
    /// is connected at the configured id; in that case no poll has been
    /// issued and no task exists.
    pub fn spawn(
        device: Box<dyn InputDevice>,
        feedback: Box<dyn FeedbackSink>,
        settings: Option<DriveSettings>,
    ) -> Result<Self, DriveError> {
        let settings = settings.unwrap_or_default();
        info!("Initializing drive core with settings: {:?}", settings);

        let store = Arc::new(CommandStore::new());
        let sampler = Sampler::create(device, settings, Arc::clone(&store), feedback)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task_handle = tokio::spawn(async move {
            let running = sampler.start();
            let stopping = running.run_until_shutdown(shutdown_rx).await;
            let _stopped = stopping.finish();
        });

        info!("Drive core started");
        Ok(Self {
            store,
            task_handle: Some(task_handle),
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Latest published command as one consistent snapshot.
    pub fn command(&self) -> DriveCommand {
        self.store.read()
    }

    /// Current speed in [-1, 1]; negative is reverse.
    pub fn get_speed(&self) -> f32 {
        self.store.read().speed
    }

    /// Current steering position in [0, 1]; 0.5 is center.
    pub fn get_steering(&self) -> f32 {
        self.store.read().steering
    }

    /// Shared store for consumers that poll on their own cadence.
    pub fn store(&self) -> Arc<CommandStore> {
        Arc::clone(&self.store)
    }

    /// Gracefully stops the sampling loop and waits for the task to end.
    pub async fn shutdown(&mut self) -> Result<(), DriveError> {
        debug!("Sending shutdown signal to sampling loop");

        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                warn!("Sampling task already terminated");
            }
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(()) => {
                    debug!("Sampling task joined");
                    Ok(())
                }
                Err(e) => {
                    error!("Sampling task panicked: {}", e);
                    Err(DriveError::Task(format!("Sampling task panicked: {}", e)))
                }
            }
        } else {
            debug!("Drive core already shut down");
            Ok(())
        }
    }
}

impl Drop for DriveHandle {
    fn drop(&mut self) {
        // Backstop: make sure the loop at least gets the stop signal even
        // when shutdown() was never awaited.
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
