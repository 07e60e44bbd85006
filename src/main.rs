use color_eyre::Result;
use tokio::sync::oneshot;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use openrover::actuator::{run_forward_loop, DriveActuator, LogActuator};
use openrover::drive::{DriveHandle, DriveSettings};
use openrover::feedback::LogFeedback;
use openrover::input::GamepadInput;

/// Forwarding cadence of the consumer loop; independent of the sampling
/// period.
const FORWARD_INTERVAL_MS: u64 = 50;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let settings = DriveSettings::default();
    info!(
        "Starting openrover: device {} sampled every {}ms",
        settings.device_id, settings.sample_interval_ms
    );

    let device = GamepadInput::new()?;
    let mut drive = DriveHandle::spawn(
        Box::new(device),
        Box::new(LogFeedback::default()),
        Some(settings),
    )?;

    let actuator: Box<dyn DriveActuator> = Box::new(LogActuator::default());
    let (forward_shutdown_tx, forward_shutdown_rx) = oneshot::channel();
    let forward_task = tokio::spawn(run_forward_loop(
        drive.store(),
        actuator,
        FORWARD_INTERVAL_MS,
        forward_shutdown_rx,
    ));

    info!("Running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    // Stop the sampler first so no fresh commands race the park-at-neutral
    // the forward loop performs on its way out.
    info!("Shutting down");
    drive.shutdown().await?;

    if forward_shutdown_tx.send(()).is_err() {
        info!("Forward loop already terminated");
    }
    let _ = forward_task.await;

    info!("Stopped");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }

    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();

    Ok(())
}
