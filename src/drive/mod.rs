//! Drive-control core
//!
//! Converts polled gamepad state into normalized drive commands and
//! publishes them for independent consumers:
//!
//! 1. [`mapper`] - pure axis → command transformation
//! 2. [`command_store`] - shared latest-command snapshot
//! 3. [`sampler`] - fixed-cadence polling loop and button edge events
//! 4. [`handle`] - unified API and lifecycle management
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► Sampler ──► CommandStore ──► consumer ──► actuator
//!             (poll/map)   (snapshot)      (own cadence)
//! ```
//!
//! The sampling loop and the consumer run on independent schedules and
//! meet only at the store, so neither side can stall the other.

pub mod command_store;
pub mod handle;
pub mod mapper;
pub mod sampler;

pub use command_store::CommandStore;
pub use handle::{DriveError, DriveHandle};
pub use mapper::{AxisRoles, DriveCommand};
pub use sampler::{DriveSettings, SamplerError};
