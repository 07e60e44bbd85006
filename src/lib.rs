//! openrover - gamepad drive control for a small RC platform
//!
//! A background sampling loop polls one gamepad at fixed cadence, maps
//! axis readings into normalized steering/speed commands (deadzone plus
//! forward/reverse arbitration) and publishes each result as a consistent
//! snapshot. An independent consumer loop reads those snapshots and
//! forwards them to the motor/servo actuator.

pub mod actuator;
pub mod drive;
pub mod feedback;
pub mod input;
