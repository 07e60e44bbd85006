//! Shared drive command snapshot
//!
//! Single-writer/multi-reader exchange point between the sampling loop and
//! whoever forwards commands to the actuator. The lock is scoped to the
//! copy of one small value, so neither side can stall the other for longer
//! than that.

use std::sync::{Mutex, PoisonError};

use tracing::trace;

use super::mapper::DriveCommand;

/// Holder of the latest [`DriveCommand`].
///
/// Readers always observe a fully-formed command: speed and steering are
/// written together under the lock, never piecewise. The store starts at
/// [`DriveCommand::neutral`] and is overwritten once per sampling tick.
/// Exactly one logical writer exists at a time; readers are unordered
/// relative to each other beyond last-write-wins.
#[derive(Debug)]
pub struct CommandStore {
    current: Mutex<DriveCommand>,
}

impl CommandStore {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(DriveCommand::neutral()),
        }
    }

    /// Atomically replaces the stored command.
    pub fn publish(&self, command: DriveCommand) {
        trace!(
            "Publishing command: speed={:.3} steering={:.3}",
            command.speed,
            command.steering
        );
        // A poisoned lock still holds a fully written command; recover it.
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *current = command;
    }

    /// Returns the most recently published command, or the neutral default
    /// if nothing has been published yet.
    pub fn read(&self) -> DriveCommand {
        *self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CommandStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn fresh_store_reads_neutral() {
        let store = CommandStore::new();
        assert_eq!(store.read(), DriveCommand::neutral());
    }

    #[test]
    fn publish_then_read_returns_exact_value() {
        let store = CommandStore::new();
        let command = DriveCommand {
            speed: -0.4,
            steering: 0.8,
        };

        store.publish(command);
        assert_eq!(store.read(), command);

        store.publish(DriveCommand::neutral());
        assert_eq!(store.read(), DriveCommand::neutral());
    }

    #[test]
    fn concurrent_readers_never_observe_torn_commands() {
        // Tag each tick so speed and steering must come from the same
        // publish: steering is always speed + 0.5, including the neutral
        // starting value.
        let store = Arc::new(CommandStore::new());
        let writes = 20_000u32;

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for tick in 0..writes {
                    let tag = tick as f32;
                    store.publish(DriveCommand {
                        speed: tag,
                        steering: tag + 0.5,
                    });
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..writes {
                        let command = store.read();
                        assert_eq!(command.steering, command.speed + 0.5);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        let last = store.read();
        assert_eq!(last.speed, (writes - 1) as f32);
    }
}
