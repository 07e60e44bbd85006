//! Side-effect trigger boundary
//!
//! Button presses in the sampling loop fire named feedback events (a horn,
//! a chime) through this trait. Triggers are fire-and-forget: an unknown
//! or unavailable event id is logged and dropped, never propagated into
//! the control path, and implementations must return quickly so the loop
//! keeps its cadence.

use std::collections::HashSet;
use tracing::{info, warn};

/// Receiver for fire-and-forget feedback events.
pub trait FeedbackSink: Send {
    /// Fires the event registered under `event_id`. Must not block the
    /// caller beyond a bounded duration; failures are handled internally.
    fn trigger(&mut self, event_id: &str);
}

/// Log-only feedback sink.
///
/// Stands in where no audio device is wired up: known events are logged,
/// unknown ids produce a warning, mirroring a sound bank that cannot find
/// a sample.
pub struct LogFeedback {
    known: HashSet<&'static str>,
}

impl Default for LogFeedback {
    fn default() -> Self {
        Self {
            known: HashSet::from(["horn"]),
        }
    }
}

impl FeedbackSink for LogFeedback {
    fn trigger(&mut self, event_id: &str) {
        if self.known.contains(event_id) {
            info!("Feedback event: {}", event_id);
        } else {
            warn!("Unknown feedback event: {}", event_id);
        }
    }
}
