//! Message types for actor communication
//!
//! Commands go to the monitor actor over its mpsc channel; answers come back
//! over oneshot channels.

use tokio::sync::oneshot;

use crate::StatusPayload;

/// Commands that can be sent to the MonitorActor
#[derive(Debug)]
pub enum MonitorCommand {
    /// Run a tick immediately instead of waiting for the interval
    ///
    /// Used for testing and manual refresh. The tick honours the idle rules,
    /// so the response is `None` when the monitor is inactive or nobody is
    /// subscribed. The interval wait restarts afterwards.
    TickNow {
        respond_to: oneshot::Sender<Option<TickOutcome>>,
    },

    /// Stop the loop
    ///
    /// A pending interval wait is abandoned; no further tick runs.
    Shutdown,
}

/// Result of one active tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// The payload that was broadcast
    pub payload: StatusPayload,

    /// Whether a monitoring event was recorded this tick
    pub event_recorded: bool,

    /// Subscribers that received the payload
    pub delivered: usize,

    /// Subscribers dropped because delivery failed
    pub dropped: usize,
}
