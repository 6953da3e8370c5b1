//! Actor-based monitoring core
//!
//! A single monitor actor produces ticks; any number of live connections
//! subscribe to them.
//!
//! ```text
//!   SettingsStore ──(read each tick)──┐
//!                                     ▼
//!                              ┌──────────────┐   append   ┌──────────────┐
//!   MonitorHandle ──commands──▶│ MonitorActor │───────────▶│ HistoryStore │
//!                              └──────┬───────┘            └──────────────┘
//!                                     │ broadcast(payload)
//!                                     ▼
//!                           ┌────────────────────┐
//!                           │ SubscriberRegistry │◀── add/remove (connection tasks)
//!                           └─────────┬──────────┘
//!                        ┌────────────┼────────────┐
//!                        ▼            ▼            ▼
//!                   subscriber   subscriber   subscriber
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: the monitor actor has an mpsc command channel (tick now, shutdown)
//! 2. **Fan-out**: one broadcast pass per tick, each delivery independent
//! 3. **Request/Response**: oneshot channels for tick results
//! 4. **State**: the current metric value is published on a watch channel

pub mod messages;
pub mod monitor;
pub mod subscribers;
