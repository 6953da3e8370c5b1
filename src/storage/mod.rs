//! In-process storage
//!
//! ## Monitoring history
//!
//! - [`ring`]: generic fixed-capacity ring (`BoundedHistory`)
//! - [`history`]: alert and event rings of the monitor loop (`HistoryStore`)
//!
//! History lives in memory only and is lost on restart.
//!
//! ## Event store
//!
//! - [`backend`]: `EventStore` and `AnalysisStore` traits
//! - [`json`]: flat-file JSON implementation
//! - [`schema`]: event records
//!
//! ```no_run
//! use polarization_monitor::storage::{EventStore, json::JsonFileStore, schema::EventFilter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = JsonFileStore::new("./data");
//!     store.ensure_seeded().await?;
//!     let events = store.list(&EventFilter::default()).await?;
//!     println!("{} events", events.len());
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod history;
pub mod json;
pub mod ring;
pub mod schema;

pub use backend::{AnalysisStore, EventStore};
pub use error::{StorageError, StorageResult};
pub use history::{HistoryStore, MonitorStatistics};
pub use ring::BoundedHistory;
