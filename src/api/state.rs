//! API shared state

use std::sync::Arc;

use crate::{
    actors::{
        monitor::{MonitorContext, MonitorHandle},
        subscribers::SubscriberRegistry,
    },
    settings::SettingsStore,
    storage::{AnalysisStore, EventStore, HistoryStore},
};

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Current monitoring settings (replaced by POST /api/monitor/settings)
    pub settings: SettingsStore,

    /// Alert and event history written by the monitor actor
    pub history: HistoryStore,

    /// Live feed connections
    pub subscribers: SubscriberRegistry,

    /// Handle to the monitor actor (current value, control)
    pub monitor: MonitorHandle,

    /// Flat-file event store
    pub events: Arc<dyn EventStore>,

    /// Saved analysis results, related events and raw comments
    pub analysis: Arc<dyn AnalysisStore>,

    /// Number of events averaged by the statistics endpoint
    pub average_window: usize,
}

impl ApiState {
    pub fn new(
        context: MonitorContext,
        monitor: MonitorHandle,
        events: Arc<dyn EventStore>,
        analysis: Arc<dyn AnalysisStore>,
        average_window: usize,
    ) -> Self {
        let MonitorContext {
            settings,
            history,
            subscribers,
        } = context;

        Self {
            settings,
            history,
            subscribers,
            monitor,
            events,
            analysis,
            average_window,
        }
    }
}
