//! MonitorActor - Produces and broadcasts monitoring ticks
//!
//! There is exactly one monitor actor per process. Each iteration waits for
//! the configured interval (re-read from the settings every time) and then
//! runs a tick:
//!
//! ```text
//! wait(interval) → [idle?] → next value → maybe event → evaluate alert → compose payload → broadcast
//!     ↑
//!     └─── Commands (TickNow, Shutdown)
//! ```
//!
//! The monitor is idle while the settings mark it inactive or nobody is
//! subscribed; an idle tick changes nothing. Ticks run strictly one after
//! another, so every subscriber sees history in the same order. A shutdown
//! command abandons the pending wait immediately.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, trace, warn};

use crate::{
    EventType, MonitoringEvent, Platform, StatusPayload,
    config::{ConfigError, MonitorConfig},
    monitors::{
        evaluator::AlertEvaluator,
        synthesizer::{MetricSource, MetricSynthesizer},
    },
    settings::SettingsStore,
    storage::HistoryStore,
};

use super::messages::{MonitorCommand, TickOutcome};
use super::subscribers::SubscriberRegistry;

/// Shared state the monitor actor reads and writes
#[derive(Clone)]
pub struct MonitorContext {
    pub settings: SettingsStore,
    pub history: HistoryStore,
    pub subscribers: SubscriberRegistry,
}

pub struct MonitorActor {
    config: MonitorConfig,

    context: MonitorContext,

    /// Produces the next metric value
    source: Box<dyn MetricSource>,

    evaluator: AlertEvaluator,

    /// Random source for event generation
    rng: StdRng,

    current_value: f64,

    event_sequence: u64,

    /// Publishes the current value to handles
    value_tx: watch::Sender<f64>,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<MonitorCommand>,
}

impl MonitorActor {
    fn new(
        config: MonitorConfig,
        context: MonitorContext,
        source: Box<dyn MetricSource>,
        value_tx: watch::Sender<f64>,
        command_rx: mpsc::Receiver<MonitorCommand>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        let current_value = config.initial_value;

        Self {
            config,
            context,
            source,
            evaluator: AlertEvaluator::new(),
            rng,
            current_value,
            event_sequence: 0,
            value_tx,
            command_rx,
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command is received or every handle is dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting monitor actor");

        loop {
            let wait = self.context.settings.get().await.interval();

            tokio::select! {
                biased;

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(MonitorCommand::TickNow { respond_to }) => {
                            debug!("received TickNow command");
                            let outcome = self.tick().await;
                            let _ = respond_to.send(outcome);
                        }

                        Some(MonitorCommand::Shutdown) => {
                            debug!("received shutdown command");
                            break;
                        }

                        None => {
                            warn!("command channel closed, shutting down");
                            break;
                        }
                    }
                }

                _ = tokio::time::sleep(wait) => {
                    self.tick().await;
                }
            }
        }

        debug!("monitor actor stopped");
    }

    /// Run one tick; `None` when idle
    async fn tick(&mut self) -> Option<TickOutcome> {
        let settings = self.context.settings.get().await;
        if !settings.is_active {
            trace!("monitor inactive, skipping tick");
            return None;
        }

        if self.context.subscribers.is_empty().await {
            trace!("no subscribers, skipping tick");
            return None;
        }

        let now = Utc::now();
        let value = self.source.next_value(self.current_value);
        self.current_value = value;
        self.value_tx.send_replace(value);

        let event = self.maybe_event(value, now);
        let event_recorded = event.is_some();
        if let Some(event) = event {
            trace!("recording {} ({})", event.event_id, event.event_type);
            self.context.history.append_event(event).await;
        }

        let alert = self.evaluator.evaluate(value, &settings, now);
        let is_alert = alert.is_some();
        if let Some(alert) = alert {
            debug!("{}: {}", alert.alert_id, alert.description);
            self.context.history.append_alert(alert).await;
        }

        let payload = StatusPayload {
            timestamp: now,
            value,
            is_alert,
            latest_events: self
                .context
                .history
                .recent_events(self.config.latest_events)
                .await,
            alert_count: self
                .context
                .history
                .alerts_since(now - Duration::hours(1))
                .await,
        };

        let report = match serde_json::to_string(&payload) {
            Ok(text) => self.context.subscribers.broadcast(&text).await,
            Err(e) => {
                error!("failed to serialize status payload: {e}");
                Default::default()
            }
        };

        trace!(
            "tick: value {value:.3}, alert {is_alert}, delivered {}, dropped {}",
            report.delivered,
            report.failed.len()
        );

        Some(TickOutcome {
            payload,
            event_recorded,
            delivered: report.delivered,
            dropped: report.failed.len(),
        })
    }

    fn maybe_event(&mut self, value: f64, now: DateTime<Utc>) -> Option<MonitoringEvent> {
        if !self.rng.gen_bool(self.config.event_probability) {
            return None;
        }

        let event_type = EventType::ALL[self.rng.gen_range(0..EventType::ALL.len())];
        let platform = Platform::ALL[self.rng.gen_range(0..Platform::ALL.len())];
        self.event_sequence += 1;

        Some(MonitoringEvent {
            event_id: format!("evt_{}", self.event_sequence),
            timestamp: now,
            event_type,
            platform,
            value,
            description: format!("{event_type} event detected on {platform}"),
        })
    }
}

/// Handle for controlling the MonitorActor
///
/// Cheap to clone; every clone talks to the same actor.
#[derive(Clone)]
pub struct MonitorHandle {
    /// Command sender
    sender: mpsc::Sender<MonitorCommand>,

    /// Latest metric value
    value_rx: watch::Receiver<f64>,

    /// Join handle of the actor task, taken by the first shutdown
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl MonitorHandle {
    /// Spawn the monitor actor with the configured random walk
    pub fn spawn(config: MonitorConfig, context: MonitorContext) -> Result<Self, ConfigError> {
        let source = MetricSynthesizer::new(config.walk_params(), config.seed);
        Self::spawn_with_source(config, context, Box::new(source))
    }

    /// Spawn the monitor actor with a custom metric source
    pub fn spawn_with_source(
        config: MonitorConfig,
        context: MonitorContext,
        source: Box<dyn MetricSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (value_tx, value_rx) = watch::channel(config.initial_value);

        let actor = MonitorActor::new(config, context, source, value_tx, cmd_rx);
        let task = tokio::spawn(actor.run());

        Ok(Self {
            sender: cmd_tx,
            value_rx,
            task: Arc::new(Mutex::new(Some(task))),
        })
    }

    /// Current metric value (the initial value until the first active tick)
    pub fn current_value(&self) -> f64 {
        *self.value_rx.borrow()
    }

    /// Run a tick immediately
    pub async fn tick_now(&self) -> Result<Option<TickOutcome>> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::TickNow { respond_to: tx })
            .await
            .context("failed to send TickNow command")?;

        rx.await.context("failed to receive response")
    }

    /// Stop the actor and wait for its task to finish
    ///
    /// Calling this more than once is harmless.
    pub async fn shutdown(&self) -> Result<()> {
        // the actor may already be gone, in which case there is nothing to stop
        let _ = self.sender.send(MonitorCommand::Shutdown).await;

        if let Some(task) = self.task.lock().await.take() {
            task.await.context("monitor task failed")?;
        }

        Ok(())
    }

    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }
}
