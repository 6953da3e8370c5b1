use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use polarization_monitor::{
    actors::{
        monitor::{MonitorContext, MonitorHandle},
        subscribers::SubscriberRegistry,
    },
    api::{ApiConfig, ApiState, spawn_api_server},
    config::{Config, read_config_file},
    settings::SettingsStore,
    storage::{HistoryStore, json::JsonFileStore},
    util::{bind_addr_from_env, data_dir_from_env},
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (defaults are used when omitted)
    #[arg(short)]
    file: Option<String>,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("polarization_monitor", LevelFilter::DEBUG),
        ("polarization_hub", LevelFilter::DEBUG),
        ("tower_http", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    let data_dir = data_dir_from_env(config.data_dir.clone());
    let store = Arc::new(JsonFileStore::new(&data_dir));
    store
        .ensure_seeded()
        .await
        .with_context(|| format!("failed to prepare data directory {}", data_dir.display()))?;

    let context = MonitorContext {
        settings: SettingsStore::new(config.settings)?,
        history: HistoryStore::new(config.monitor.alert_capacity, config.monitor.event_capacity),
        subscribers: SubscriberRegistry::new(config.monitor.send_timeout()),
    };

    let monitor = MonitorHandle::spawn(config.monitor.clone(), context.clone())?;

    let state = ApiState::new(
        context,
        monitor.clone(),
        store.clone(),
        store,
        config.monitor.average_window,
    );
    let api_config = ApiConfig {
        bind_addr: bind_addr_from_env(config.api.bind_addr),
        enable_cors: config.api.enable_cors,
    };
    spawn_api_server(api_config, state).await?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("shutting down");
    monitor.shutdown().await?;
    info!("monitor stopped");

    Ok(())
}
