//! CLI command implementations
//!
//! Each command loads the configuration, assembles the engine and runs
//! inside its own tokio runtime.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use super::args::Command;
use super::config::SwitcherConfig;
use super::errors::{CliError, CliResult};
use super::io::{write_response, StdoutNotifier};
use crate::blob_store::LocalBlobStore;
use crate::failover::{ConfigStore, FailoverEngine, FailoverSelector, HttpProbe, SessionHub};
use crate::http_server::{AppState, HttpServer};
use crate::net::ReqwestClient;
use crate::observability::{log_event, log_event_with_fields, Event, MetricsRegistry};

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(&config),
        Command::Check { config, current } => check(&config, &current),
        Command::Refresh { config } => refresh(&config),
        Command::Cache { config } => cache(&config),
    }
}

/// Wire the engine from configuration: reqwest client, file-backed cache
/// under `cache_dir/cache_namespace`, HTTP probe.
pub fn build_engine(config: &SwitcherConfig) -> CliResult<Arc<FailoverEngine>> {
    let metrics = Arc::new(MetricsRegistry::new());

    let client = Arc::new(
        ReqwestClient::new()
            .map_err(|e| CliError::boot_failed(format!("Failed to build HTTP client: {}", e)))?,
    );
    let blobs = Arc::new(LocalBlobStore::namespaced(
        &config.cache_path(),
        &config.cache_namespace,
    ));

    let store = ConfigStore::new(client.clone(), blobs, config.config_url.clone(), metrics.clone())
        .with_fetch_timeout(config.config_fetch_timeout());
    let prober = HttpProbe::new(client, config.probe_settings());

    let selector = FailoverSelector::new(Arc::new(store), Arc::new(prober), metrics.clone());
    let engine = FailoverEngine::new(selector, Arc::new(SessionHub::new()), metrics);

    Ok(Arc::new(engine))
}

fn load(config_path: &Path) -> CliResult<SwitcherConfig> {
    let config = SwitcherConfig::load(config_path)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("path", &config_path.display().to_string()),
            ("config_url", &config.config_url),
        ],
    );
    Ok(config)
}

fn block_on<F: Future>(future: F) -> CliResult<F::Output> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;
    Ok(rt.block_on(future))
}

/// Serve sessions until the process is stopped
pub fn serve(config_path: &Path) -> CliResult<()> {
    log_event(Event::BootStart);
    let config = load(config_path)?;
    let engine = build_engine(&config)?;

    let state = AppState::new(engine.clone()).with_current_domain(config.current_domain.clone());
    let server = HttpServer::with_config(config.server.clone(), Arc::new(state));

    block_on(async move {
        if config.refresh_on_start {
            // An empty cache is not fatal; sessions retry with REFRESH_CONFIG
            let _ = engine.refresh().await;
        }

        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })?
}

/// One selection for `current`, progress as JSON lines, then the outcome
pub fn check(config_path: &Path, current: &str) -> CliResult<()> {
    let config = load(config_path)?;
    let engine = build_engine(&config)?;

    let outcome = block_on(async {
        engine
            .selector()
            .select_working_domain(current, &StdoutNotifier)
            .await
    })?;

    write_response(json!({
        "current": current,
        "outcome": outcome.as_str(),
        "domain": outcome.domain(),
        "redirect": outcome.redirect_target(current),
    }))
}

/// Repopulate the cache; fails when neither tier has a usable list
pub fn refresh(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;
    let engine = build_engine(&config)?;

    let snapshot = block_on(engine.refresh())??;

    write_response(json!({
        "provenance": snapshot.provenance,
        "candidates": snapshot.candidates,
    }))
}

/// Print what the durable cache holds, without touching the network
pub fn cache(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;
    let engine = build_engine(&config)?;

    let cached = block_on(engine.config_store().cached())??;

    write_response(json!({
        "config_url": config.config_url,
        "candidates": cached,
    }))
}
