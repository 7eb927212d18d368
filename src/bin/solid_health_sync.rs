// ABOUTME: Command-line entry point syncing fitness data into a Solid pod
// ABOUTME: Runs one full sync session or prints where observations are stored
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Sync the last months of Google Fit data into the pod
//! solid-health-sync sync --web-id https://alice.pod.example/profile/card#me \
//!     --token "$POD_TOKEN" --google-fit-token "$FIT_TOKEN"
//!
//! # Try the pipeline with generated samples
//! solid-health-sync sync --web-id https://alice.pod.example/profile/card#me \
//!     --token "$POD_TOKEN" --provider synthetic --synthetic-days 60
//!
//! # Show the observation document registered in the type index
//! solid-health-sync status --web-id https://alice.pod.example/profile/card#me --token "$POD_TOKEN"
//! ```

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

use solid_health_sync::config::{ProviderKind, SyncConfig};
use solid_health_sync::errors::SyncResult;
use solid_health_sync::logging::{LoggingConfig, SyncLogger};
use solid_health_sync::models::SyncStatus;
use solid_health_sync::pod::{resolve, Fetcher, GuardedPod, HttpPodClient};
use solid_health_sync::profile::ProfileLoader;
use solid_health_sync::providers::{initialize_shared_client, shared_client, FitnessDataSource};
#[cfg(feature = "provider-google-fit")]
use solid_health_sync::providers::GoogleFitProvider;
#[cfg(feature = "provider-synthetic")]
use solid_health_sync::providers::SyntheticSource;
use solid_health_sync::rdf::Graph;
use solid_health_sync::sync::{GenerationToken, Identity, RunSummary, SessionManager};
use solid_health_sync::type_index::{find_registration, ObservationLocation};

#[derive(Parser)]
#[command(
    name = "solid-health-sync",
    about = "Sync fitness data into a Solid pod",
    long_about = "Reconciles step, distance and heart-rate samples from a fitness provider with FHIR observations stored on a Solid pod."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run one full sync session
    Sync(SyncArgs),

    /// Print the profile and the registered observation document
    Status(PodArgs),
}

#[derive(Args)]
struct PodArgs {
    /// WebID of the pod owner
    #[arg(long, env = "SOLID_HEALTH_WEB_ID")]
    web_id: String,

    /// Bearer token for pod requests
    #[arg(long, env = "SOLID_HEALTH_POD_TOKEN")]
    token: Option<String>,
}

#[derive(Args)]
struct SyncArgs {
    #[command(flatten)]
    pod: PodArgs,

    /// Fitness data source, overrides SOLID_HEALTH_PROVIDER
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,

    /// Google Fit OAuth access token
    #[arg(long, env = "GOOGLE_FIT_ACCESS_TOKEN")]
    google_fit_token: Option<String>,

    /// Days of generated samples for the synthetic provider
    #[arg(long, default_value = "30")]
    synthetic_days: i64,

    /// Observations per upload request, overrides SOLID_HEALTH_BATCH_SIZE
    #[arg(long)]
    batch_size: Option<usize>,

    /// Stop after this many months, overrides SOLID_HEALTH_MAX_MONTHS
    #[arg(long)]
    max_months: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    LoggingConfig::from_env().verbose(cli.verbose).init()?;

    let mut config = SyncConfig::from_env()?;
    initialize_shared_client(config.http);

    match cli.command {
        Command::Sync(args) => {
            if let Some(provider) = args.provider {
                config.provider = provider;
            }
            if let Some(batch_size) = args.batch_size {
                config.engine.batch_size = batch_size;
            }
            if args.max_months.is_some() {
                config.engine.max_months = args.max_months;
            }
            config.validate()?;
            info!("{}", config.summary());
            run_sync(config, args).await
        }
        Command::Status(args) => print_status(&args, &config.engine.layout.observation_file).await,
    }
}

fn pod_client(args: &PodArgs) -> HttpPodClient {
    let client = HttpPodClient::new(shared_client().clone());
    match &args.token {
        Some(token) => client.with_bearer_token(token),
        None => client,
    }
}

async fn build_source(kind: ProviderKind, args: &SyncArgs) -> Result<Arc<dyn FitnessDataSource>> {
    match kind {
        #[cfg(feature = "provider-google-fit")]
        ProviderKind::GoogleFit => {
            let token = args.google_fit_token.clone().ok_or_else(|| {
                anyhow!("--google-fit-token or GOOGLE_FIT_ACCESS_TOKEN is required")
            })?;
            let provider = GoogleFitProvider::new();
            provider.set_access_token(token).await;
            Ok(Arc::new(provider))
        }
        #[cfg(feature = "provider-synthetic")]
        ProviderKind::Synthetic => {
            let today = Utc::now().date_naive();
            let source = SyntheticSource::new();
            source.fill_daily(today - Duration::days(args.synthetic_days.max(0)), today);
            Ok(Arc::new(source))
        }
        #[allow(unreachable_patterns)]
        other => Err(anyhow!("provider {other} is not enabled in this build")),
    }
}

fn render(status: &SyncStatus) -> String {
    let mut line = match status.max_value {
        Some(max) => format!("[{}/{max}] {}", status.value, status.description),
        None => status.description.clone(),
    };
    if let Some(error) = &status.error {
        line.push_str(": ");
        line.push_str(error);
    }
    line
}

async fn run_sync(config: SyncConfig, args: SyncArgs) -> Result<()> {
    let source = build_source(config.provider, &args).await?;
    let manager = Arc::new(SessionManager::new(source, config.engine));

    let mut statuses = manager.buses().status.subscribe();
    let printer = tokio::spawn(async move {
        let current = render(&statuses.borrow_and_update());
        println!("{current}");
        while statuses.changed().await.is_ok() {
            let status = statuses.borrow_and_update().clone();
            println!("{}", render(&status));
        }
    });

    let identity = Identity::new(args.pod.web_id.clone(), Arc::new(pod_client(&args.pod)));
    let mut run = manager
        .handle_identity(Some(identity))
        .await
        .ok_or_else(|| anyhow!("no session was started"))?;

    let outcome = tokio::select! {
        joined = &mut run => joined?,
        _ = signal::ctrl_c() => {
            warn!("Interrupted, stopping after the current request");
            manager.handle_identity(None).await;
            run.await?
        }
    };
    printer.abort();

    let Some(summary) = settle(outcome)? else {
        info!("Sync stopped before completion");
        return Ok(());
    };
    SyncLogger::log_run_summary(&args.pod.web_id, &summary);
    println!(
        "Synced {} month(s): {} created, {} modified",
        summary.months, summary.created, summary.modified
    );
    Ok(())
}

/// A run stopped by a newer identity or a logout ends quietly
fn settle(outcome: SyncResult<RunSummary>) -> Result<Option<RunSummary>> {
    match outcome {
        Ok(summary) => Ok(Some(summary)),
        Err(err) if err.is_superseded() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

async fn print_status(args: &PodArgs, observation_file: &str) -> Result<()> {
    let pod = GuardedPod::new(Arc::new(pod_client(args)), GenerationToken::detached());
    let profile = ProfileLoader::new(&pod).load(&args.web_id).await?;

    println!("WebID:       {}", profile.web_id);
    println!("Name:        {}", profile.name.as_deref().unwrap_or("-"));
    println!("Friends:     {}", profile.friends.len());

    let Some(type_index) = profile.private_type_index else {
        println!("Type index:  none");
        return Ok(());
    };
    println!("Type index:  {type_index}");

    let mut graph = Graph::new();
    Fetcher::new(&pod).load(&mut graph, &type_index).await?;
    match find_registration(&graph) {
        Some(ObservationLocation::Instance(uri)) => println!("Observations: {uri}"),
        Some(ObservationLocation::Container(container)) => {
            let document = resolve(&container, observation_file)?;
            println!("Observations: {document} (container {container})");
        }
        None => println!("Observations: not registered, the next sync creates them"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solid_health_sync::errors::SyncError;

    #[test]
    fn test_superseded_run_settles_cleanly() {
        let outcome = settle(Err(SyncError::Superseded { generation: 1 })).unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_completed_and_failed_runs_settle() {
        let summary = RunSummary {
            months: 2,
            modified: 1,
            created: 40,
        };
        assert_eq!(settle(Ok(summary)).unwrap(), Some(summary));

        let failed = settle(Err(SyncError::Config("bad".to_owned())));
        assert!(failed.is_err());
    }

    #[test]
    fn test_render_status_lines() {
        assert_eq!(render(&SyncStatus::progress("Syncing", 3, 10)), "[3/10] Syncing");
        let failed = render(&SyncStatus::failed("Could not sync data", "boom"));
        assert_eq!(failed, "[0/1] Could not sync data: boom");
    }
}
