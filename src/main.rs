//! cb-index-export - index inventory exporter
//!
//! Gathers all indexes from a cluster, along with their definitions,
//! placement and per-node stats, and writes them as CSV or JSON.

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use cb_index_exporter::client::ClusterClient;
use cb_index_exporter::cluster::{discover_buckets, discover_index_nodes};
use cb_index_exporter::config::{ApiGeneration, CliArgs, ExporterConfig};
use cb_index_exporter::export::{build_records, export_records, Destination};
use cb_index_exporter::indexes::{ClusterApi, IndexApi, PerNodeApi};

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // Data goes to stdout in console mode, so all logging goes to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.red} {msg}")
            .unwrap(),
    );
    pb.set_message("Running...");
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

struct ExportSummary {
    nodes: usize,
    records: usize,
}

async fn run_export(config: &ExporterConfig) -> cb_index_exporter::utils::Result<ExportSummary> {
    let client = ClusterClient::new(config.credentials.clone(), config.timeout_ms)?;

    // Discovery is skipped entirely when the node list is given explicitly
    let nodes = match &config.index_nodes {
        Some(list) => {
            info!(count = list.len(), "using explicit index node list");
            list.clone()
        }
        None => discover_index_nodes(&client, &config.base_url).await?,
    };

    let api: Box<dyn IndexApi> = match config.api_generation {
        ApiGeneration::PerNode => Box::new(PerNodeApi),
        ApiGeneration::Cluster => {
            // The cluster-scoped stats endpoint is per bucket, so the bucket
            // list must be known up front
            let buckets = match &config.buckets {
                Some(list) => list.clone(),
                None => discover_buckets(&client, &config.base_url).await?,
            };
            Box::new(ClusterApi::new(config.base_url.clone(), buckets))
        }
    };

    let (definitions, stats) = tokio::try_join!(
        api.fetch_definitions(&client, &nodes),
        api.fetch_stats(&client, &nodes)
    )?;

    let records = build_records(
        &stats,
        &definitions,
        config.buckets.as_deref(),
        &config.field_filter,
    );
    export_records(
        &records,
        &config.destination,
        config.delimiter,
        config.overwrite,
    )?;

    Ok(ExportSummary {
        nodes: nodes.len(),
        records: records.len(),
    })
}

async fn run() -> Result<()> {
    let args = CliArgs::parse_args();
    setup_logging(args.verbose, args.quiet);

    let config = ExporterConfig::from_cli(&args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let pb = (!config.quiet).then(spinner);
    let result = run_export(&config).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let summary = result?;

    if let Destination::File(path) = &config.destination {
        if !config.quiet {
            println!("====================================");
            println!("EXPORT COMPLETE");
            println!("====================================");
            println!("Index nodes: {}", summary.nodes);
            println!("Records written: {}", summary.records);
            println!("Destination: {}", path.display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
