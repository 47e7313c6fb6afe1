//! Exporter configuration derived from CLI arguments

use super::cli::{ApiGeneration, CliArgs};
use crate::client::{normalize_cluster_address, Credentials};
use crate::export::{Destination, FieldFilter};

/// Complete, validated exporter configuration
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    // Connection
    pub base_url: String,
    pub credentials: Credentials,
    pub timeout_ms: u64,

    // Scope
    pub index_nodes: Option<Vec<String>>,
    pub buckets: Option<Vec<String>>,
    pub api_generation: ApiGeneration,

    // Output
    pub field_filter: FieldFilter,
    pub destination: Destination,
    pub overwrite: bool,
    pub delimiter: u8,

    // UI
    pub quiet: bool,
    pub verbose: bool,
}

impl ExporterConfig {
    /// Resolve CLI arguments into a runnable configuration
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        args.validate()?;

        Ok(Self {
            base_url: normalize_cluster_address(&args.cluster, args.secure),
            credentials: Credentials {
                username: args.username.clone(),
                password: args.password.clone(),
            },
            timeout_ms: args.timeout,
            index_nodes: args.index_nodes.clone(),
            buckets: args.buckets.clone(),
            api_generation: args.api_generation,
            field_filter: FieldFilter::new(args.include.clone(), args.exclude.clone()),
            destination: Destination::parse(&args.output),
            overwrite: args.overwrite,
            delimiter: args.delimiter.as_bytes()[0],
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }
}
