//! Command-line argument parsing

use clap::{Parser, ValueEnum};

/// Gather all indexes from a cluster, along with their definitions, placement and stats
#[derive(Parser, Debug, Clone)]
#[command(name = "cb-index-export")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Connection Options =====
    /// The cluster address, host or host:port
    #[arg(short = 'c', long = "cluster", default_value = "localhost")]
    pub cluster: String,

    /// Use https for admin API requests
    #[arg(long = "secure")]
    pub secure: bool,

    /// Cluster admin or RBAC username
    #[arg(short = 'u', long = "username", default_value = "Administrator")]
    pub username: String,

    /// Cluster admin or RBAC password
    #[arg(short = 'p', long = "password", default_value = "password")]
    pub password: String,

    /// Timeout in milliseconds for each request
    #[arg(short = 't', long = "timeout", default_value_t = 10000)]
    pub timeout: u64,

    // ===== Scope Options =====
    /// Comma-delimited list of index node hostnames; if not specified they
    /// are retrieved from the cluster map
    #[arg(long = "index-nodes", value_delimiter = ',')]
    pub index_nodes: Option<Vec<String>>,

    /// Comma-delimited list of buckets to limit results to
    #[arg(short = 'b', long = "buckets", value_delimiter = ',')]
    pub buckets: Option<Vec<String>>,

    /// Admin API generation to retrieve definitions and stats through
    #[arg(long = "api-generation", value_enum, default_value_t = ApiGeneration::PerNode)]
    pub api_generation: ApiGeneration,

    // ===== Output Options =====
    /// Comma-delimited list of fields/stats to include in the output, "*"
    /// includes everything
    #[arg(short = 'i', long = "include", value_delimiter = ',', default_value = "*")]
    pub include: Vec<String>,

    /// Comma-delimited list of fields/stats to exclude from the output
    #[arg(short = 'e', long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// The string "console" or a destination file path
    #[arg(short = 'o', long = "output", default_value = "results.csv")]
    pub output: String,

    /// Overwrite the destination file if it exists already
    #[arg(short = 'x', long = "overwrite")]
    pub overwrite: bool,

    /// The CSV delimiter to use
    #[arg(short = 'd', long = "delimiter", default_value = ",")]
    pub delimiter: String,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Quiet mode (errors only, no spinner)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Which server API generation to talk to
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiGeneration {
    /// Node-local indexer endpoints, one call per node
    #[default]
    PerNode,
    /// Cluster admin endpoints, definitions in one call, windowed stats
    Cluster,
}

impl CliArgs {
    /// Parse CLI arguments from the command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.delimiter.len() != 1 || !self.delimiter.is_ascii() {
            return Err("--delimiter must be a single ASCII character".to_string());
        }

        if self.timeout == 0 {
            return Err("--timeout must be at least 1".to_string());
        }

        if let Some(nodes) = &self.index_nodes {
            if nodes.iter().any(|n| n.trim().is_empty()) {
                return Err("--index-nodes contains an empty hostname".to_string());
            }
        }

        if self.output.trim().is_empty() {
            return Err("--output must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["test"]);
        assert_eq!(args.cluster, "localhost");
        assert_eq!(args.username, "Administrator");
        assert_eq!(args.password, "password");
        assert_eq!(args.output, "results.csv");
        assert_eq!(args.delimiter, ",");
        assert_eq!(args.timeout, 10000);
        assert_eq!(args.api_generation, ApiGeneration::PerNode);
        assert!(!args.overwrite);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_comma_lists() {
        let args = CliArgs::parse_from([
            "test",
            "--index-nodes",
            "cb1.local,cb2.local",
            "-b",
            "travel-sample,beer-sample",
            "-e",
            "definition,data_size",
        ]);
        assert_eq!(
            args.index_nodes,
            Some(vec!["cb1.local".to_string(), "cb2.local".to_string()])
        );
        assert_eq!(
            args.buckets,
            Some(vec![
                "travel-sample".to_string(),
                "beer-sample".to_string()
            ])
        );
        assert_eq!(args.exclude, vec!["definition", "data_size"]);
    }

    #[test]
    fn test_api_generation_flag() {
        let args = CliArgs::parse_from(["test", "--api-generation", "cluster"]);
        assert_eq!(args.api_generation, ApiGeneration::Cluster);
    }

    #[test]
    fn test_validation_bad_delimiter() {
        let args = CliArgs::parse_from(["test", "-d", "||"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let args = CliArgs::parse_from(["test", "-t", "0"]);
        assert!(args.validate().is_err());
    }
}
