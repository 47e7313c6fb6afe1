//! Index definitions and statistics
//!
//! This module provides:
//! - Definition retrieval (structured and free-text statement parsing)
//! - Stat normalization for both wire encodings
//! - The API-generation strategy selecting between them

pub mod definitions;
pub mod generation;
pub mod stats;

pub use definitions::{parse_create_statement, DefinitionMap, IndexDefinition, IndexStatusEntry};
pub use generation::{ClusterApi, IndexApi, PerNodeApi};
pub use stats::{parse_flat_stats, parse_sampled_stats, AggregatedStats, StatMap, StatSample};
