//! Index statistics retrieval and normalization
//!
//! Two wire encodings exist across server generations and both are
//! normalized into [`StatSample`] values:
//! - Flat (per-node indexer API): object keys are `bucket:index:stat`
//!   triples mapped directly to a number.
//! - Sampled (cluster admin API): `op.samples` keys are
//!   `<scope>/<index>/<stat>` mapped to an array of values taken over a
//!   short time window, reduced here to the arithmetic mean.
//!
//! All samples from all nodes merge into one [`AggregatedStats`] structure
//! keyed bucket → index → node → stat, in first-encounter order.

use indexmap::IndexMap;
use serde_json::Value;

/// stat name → normalized value
pub type StatMap = IndexMap<String, f64>;

/// node hostname → stats
pub type NodeStats = IndexMap<String, StatMap>;

/// index name → per-node stats
pub type IndexStats = IndexMap<String, NodeStats>;

/// A single normalized measurement scoped to one reporting node
#[derive(Debug, Clone, PartialEq)]
pub struct StatSample {
    pub bucket: String,
    pub index_name: String,
    pub stat_name: String,
    pub value: f64,
}

/// Merged statistics across every node, bucket → index → node → stat
#[derive(Debug, Default)]
pub struct AggregatedStats {
    buckets: IndexMap<String, IndexStats>,
}

impl AggregatedStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample reported by `node`. A later write for the same
    /// (bucket, index, node, stat) key overwrites the earlier one.
    pub fn insert(&mut self, node: &str, sample: StatSample) {
        self.buckets
            .entry(sample.bucket)
            .or_default()
            .entry(sample.index_name)
            .or_default()
            .entry(node.to_string())
            .or_default()
            .insert(sample.stat_name, sample.value);
    }

    /// Merge every sample from one node's response
    pub fn merge_node(&mut self, node: &str, samples: Vec<StatSample>) {
        for sample in samples {
            self.insert(node, sample);
        }
    }

    /// Nested view in first-encounter order
    pub fn as_map(&self) -> &IndexMap<String, IndexStats> {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of (bucket, index, node) triples held
    pub fn triple_count(&self) -> usize {
        self.buckets
            .values()
            .flat_map(|indexes| indexes.values())
            .map(|nodes| nodes.len())
            .sum()
    }
}

/// Parse a flat per-node stats payload. Keys that do not split into
/// exactly three colon-delimited parts carry node-level counters and are
/// skipped; non-numeric values are skipped as well.
pub fn parse_flat_stats(body: &Value) -> Vec<StatSample> {
    let mut samples = Vec::new();

    let Some(object) = body.as_object() else {
        return samples;
    };

    for (key, value) in object {
        let parts: Vec<&str> = key.split(':').collect();
        if parts.len() != 3 {
            continue;
        }
        let Some(value) = value.as_f64() else {
            continue;
        };
        samples.push(StatSample {
            bucket: parts[0].to_string(),
            index_name: parts[1].to_string(),
            stat_name: parts[2].to_string(),
            value,
        });
    }

    samples
}

/// Parse a windowed-sample stats payload for `bucket`. Each entry under
/// `op.samples` holds a short time series; the normalized value is its
/// arithmetic mean.
pub fn parse_sampled_stats(bucket: &str, body: &Value) -> Vec<StatSample> {
    let mut samples = Vec::new();

    let Some(object) = body.pointer("/op/samples").and_then(Value::as_object) else {
        return samples;
    };

    for (key, value) in object {
        let parts: Vec<&str> = key.split('/').collect();
        if parts.len() != 3 {
            continue;
        }
        let Some(window) = value.as_array() else {
            continue;
        };
        samples.push(StatSample {
            bucket: bucket.to_string(),
            index_name: parts[1].to_string(),
            stat_name: parts[2].to_string(),
            value: window_mean(window),
        });
    }

    samples
}

/// Arithmetic mean of the numeric entries of a sample window
fn window_mean(window: &[Value]) -> f64 {
    let values: Vec<f64> = window.iter().filter_map(Value::as_f64).collect();
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
