//! API generation strategies
//!
//! Older and newer server generations expose index metadata through
//! different endpoints and encodings. One pipeline serves both by going
//! through the [`IndexApi`] trait:
//! - [`PerNodeApi`]: node-local indexer endpoints, flat stat keys,
//!   free-text definition statements.
//! - [`ClusterApi`]: admin endpoints, one `indexStatus` call for all
//!   definitions, windowed per-bucket/per-node stat samples.
//!
//! All fan-out requests run concurrently and fail fast: the first request
//! error aborts the batch, in-flight siblings are dropped. The one tolerated
//! failure is a 404 from the per-node definition endpoint, which older
//! servers simply do not have.

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, info};

use super::definitions::{parse_index_status, DefinitionMap};
use super::stats::{parse_flat_stats, parse_sampled_stats, AggregatedStats};
use crate::client::{ClusterClient, DEFAULT_ADMIN_PORT, DEFAULT_INDEXER_PORT};
use crate::utils::Result;

/// Retrieval strategy for index definitions and statistics
#[async_trait]
pub trait IndexApi: Send + Sync {
    /// Retrieve all index definitions visible to the given nodes
    async fn fetch_definitions(
        &self,
        client: &ClusterClient,
        nodes: &[String],
    ) -> Result<DefinitionMap>;

    /// Retrieve and normalize index statistics from the given nodes
    async fn fetch_stats(
        &self,
        client: &ClusterClient,
        nodes: &[String],
    ) -> Result<AggregatedStats>;
}

/// Node-local indexer API (ports 9102), one call per node
pub struct PerNodeApi;

#[async_trait]
impl IndexApi for PerNodeApi {
    async fn fetch_definitions(
        &self,
        client: &ClusterClient,
        nodes: &[String],
    ) -> Result<DefinitionMap> {
        let requests = nodes.iter().map(|node| async move {
            let url = format!("http://{node}:{DEFAULT_INDEXER_PORT}/getIndexStatement");
            match client.get_json(&url).await {
                Ok(body) => serde_json::from_value::<Vec<String>>(body).map_err(|e| {
                    crate::utils::ExportError::Parse(format!(
                        "unexpected statement list from {url}: {e}"
                    ))
                }),
                // Endpoint absent on older server versions
                Err(e) if e.is_endpoint_missing() => {
                    debug!(node = %node, "definition endpoint absent, skipping");
                    Ok(Vec::new())
                }
                Err(e) => Err(e),
            }
        });

        let mut map = DefinitionMap::new();
        for statements in try_join_all(requests).await? {
            map.merge_statements(statements)?;
        }
        info!(definitions = map.len(), "retrieved index definitions");
        Ok(map)
    }

    async fn fetch_stats(
        &self,
        client: &ClusterClient,
        nodes: &[String],
    ) -> Result<AggregatedStats> {
        let requests = nodes.iter().map(|node| async move {
            let url = format!("http://{node}:{DEFAULT_INDEXER_PORT}/stats");
            let body = client.get_json(&url).await?;
            Ok::<_, crate::utils::ExportError>((node, parse_flat_stats(&body)))
        });

        let mut stats = AggregatedStats::new();
        for (node, samples) in try_join_all(requests).await? {
            stats.merge_node(node, samples);
        }
        info!(triples = stats.triple_count(), "retrieved index stats");
        Ok(stats)
    }
}

/// Cluster admin API, definitions from one `indexStatus` call, stats from
/// the bucket × node cross-product
pub struct ClusterApi {
    base_url: String,
    buckets: Vec<String>,
}

impl ClusterApi {
    pub fn new(base_url: String, buckets: Vec<String>) -> Self {
        Self { base_url, buckets }
    }
}

#[async_trait]
impl IndexApi for ClusterApi {
    async fn fetch_definitions(
        &self,
        client: &ClusterClient,
        _nodes: &[String],
    ) -> Result<DefinitionMap> {
        let url = format!("{}/indexStatus", self.base_url);
        let body = client.get_json(&url).await?;
        let map = DefinitionMap::from_status_entries(parse_index_status(&body)?);
        info!(definitions = map.len(), "retrieved index definitions");
        Ok(map)
    }

    async fn fetch_stats(
        &self,
        client: &ClusterClient,
        nodes: &[String],
    ) -> Result<AggregatedStats> {
        let mut requests = Vec::with_capacity(self.buckets.len() * nodes.len());
        for bucket in &self.buckets {
            for node in nodes {
                let url = format!(
                    "{}/pools/default/buckets/{}/nodes/{}/stats",
                    self.base_url,
                    bucket,
                    admin_node_name(node)
                );
                requests.push(async move {
                    let body = client.get_json(&url).await?;
                    Ok::<_, crate::utils::ExportError>((node, parse_sampled_stats(bucket, &body)))
                });
            }
        }

        let mut stats = AggregatedStats::new();
        for (node, samples) in try_join_all(requests).await? {
            stats.merge_node(node, samples);
        }
        info!(triples = stats.triple_count(), "retrieved index stats");
        Ok(stats)
    }
}

/// Node name as the admin stats path expects it, with the admin port attached
fn admin_node_name(node: &str) -> String {
    if node.contains(':') {
        node.to_string()
    } else {
        format!("{node}:{DEFAULT_ADMIN_PORT}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_node_name() {
        assert_eq!(admin_node_name("cb1.local"), "cb1.local:8091");
        assert_eq!(admin_node_name("cb1.local:9000"), "cb1.local:9000");
    }
}
