//! Cluster topology discovery
//!
//! Queries `/pools/default` for the node list and keeps only the nodes
//! running the index service. Hostnames are reported by the cluster with the
//! admin port attached; downstream requests target the indexer port, so the
//! port suffix is stripped here.

use serde::Deserialize;
use tracing::info;

use crate::client::ClusterClient;
use crate::utils::Result;

/// Service tag identifying index nodes in the topology response
const INDEX_SERVICE: &str = "index";

/// One node descriptor from the topology endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescriptor {
    pub hostname: String,
    #[serde(default)]
    pub services: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PoolsResponse {
    #[serde(default)]
    nodes: Vec<NodeDescriptor>,
}

#[derive(Debug, Deserialize)]
struct BucketDescriptor {
    name: String,
}

/// Strip a trailing `:port` suffix from a hostname
pub fn strip_port(hostname: &str) -> &str {
    match hostname.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => hostname,
    }
}

/// Filter a topology node list down to index-service hostnames, in
/// topology order
pub fn index_node_hostnames(nodes: &[NodeDescriptor]) -> Vec<String> {
    nodes
        .iter()
        .filter(|n| n.services.iter().any(|s| s == INDEX_SERVICE))
        .map(|n| strip_port(&n.hostname).to_string())
        .collect()
}

/// Discover the hostnames of all nodes running the index service
pub async fn discover_index_nodes(
    client: &ClusterClient,
    base_url: &str,
) -> Result<Vec<String>> {
    let url = format!("{base_url}/pools/default");
    let body = client.get_json(&url).await?;
    let pools: PoolsResponse = serde_json::from_value(body)
        .map_err(|e| crate::utils::ExportError::Parse(format!("unexpected topology shape: {e}")))?;

    let hostnames = index_node_hostnames(&pools.nodes);
    info!(count = hostnames.len(), "discovered index nodes");
    Ok(hostnames)
}

/// List all bucket names known to the cluster, in response order
pub async fn discover_buckets(client: &ClusterClient, base_url: &str) -> Result<Vec<String>> {
    let url = format!("{base_url}/pools/default/buckets");
    let body = client.get_json(&url).await?;
    let buckets: Vec<BucketDescriptor> = serde_json::from_value(body)
        .map_err(|e| crate::utils::ExportError::Parse(format!("unexpected bucket list: {e}")))?;

    Ok(buckets.into_iter().map(|b| b.name).collect())
}
