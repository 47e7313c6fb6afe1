//! Cluster topology discovery
//!
//! This module provides:
//! - Node discovery via the admin topology endpoint
//! - Index-service filtering
//! - Bucket listing for the cluster-scoped API generation

pub mod discovery;

pub use discovery::{
    discover_buckets, discover_index_nodes, index_node_hostnames, strip_port, NodeDescriptor,
};
