//! HTTP client for the cluster admin and indexer APIs

pub mod rest;

pub use rest::{
    normalize_cluster_address, ClusterClient, Credentials, DEFAULT_ADMIN_PORT,
    DEFAULT_INDEXER_PORT,
};
