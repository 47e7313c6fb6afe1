//! cb-index-exporter library
//!
//! Point-in-time inventory of index placement and load for a clustered
//! database: discovers index nodes through the admin REST API, retrieves
//! definitions and per-node stats concurrently, joins them into one flat
//! record per (bucket, index, node) and exports CSV or JSON.

pub mod client;
pub mod cluster;
pub mod config;
pub mod export;
pub mod indexes;
pub mod utils;
