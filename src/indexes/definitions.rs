//! Index definition retrieval and parsing
//!
//! Definitions arrive in one of two shapes depending on the API generation:
//! structured entries from the cluster-wide `indexStatus` endpoint, or raw
//! `CREATE INDEX ... ON ...` statement strings from the node-local indexer
//! endpoint. Both collapse into a [`DefinitionMap`] keyed bucket → index.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::utils::{ExportError, Result};

/// One index definition, merged across every node that reported it
#[derive(Debug, Clone)]
pub struct IndexDefinition {
    pub bucket: String,
    pub index_name: String,
    /// Full CREATE INDEX statement text
    pub statement: String,
    /// Storage mode, only known to the cluster-scoped API
    pub storage_mode: Option<String>,
    /// Hosts reported as holding this index, only known to the
    /// cluster-scoped API
    pub hosts: Vec<String>,
}

/// One entry of the cluster-scoped `indexStatus` response
#[derive(Debug, Clone, Deserialize)]
pub struct IndexStatusEntry {
    pub bucket: String,
    pub index: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default, rename = "storageMode")]
    pub storage_mode: Option<String>,
    #[serde(default)]
    pub hosts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IndexStatusResponse {
    #[serde(default)]
    indexes: Vec<IndexStatusEntry>,
}

/// bucket → index name → definition, in first-encounter order.
///
/// Replicas report the same definition from several nodes; inserts are
/// last-write-wins per (bucket, index) key.
#[derive(Debug, Default)]
pub struct DefinitionMap {
    buckets: IndexMap<String, IndexMap<String, IndexDefinition>>,
}

impl DefinitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, definition: IndexDefinition) {
        self.buckets
            .entry(definition.bucket.clone())
            .or_default()
            .insert(definition.index_name.clone(), definition);
    }

    pub fn get(&self, bucket: &str, index_name: &str) -> Option<&IndexDefinition> {
        self.buckets.get(bucket)?.get(index_name)
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(|indexes| indexes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Parse and merge a batch of raw CREATE INDEX statements
    pub fn merge_statements(&mut self, statements: Vec<String>) -> Result<()> {
        for statement in statements {
            let (index_name, bucket) = parse_create_statement(&statement)?;
            self.insert(IndexDefinition {
                bucket,
                index_name,
                statement,
                storage_mode: None,
                hosts: Vec::new(),
            });
        }
        Ok(())
    }

    /// Build from a parsed cluster-scoped `indexStatus` body
    pub fn from_status_entries(entries: Vec<IndexStatusEntry>) -> Self {
        let mut map = Self::new();
        for entry in entries {
            map.insert(IndexDefinition {
                bucket: entry.bucket,
                index_name: entry.index,
                statement: entry.definition,
                storage_mode: entry.storage_mode,
                hosts: entry.hosts,
            });
        }
        map
    }
}

/// Parse the `indexStatus` response body into its entries
pub fn parse_index_status(body: &Value) -> Result<Vec<IndexStatusEntry>> {
    let response: IndexStatusResponse = serde_json::from_value(body.clone())
        .map_err(|e| ExportError::Parse(format!("unexpected indexStatus shape: {e}")))?;
    Ok(response.indexes)
}

/// Extract (index name, bucket name) from a CREATE INDEX statement.
///
/// The statement splits on the literal ` ON `; the index name is the first
/// backtick-delimited token on the left, the bucket name the first on the
/// right.
pub fn parse_create_statement(statement: &str) -> Result<(String, String)> {
    let (left, right) = statement.split_once(" ON ").ok_or_else(|| {
        ExportError::Parse(format!("definition statement has no ON clause: {statement}"))
    })?;

    let index_name = backtick_token(left).ok_or_else(|| {
        ExportError::Parse(format!("no index name in definition statement: {statement}"))
    })?;
    let bucket = backtick_token(right).ok_or_else(|| {
        ExportError::Parse(format!("no bucket name in definition statement: {statement}"))
    })?;

    Ok((index_name.to_string(), bucket.to_string()))
}

/// First backtick-delimited token of `text`, if any
fn backtick_token(text: &str) -> Option<&str> {
    text.split('`').nth(1).filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_statement() {
        let (index_name, bucket) =
            parse_create_statement("CREATE INDEX `idx1` ON `travel-sample` USING GSI").unwrap();
        assert_eq!(index_name, "idx1");
        assert_eq!(bucket, "travel-sample");
    }

    #[test]
    fn test_parse_create_statement_with_fields() {
        let (index_name, bucket) = parse_create_statement(
            "CREATE INDEX `def_city` ON `travel-sample`(`city`) WITH { \"num_replica\": 1 }",
        )
        .unwrap();
        assert_eq!(index_name, "def_city");
        assert_eq!(bucket, "travel-sample");
    }

    #[test]
    fn test_parse_create_statement_missing_on() {
        assert!(parse_create_statement("CREATE INDEX `idx1`").is_err());
    }

    #[test]
    fn test_parse_create_statement_missing_backticks() {
        assert!(parse_create_statement("CREATE INDEX idx1 ON bucket").is_err());
    }

    #[test]
    fn test_merge_statements_last_write_wins() {
        let mut map = DefinitionMap::new();
        map.merge_statements(vec![
            "CREATE INDEX `i1` ON `b1` USING GSI".to_string(),
            "CREATE INDEX `i1` ON `b1`(`city`) USING GSI".to_string(),
        ])
        .unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("b1", "i1").unwrap().statement,
            "CREATE INDEX `i1` ON `b1`(`city`) USING GSI"
        );
    }

    #[test]
    fn test_from_status_entries() {
        let body = serde_json::json!({
            "indexes": [
                {
                    "bucket": "travel-sample",
                    "index": "def_city",
                    "definition": "CREATE INDEX `def_city` ON `travel-sample`(`city`)",
                    "storageMode": "plasma",
                    "hosts": ["cb1.local:8091"]
                }
            ]
        });

        let entries = parse_index_status(&body).unwrap();
        let map = DefinitionMap::from_status_entries(entries);

        let def = map.get("travel-sample", "def_city").unwrap();
        assert_eq!(def.storage_mode.as_deref(), Some("plasma"));
        assert_eq!(def.hosts, vec!["cb1.local:8091"]);
    }

    #[test]
    fn test_lookup_missing_definition() {
        let map = DefinitionMap::new();
        assert!(map.get("b1", "i1").is_none());
    }
}
