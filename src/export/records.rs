//! Record builder
//!
//! Joins the aggregated stats with the definition map into one flat record
//! per (bucket, index, node) triple and applies the include/exclude field
//! projection. Iteration order at every level is the order keys were first
//! encountered, so the output is stable across runs against the same
//! cluster state.

use indexmap::IndexMap;
use serde_json::Value;

use crate::indexes::{AggregatedStats, DefinitionMap};

/// Placeholder rendered when no definition is known for a (bucket, index)
pub const MISSING_DEFINITION: &str = "N/A";

/// One flat output record, field name → scalar
pub type Record = IndexMap<String, Value>;

/// Include/exclude field projection.
///
/// The filter applies uniformly to every field, identity fields included:
/// excluding `bucket` really does drop the bucket column. That mirrors the
/// tool's long-standing behavior and is kept on purpose.
#[derive(Debug, Clone, Default)]
pub struct FieldFilter {
    include: Option<Vec<String>>,
    exclude: Vec<String>,
}

impl FieldFilter {
    /// Build a filter; an empty include list or the `*` wildcard keeps
    /// every field
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        let include = if include.is_empty() || include.iter().any(|f| f == "*") {
            None
        } else {
            Some(include)
        };
        Self { include, exclude }
    }

    /// Should `field` appear in the output?
    pub fn retain(&self, field: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.iter().any(|f| f == field) {
                return false;
            }
        }
        !self.exclude.iter().any(|f| f == field)
    }
}

/// Build one record per (bucket, index, node) triple present in `stats`.
///
/// `bucket_filter` limits the scope when given; otherwise every bucket with
/// stats is exported. A missing definition renders as [`MISSING_DEFINITION`];
/// the storage mode field only exists when the API generation supplies one.
pub fn build_records(
    stats: &AggregatedStats,
    definitions: &DefinitionMap,
    bucket_filter: Option<&[String]>,
    filter: &FieldFilter,
) -> Vec<Record> {
    let mut records = Vec::new();

    for (bucket, indexes) in stats.as_map() {
        if let Some(allowed) = bucket_filter {
            if !allowed.iter().any(|b| b == bucket) {
                continue;
            }
        }

        for (index_name, nodes) in indexes {
            let definition = definitions.get(bucket, index_name);

            for (node, stat_map) in nodes {
                let mut record = Record::new();

                let put = |record: &mut Record, field: &str, value: Value| {
                    if filter.retain(field) {
                        record.insert(field.to_string(), value);
                    }
                };

                put(&mut record, "bucket", Value::String(bucket.clone()));
                put(&mut record, "index_name", Value::String(index_name.clone()));
                put(
                    &mut record,
                    "definition",
                    Value::String(
                        definition
                            .map(|d| d.statement.clone())
                            .unwrap_or_else(|| MISSING_DEFINITION.to_string()),
                    ),
                );
                if let Some(mode) = definition.and_then(|d| d.storage_mode.clone()) {
                    put(&mut record, "storage_mode", Value::String(mode));
                }
                put(&mut record, "index_node", Value::String(node.clone()));

                for (stat_name, value) in stat_map {
                    put(&mut record, stat_name, number_value(*value));
                }

                records.push(record);
            }
        }
    }

    records
}

/// Render a normalized stat value, preferring integer form when exact
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < (1u64 << 53) as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
