//! Lookup of record schemas by record-type identifier

use std::collections::HashMap;
use tracing::debug;

use super::types::{RecordSchema, SchemaError};

/// All record schemas known to the client, keyed by record id.
///
/// Populated once at startup, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, RecordSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema under its own name
    pub fn register(&mut self, schema: RecordSchema) -> Result<(), SchemaError> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::DuplicateRecord(schema.name().to_string()));
        }
        debug!(record = schema.name(), fields = schema.len(), "registered record schema");
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    /// Get schema by record id
    pub fn get(&self, record_id: &str) -> Option<&RecordSchema> {
        self.schemas.get(record_id)
    }

    /// Registered record ids, sorted
    pub fn record_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
