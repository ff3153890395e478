use crate::specification::Schema;
use std::collections::BTreeMap;

/// Named component schemas collected while a document is assembled.
///
/// A name is written at most once: the first registration wins and later
/// ones are no-ops. A later registration whose body differs from the stored
/// one is remembered in [`SchemaRegistry::conflicts`] so callers can decide
/// whether that is acceptable.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Schema>,
    conflicts: Vec<String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under `name`. Returns `true` if it was inserted.
    pub fn register(&mut self, name: &str, schema: Schema) -> bool {
        match self.schemas.get(name) {
            Some(existing) => {
                if *existing != schema {
                    tracing::debug!("Schema '{}' already registered with a different shape", name);
                    if !self.conflicts.iter().any(|c| c == name) {
                        self.conflicts.push(name.to_string());
                    }
                }
                false
            }
            None => {
                self.schemas.insert(name.to_string(), schema);
                true
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Names registered more than once with divergent bodies
    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    /// Consume the registry and return the schemas for `components.schemas`
    pub fn into_schemas(self) -> BTreeMap<String, Schema> {
        self.schemas
    }
}
