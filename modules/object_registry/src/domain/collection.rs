//! Runtime collections bound to registered classes

use super::registry::ClassRecord;
use super::repository::Database;
use super::validation::ValidationMode;
use crate::contract::{SchemaDefinition, ValidationReport};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Storage backend a collection persists to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PersistenceKind {
    #[default]
    Memory,
    Sqlite,
    Postgres,
}

impl PersistenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }
}

/// Persistence configuration passed to collection construction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistenceConfig {
    pub kind: PersistenceKind,
    /// Path or URL of the store
    pub location: Option<String>,
    /// Materialize the class schema when the collection is created
    pub auto_sync: bool,
    /// Backend-specific settings; not part of the cache signature
    pub extra: Map<String, Value>,
}

impl PersistenceConfig {
    /// Structural signature used for cache-key equivalence, as canonical JSON.
    ///
    /// Covers `kind`, `location` and `auto_sync` only: two configs that differ
    /// just in `extra` share one cached collection.
    pub fn signature(&self) -> String {
        json!({
            "kind": self.kind.as_str(),
            "location": self.location,
            "auto_sync": self.auto_sync,
        })
        .to_string()
    }
}

/// Options for constructing a collection
#[derive(Clone, Default)]
pub struct CollectionOptions {
    pub persistence: PersistenceConfig,
    pub database: Option<Arc<dyn Database>>,
    /// Opaque AI capability handed through to the collection
    pub ai: Option<Arc<dyn Any + Send + Sync>>,
}

impl fmt::Debug for CollectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionOptions")
            .field("persistence", &self.persistence)
            .field("database", &self.database.is_some())
            .field("ai", &self.ai.is_some())
            .finish()
    }
}

impl CollectionOptions {
    pub fn new(persistence: PersistenceConfig) -> Self {
        Self {
            persistence,
            ..Self::default()
        }
    }

    pub fn with_database(mut self, database: Arc<dyn Database>) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_ai(mut self, ai: Arc<dyn Any + Send + Sync>) -> Self {
        self.ai = Some(ai);
        self
    }
}

/// Bulk/query operations over instances of one class
pub trait Collection: Send + Sync + 'static {
    fn class_name(&self) -> &str;

    fn table_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// Constructs collections for a class
#[async_trait]
pub trait CollectionType: Send + Sync {
    fn name(&self) -> &str;

    /// `schema` is the class schema resolved against the registry at request time
    async fn create(
        &self,
        class: Arc<ClassRecord>,
        schema: SchemaDefinition,
        options: CollectionOptions,
    ) -> anyhow::Result<Arc<dyn Collection>>;
}

/// Collection synthesized for classes without an explicit binding
pub struct TableCollection {
    class: Arc<ClassRecord>,
    schema: SchemaDefinition,
    options: CollectionOptions,
}

impl TableCollection {
    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    pub fn persistence(&self) -> &PersistenceConfig {
        &self.options.persistence
    }

    pub fn has_database(&self) -> bool {
        self.options.database.is_some()
    }

    pub fn ai(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.options.ai.as_ref()
    }

    /// Validate an instance against the class validators
    pub async fn validate(&self, instance: &Value, mode: ValidationMode) -> ValidationReport {
        self.class.validate(instance, mode).await
    }
}

impl Collection for TableCollection {
    fn class_name(&self) -> &str {
        &self.class.name
    }

    fn table_name(&self) -> &str {
        self.class.table_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds [`TableCollection`]s, syncing the schema first when asked to
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCollectionType;

#[async_trait]
impl CollectionType for DefaultCollectionType {
    fn name(&self) -> &str {
        "table"
    }

    async fn create(
        &self,
        class: Arc<ClassRecord>,
        schema: SchemaDefinition,
        options: CollectionOptions,
    ) -> anyhow::Result<Arc<dyn Collection>> {
        if options.persistence.auto_sync {
            if let Some(database) = &options.database {
                database.sync_schema(&schema).await?;
                tracing::info!(class = %class.name, table = %schema.table_name, "Synced schema for collection");
            }
        }

        Ok(Arc::new(TableCollection {
            class,
            schema,
            options,
        }))
    }
}
