//! Outbound traits for persistence
//!
//! Implementations are in infra/storage.

use crate::contract::{ClassSummary, SchemaDefinition};
use anyhow::Result;
use async_trait::async_trait;

/// Database the registry materializes schemas into
#[async_trait]
pub trait Database: Send + Sync {
    /// Create the table and indexes of one class if they do not exist
    async fn sync_schema(&self, schema: &SchemaDefinition) -> Result<()>;
}

/// Repository for class summaries in the registry system table
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    /// Insert or wholesale replace the row of one class
    async fn upsert(&self, summary: &ClassSummary) -> Result<()>;

    /// Find the row of one class
    async fn find(&self, class_name: &str) -> Result<Option<ClassSummary>>;

    /// List all rows ordered by class name
    async fn list_all(&self) -> Result<Vec<ClassSummary>>;
}
