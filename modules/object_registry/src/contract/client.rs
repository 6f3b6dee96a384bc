//! Native client trait for inter-module communication
//!
//! Read-only query surface over the registry. Direct function calls, no HTTP.

use super::{
    error::RegistryError,
    model::{ClassConfig, FieldDefinition, ObjectMetadata, Relationship, SchemaDefinition},
};
use async_trait::async_trait;
use indexmap::IndexMap;

/// Object registry API for inter-module communication
#[async_trait]
pub trait RegistryApi: Send + Sync {
    // ===== Per-class Queries =====

    /// Get the declared fields of a class, in declaration order
    async fn get_fields(&self, class_name: &str) -> Result<Vec<FieldDefinition>, RegistryError>;

    /// Get the declarative configuration of a class
    async fn get_config(&self, class_name: &str) -> Result<ClassConfig, RegistryError>;

    /// Get the compiled schema of a class
    async fn get_schema(&self, class_name: &str) -> Result<SchemaDefinition, RegistryError>;

    /// Get the DDL text of a class
    async fn get_ddl(&self, class_name: &str) -> Result<String, RegistryError>;

    /// Get the table name of a class
    async fn get_table_name(&self, class_name: &str) -> Result<String, RegistryError>;

    /// Get outgoing relationships of a class
    async fn get_relationships(&self, class_name: &str)
        -> Result<Vec<Relationship>, RegistryError>;

    /// Get relationships pointing at a class
    async fn get_inverse_relationships(
        &self,
        class_name: &str,
    ) -> Result<Vec<Relationship>, RegistryError>;

    /// Get the introspection view of a class
    async fn get_object_metadata(&self, class_name: &str)
        -> Result<ObjectMetadata, RegistryError>;

    // ===== Registry-wide Queries =====

    /// List all registered class names in registration order
    async fn list_classes(&self) -> Result<Vec<String>, RegistryError>;

    /// Get the foreign-key dependency graph
    async fn get_dependency_graph(&self) -> Result<IndexMap<String, Vec<String>>, RegistryError>;

    /// Get class names ordered so dependencies precede dependents
    async fn get_initialization_order(&self) -> Result<Vec<String>, RegistryError>;

    /// Get all relationships grouped by source class
    async fn get_relationship_map(
        &self,
    ) -> Result<IndexMap<String, Vec<Relationship>>, RegistryError>;

    /// Get the introspection view of every class
    async fn get_all_object_metadata(&self) -> Result<Vec<ObjectMetadata>, RegistryError>;
}
