//! Native client implementation - wraps the registry for in-process calls

use crate::contract::{
    ClassConfig, FieldDefinition, ObjectMetadata, RegistryApi, RegistryError, Relationship,
    SchemaDefinition,
};
use crate::domain::{DependencyGraph, RelationshipMap, Registry};
use async_trait::async_trait;
use std::sync::Arc;

/// Native client that reads the registry directly, without HTTP overhead
#[derive(Clone)]
pub struct NativeClient {
    registry: Arc<Registry>,
}

impl NativeClient {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl RegistryApi for NativeClient {
    async fn get_fields(&self, class_name: &str) -> Result<Vec<FieldDefinition>, RegistryError> {
        self.registry.get_fields(class_name)
    }

    async fn get_config(&self, class_name: &str) -> Result<ClassConfig, RegistryError> {
        self.registry.get_config(class_name)
    }

    async fn get_schema(&self, class_name: &str) -> Result<SchemaDefinition, RegistryError> {
        self.registry.get_schema(class_name)
    }

    async fn get_ddl(&self, class_name: &str) -> Result<String, RegistryError> {
        self.registry.get_ddl(class_name)
    }

    async fn get_table_name(&self, class_name: &str) -> Result<String, RegistryError> {
        self.registry.get_table_name(class_name)
    }

    async fn get_relationships(&self, class_name: &str) -> Result<Vec<Relationship>, RegistryError> {
        self.registry.get_relationships(class_name)
    }

    async fn get_inverse_relationships(
        &self,
        class_name: &str,
    ) -> Result<Vec<Relationship>, RegistryError> {
        self.registry.get_inverse_relationships(class_name)
    }

    async fn get_object_metadata(&self, class_name: &str) -> Result<ObjectMetadata, RegistryError> {
        self.registry.get_object_metadata(class_name)
    }

    async fn list_classes(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.registry.class_names())
    }

    async fn get_dependency_graph(&self) -> Result<DependencyGraph, RegistryError> {
        Ok(self.registry.get_dependency_graph())
    }

    async fn get_initialization_order(&self) -> Result<Vec<String>, RegistryError> {
        self.registry.get_initialization_order()
    }

    async fn get_relationship_map(&self) -> Result<RelationshipMap, RegistryError> {
        Ok(self.registry.get_relationship_map())
    }

    async fn get_all_object_metadata(&self) -> Result<Vec<ObjectMetadata>, RegistryError> {
        Ok(self.registry.get_all_object_metadata())
    }
}
