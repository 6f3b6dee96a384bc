//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== Object DTOs =====

/// Entry in the object listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ObjectSummaryDto {
    /// Class name
    #[schema(example = "Order")]
    pub name: String,

    /// Backing table
    #[schema(example = "orders")]
    pub table_name: String,

    /// Number of declared fields
    pub field_count: usize,

    pub cli: bool,
    pub expose: bool,
}

/// Object listing response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ObjectListResponse {
    pub items: Vec<ObjectSummaryDto>,
    pub total: usize,
}

/// Declared field
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldDto {
    #[schema(example = "customerId")]
    pub name: String,

    /// Field type in wire form
    #[schema(example = "foreignKey")]
    pub r#type: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default)]
    pub unique: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
}

/// Relationship edge
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RelationshipDto {
    pub source_class: String,
    pub field_name: String,
    pub target_class: String,

    #[schema(example = "foreignKey")]
    pub r#type: String,
}

/// Full introspection view of a class
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ObjectMetadataDto {
    pub name: String,
    pub table_name: String,
    pub fields: Vec<FieldDto>,
    pub relationships: Vec<RelationshipDto>,
    pub inverse_relationships: Vec<RelationshipDto>,
    pub cli: bool,
    pub expose: bool,

    /// Tool descriptors carried by the manifest
    pub tools: serde_json::Value,

    pub has_collection_binding: bool,
}

// ===== Schema DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ColumnDto {
    pub name: String,

    #[schema(example = "INTEGER")]
    pub sql_type: String,

    pub primary_key: bool,
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

/// Compiled schema of a class
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchemaDto {
    pub table_name: String,
    pub columns: Vec<ColumnDto>,
    pub ddl: String,
    pub indexes: Vec<String>,
}

/// Outgoing and incoming relationships of a class
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RelationshipsResponse {
    pub class_name: String,
    pub relationships: Vec<RelationshipDto>,
    pub inverse_relationships: Vec<RelationshipDto>,
}

/// Class names ordered so dependencies precede dependents
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InitializationOrderResponse {
    pub order: Vec<String>,
}
