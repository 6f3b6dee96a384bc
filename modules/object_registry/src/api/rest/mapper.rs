//! Contract model to DTO conversions

use super::dto::*;
use crate::contract::{ColumnDefinition, FieldDefinition, ObjectMetadata, Relationship, SchemaDefinition};

impl From<&FieldDefinition> for FieldDto {
    fn from(field: &FieldDefinition) -> Self {
        let options = &field.options;
        Self {
            name: field.name.clone(),
            r#type: field.field_type.as_str().to_string(),
            required: options.required,
            primary_key: options.primary_key,
            unique: options.unique,
            related: options.related.clone(),
            on_delete: options.on_delete.map(|action| action.as_sql().to_string()),
            min: options.min,
            max: options.max,
            min_length: options.min_length,
            max_length: options.max_length,
            pattern: options.pattern.clone(),
            validator: options.validator.clone(),
        }
    }
}

impl From<&Relationship> for RelationshipDto {
    fn from(relationship: &Relationship) -> Self {
        Self {
            source_class: relationship.source_class.clone(),
            field_name: relationship.field_name.clone(),
            target_class: relationship.target_class.clone(),
            r#type: relationship.relationship_type.as_str().to_string(),
        }
    }
}

impl From<&ObjectMetadata> for ObjectSummaryDto {
    fn from(metadata: &ObjectMetadata) -> Self {
        Self {
            name: metadata.name.clone(),
            table_name: metadata.table_name.clone(),
            field_count: metadata.fields.len(),
            cli: metadata.config.cli,
            expose: metadata.config.expose,
        }
    }
}

impl From<ObjectMetadata> for ObjectMetadataDto {
    fn from(metadata: ObjectMetadata) -> Self {
        Self {
            fields: metadata.fields.iter().map(FieldDto::from).collect(),
            relationships: metadata.relationships.iter().map(RelationshipDto::from).collect(),
            inverse_relationships: metadata
                .inverse_relationships
                .iter()
                .map(RelationshipDto::from)
                .collect(),
            cli: metadata.config.cli,
            expose: metadata.config.expose,
            tools: metadata.manifest.tools,
            has_collection_binding: metadata.has_collection_binding,
            name: metadata.name,
            table_name: metadata.table_name,
        }
    }
}

impl From<&ColumnDefinition> for ColumnDto {
    fn from(column: &ColumnDefinition) -> Self {
        Self {
            name: column.name.clone(),
            sql_type: column.sql_type.to_string(),
            primary_key: column.primary_key,
            nullable: column.nullable,
            references: column.references.clone(),
        }
    }
}

impl From<SchemaDefinition> for SchemaDto {
    fn from(schema: SchemaDefinition) -> Self {
        Self {
            columns: schema.columns.iter().map(ColumnDto::from).collect(),
            table_name: schema.table_name,
            ddl: schema.ddl,
            indexes: schema.indexes,
        }
    }
}
