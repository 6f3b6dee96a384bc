//! Entity to model mappers
//!
//! Conversions between the system table entity and contract models

use super::entity;
use crate::contract::{
    ClassConfig, ClassSummary, FieldDefinition, FieldOptions, FieldType, Manifest, OnDelete,
    Relationship, RelationshipType,
};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

// ===== Class Summary Conversions =====

impl TryFrom<entity::Model> for ClassSummary {
    type Error = anyhow::Error;

    fn try_from(entity: entity::Model) -> Result<Self, Self::Error> {
        let fields: Vec<FieldJson> =
            serde_json::from_value(entity.fields).context("decoding fields")?;
        let relationships: Vec<RelationshipJson> =
            serde_json::from_value(entity.relationships).context("decoding relationships")?;
        let config: ClassConfigJson =
            serde_json::from_value(entity.config).context("decoding config")?;
        let manifest: ManifestJson =
            serde_json::from_value(entity.manifest).context("decoding manifest")?;

        Ok(Self {
            class_name: entity.class_name,
            schema_version: entity.schema_version,
            fields: fields
                .into_iter()
                .map(FieldDefinition::try_from)
                .collect::<anyhow::Result<_>>()?,
            relationships: relationships
                .into_iter()
                .map(Relationship::try_from)
                .collect::<anyhow::Result<_>>()?,
            config: config.into(),
            manifest: manifest.into(),
            last_updated: entity.last_updated,
        })
    }
}

impl TryFrom<&ClassSummary> for entity::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &ClassSummary) -> Result<Self, Self::Error> {
        use sea_orm::ActiveValue::Set;

        let fields: Vec<FieldJson> = model.fields.iter().map(FieldJson::from).collect();
        let relationships: Vec<RelationshipJson> =
            model.relationships.iter().map(RelationshipJson::from).collect();

        Ok(Self {
            class_name: Set(model.class_name.clone()),
            schema_version: Set(model.schema_version.clone()),
            fields: Set(serde_json::to_value(fields)?),
            relationships: Set(serde_json::to_value(relationships)?),
            config: Set(serde_json::to_value(ClassConfigJson::from(&model.config))?),
            manifest: Set(serde_json::to_value(ManifestJson::from(&model.manifest))?),
            last_updated: Set(model.last_updated),
        })
    }
}

// ===== JSON Serialization Helpers =====

/// JSON representation of a field for database storage
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldJson {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    options: FieldOptionsJson,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FieldOptionsJson {
    #[serde(default, skip_serializing_if = "is_false")]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    primary_key: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    unique: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    indexed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    related: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    on_delete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RelationshipJson {
    source_class: String,
    field_name: String,
    target_class: String,
    #[serde(rename = "type")]
    relationship_type: String,
    #[serde(default)]
    options: FieldOptionsJson,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ClassConfigJson {
    #[serde(default)]
    table_name: Option<String>,
    #[serde(default)]
    api: bool,
    #[serde(default)]
    cli: bool,
    #[serde(default)]
    expose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestJson {
    name: String,
    table_name: String,
    #[serde(default)]
    tools: serde_json::Value,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<&FieldOptions> for FieldOptionsJson {
    fn from(options: &FieldOptions) -> Self {
        Self {
            required: options.required,
            min: options.min,
            max: options.max,
            min_length: options.min_length,
            max_length: options.max_length,
            pattern: options.pattern.clone(),
            primary_key: options.primary_key,
            unique: options.unique,
            indexed: options.indexed,
            related: options.related.clone(),
            on_delete: options.on_delete.map(|action| action.as_sql().to_string()),
            validator: options.validator.clone(),
            message: options.message.clone(),
        }
    }
}

impl TryFrom<FieldOptionsJson> for FieldOptions {
    type Error = anyhow::Error;

    fn try_from(json: FieldOptionsJson) -> Result<Self, Self::Error> {
        let on_delete = json
            .on_delete
            .as_deref()
            .map(|s| OnDelete::parse(s).ok_or_else(|| anyhow!("unknown on_delete action '{s}'")))
            .transpose()?;

        Ok(Self {
            required: json.required,
            min: json.min,
            max: json.max,
            min_length: json.min_length,
            max_length: json.max_length,
            pattern: json.pattern,
            primary_key: json.primary_key,
            unique: json.unique,
            indexed: json.indexed,
            related: json.related,
            on_delete,
            validator: json.validator,
            message: json.message,
        })
    }
}

impl From<&FieldDefinition> for FieldJson {
    fn from(field: &FieldDefinition) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type.as_str().to_string(),
            options: (&field.options).into(),
        }
    }
}

impl TryFrom<FieldJson> for FieldDefinition {
    type Error = anyhow::Error;

    fn try_from(json: FieldJson) -> Result<Self, Self::Error> {
        let field_type = FieldType::parse(&json.field_type)
            .ok_or_else(|| anyhow!("unknown field type '{}'", json.field_type))?;
        Ok(Self {
            name: json.name,
            field_type,
            options: json.options.try_into()?,
        })
    }
}

impl From<&Relationship> for RelationshipJson {
    fn from(relationship: &Relationship) -> Self {
        Self {
            source_class: relationship.source_class.clone(),
            field_name: relationship.field_name.clone(),
            target_class: relationship.target_class.clone(),
            relationship_type: relationship.relationship_type.as_str().to_string(),
            options: (&relationship.options).into(),
        }
    }
}

impl TryFrom<RelationshipJson> for Relationship {
    type Error = anyhow::Error;

    fn try_from(json: RelationshipJson) -> Result<Self, Self::Error> {
        let relationship_type = RelationshipType::parse(&json.relationship_type)
            .ok_or_else(|| anyhow!("unknown relationship type '{}'", json.relationship_type))?;
        Ok(Self {
            source_class: json.source_class,
            field_name: json.field_name,
            target_class: json.target_class,
            relationship_type,
            options: json.options.try_into()?,
        })
    }
}

impl From<&ClassConfig> for ClassConfigJson {
    fn from(config: &ClassConfig) -> Self {
        Self {
            table_name: config.table_name.clone(),
            api: config.api,
            cli: config.cli,
            expose: config.expose,
        }
    }
}

impl From<ClassConfigJson> for ClassConfig {
    fn from(json: ClassConfigJson) -> Self {
        Self {
            table_name: json.table_name,
            api: json.api,
            cli: json.cli,
            expose: json.expose,
        }
    }
}

impl From<&Manifest> for ManifestJson {
    fn from(manifest: &Manifest) -> Self {
        Self {
            name: manifest.name.clone(),
            table_name: manifest.table_name.clone(),
            tools: manifest.tools.clone(),
        }
    }
}

impl From<ManifestJson> for Manifest {
    fn from(json: ManifestJson) -> Self {
        Self {
            name: json.name,
            table_name: json.table_name,
            tools: json.tools,
        }
    }
}
