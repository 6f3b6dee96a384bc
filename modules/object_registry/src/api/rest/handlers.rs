//! HTTP request handlers - thin layer over the registry
//!
//! Only classes declared with `api = true` are visible here; everything else
//! answers 404 as if it were not registered.

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::ObjectMetadata;
use crate::domain::Registry;
use axum::{extract::Path, Json};
use std::sync::Arc;

/// Metadata of an API-exposed class
fn exposed(registry: &Registry, name: &str) -> Result<ObjectMetadata, Problem> {
    let metadata = registry.get_object_metadata(name).map_err(map_domain_error)?;
    if !metadata.config.api {
        return Err(Problem::object_not_found(name));
    }
    Ok(metadata)
}

/// List API-exposed classes in registration order
pub async fn list_objects(registry: Arc<Registry>) -> Result<Json<ObjectListResponse>, Problem> {
    let items: Vec<ObjectSummaryDto> = registry
        .get_all_object_metadata()
        .iter()
        .filter(|metadata| metadata.config.api)
        .map(ObjectSummaryDto::from)
        .collect();
    let total = items.len();

    Ok(Json(ObjectListResponse { items, total }))
}

pub async fn get_object(
    registry: Arc<Registry>,
    Path(name): Path<String>,
) -> Result<Json<ObjectMetadataDto>, Problem> {
    let metadata = exposed(&registry, &name)?;
    Ok(Json(metadata.into()))
}

pub async fn get_schema(
    registry: Arc<Registry>,
    Path(name): Path<String>,
) -> Result<Json<SchemaDto>, Problem> {
    let metadata = exposed(&registry, &name)?;
    let schema = registry.get_schema(&metadata.name).map_err(map_domain_error)?;
    Ok(Json(schema.into()))
}

pub async fn get_relationships(
    registry: Arc<Registry>,
    Path(name): Path<String>,
) -> Result<Json<RelationshipsResponse>, Problem> {
    let metadata = exposed(&registry, &name)?;
    Ok(Json(RelationshipsResponse {
        relationships: metadata.relationships.iter().map(RelationshipDto::from).collect(),
        inverse_relationships: metadata
            .inverse_relationships
            .iter()
            .map(RelationshipDto::from)
            .collect(),
        class_name: metadata.name,
    }))
}

/// Initialization order across every registered class
pub async fn get_initialization_order(
    registry: Arc<Registry>,
) -> Result<Json<InitializationOrderResponse>, Problem> {
    let order = registry.get_initialization_order().map_err(map_domain_error)?;
    Ok(Json(InitializationOrderResponse { order }))
}
