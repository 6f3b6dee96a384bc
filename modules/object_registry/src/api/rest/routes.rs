//! Route registration

use super::{dto::*, error::Problem, handlers};
use crate::domain::Registry;
use axum::{extract::Path, routing::get, Extension, Json, Router};
use std::sync::Arc;

/// Register the read-only introspection routes
pub fn register_routes(router: Router, registry: Arc<Registry>) -> Router {
    router
        .route("/objects", get(list_objects_handler))
        .route("/objects/{name}", get(get_object_handler))
        .route("/objects/{name}/schema", get(get_schema_handler))
        .route("/objects/{name}/relationships", get(get_relationships_handler))
        .route("/initialization-order", get(get_initialization_order_handler))
        .layer(Extension(registry))
}

// ===== Handler wrappers that extract the registry from Extension =====

async fn list_objects_handler(
    Extension(registry): Extension<Arc<Registry>>,
) -> Result<Json<ObjectListResponse>, Problem> {
    handlers::list_objects(registry).await
}

async fn get_object_handler(
    Extension(registry): Extension<Arc<Registry>>,
    path: Path<String>,
) -> Result<Json<ObjectMetadataDto>, Problem> {
    handlers::get_object(registry, path).await
}

async fn get_schema_handler(
    Extension(registry): Extension<Arc<Registry>>,
    path: Path<String>,
) -> Result<Json<SchemaDto>, Problem> {
    handlers::get_schema(registry, path).await
}

async fn get_relationships_handler(
    Extension(registry): Extension<Arc<Registry>>,
    path: Path<String>,
) -> Result<Json<RelationshipsResponse>, Problem> {
    handlers::get_relationships(registry, path).await
}

async fn get_initialization_order_handler(
    Extension(registry): Extension<Arc<Registry>>,
) -> Result<Json<InitializationOrderResponse>, Problem> {
    handlers::get_initialization_order(registry).await
}
