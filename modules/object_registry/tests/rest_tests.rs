//! REST introspection routes

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use object_registry::{ClassDeclaration, FieldDefinition, ObjectRegistryModule};
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    ObjectRegistryModule::new(common::commerce_registry()).router()
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_list_objects_only_shows_api_classes() {
    let (status, body) = get(app(), "/objects").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["name"], "Customer");
    assert_eq!(body["items"][1]["name"], "Order");
    assert_eq!(body["items"][1]["cli"], true);
    assert_eq!(body["items"][1]["field_count"], 3);
}

#[tokio::test]
async fn test_get_object_metadata() {
    let (status, body) = get(app(), "/objects/order").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Order");
    assert_eq!(body["table_name"], "orders");
    assert_eq!(body["fields"][0]["type"], "foreignKey");
    assert_eq!(body["fields"][0]["on_delete"], "CASCADE");
    assert_eq!(body["relationships"].as_array().unwrap().len(), 2);
    assert_eq!(body["inverse_relationships"][0]["source_class"], "OrderItem");
}

#[tokio::test]
async fn test_get_schema() {
    let (status, body) = get(app(), "/objects/Customer/schema").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["table_name"], "customers");
    assert_eq!(body["columns"][0]["name"], "id");
    assert_eq!(body["columns"][0]["primary_key"], true);
    assert_eq!(
        body["indexes"][0],
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_customers_email ON customers (email);"
    );
}

#[tokio::test]
async fn test_get_relationships() {
    let (status, body) = get(app(), "/objects/Customer/relationships").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["relationships"].as_array().unwrap().is_empty());
    assert_eq!(body["inverse_relationships"][0]["source_class"], "Order");
    assert_eq!(body["inverse_relationships"][0]["field_name"], "customerId");
}

#[tokio::test]
async fn test_hidden_and_unknown_classes_are_not_found() {
    let (status, body) = get(app(), "/objects/Product").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, _) = get(app(), "/objects/Ghost/schema").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_initialization_order() {
    let (status, body) = get(app(), "/initialization-order").await;

    assert_eq!(status, StatusCode::OK);
    let order: Vec<&str> = body["order"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(order.len(), 4);
    assert!(order.iter().position(|n| *n == "Customer") < order.iter().position(|n| *n == "Order"));
}

#[tokio::test]
async fn test_initialization_order_conflict_on_cycle() {
    let module = ObjectRegistryModule::default();
    let registry = module.registry();
    registry
        .register(ClassDeclaration::new("A").field(FieldDefinition::foreign_key("b", "B")))
        .unwrap();
    registry
        .register(ClassDeclaration::new("B").field(FieldDefinition::foreign_key("a", "A")))
        .unwrap();

    let (status, body) = get(module.router(), "/initialization-order").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["title"], "Circular Dependency");
}
