//! End-to-end registry behavior across registration, derivation and collections

mod common;

use async_trait::async_trait;
use object_registry::contract::{
    ClassConfig, ClassDeclaration, FieldDefinition, FieldType, RelationshipType, SchemaDefinition,
};
use object_registry::domain::{
    ClassRecord, Collection, CollectionType, PersistenceConfig, PersistenceKind, TableCollection,
};
use object_registry::{
    CollectionOptions, ObjectType, Registry, RegistryError, ValidationMode, ValidationStrategy,
};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_order_customer_scenario() {
    let registry = Registry::new();
    // Order before Customer: the edge resolves once both exist
    registry
        .register(
            ClassDeclaration::new("Order")
                .field(FieldDefinition::foreign_key("customerId", "Customer"))
                .field(FieldDefinition::new("total", FieldType::Decimal).min(0.0)),
        )
        .unwrap();
    registry.register(ClassDeclaration::new("Customer").field(FieldDefinition::new("name", FieldType::Text))).unwrap();

    assert_eq!(registry.get_initialization_order().unwrap(), vec!["Customer", "Order"]);

    let relationships = registry.get_relationships("Order").unwrap();
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0].field_name, "customerId");
    assert_eq!(relationships[0].target_class, "Customer");
    assert_eq!(relationships[0].relationship_type, RelationshipType::ForeignKey);

    let inverse = registry.get_inverse_relationships("Customer").unwrap();
    assert_eq!(inverse, relationships);
}

#[test]
fn test_commerce_initialization_order() {
    let registry = common::commerce_registry();
    let order = registry.get_initialization_order().unwrap();
    let position = |name: &str| order.iter().position(|n| n == name).unwrap();

    assert_eq!(order.len(), 4);
    assert!(position("Customer") < position("Order"));
    assert!(position("Order") < position("OrderItem"));
    assert!(position("Product") < position("OrderItem"));
}

#[test]
fn test_foreign_key_ddl_uses_target_table_and_key() {
    let registry = common::commerce_registry();
    let ddl = registry.get_ddl("OrderItem").unwrap();

    assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS order_items ("));
    assert!(ddl.contains("order_id INTEGER NOT NULL REFERENCES orders(id)"));
    assert!(ddl.contains("product_sku TEXT REFERENCES products(sku) ON DELETE RESTRICT"));
    assert!(ddl.contains("CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items (order_id);"));

    let schema = registry.get_schema("OrderItem").unwrap();
    assert_eq!(schema.indexes.len(), 2);
    assert_eq!(schema.columns[0].name, "id");
}

fn keyed_customer() -> ClassDeclaration {
    ClassDeclaration::new("Customer")
        .field(FieldDefinition::new("code", FieldType::Text).primary_key())
        .field(FieldDefinition::new("name", FieldType::Text))
        .config(ClassConfig {
            table_name: Some("clients".to_string()),
            ..ClassConfig::default()
        })
}

fn customer_order() -> ClassDeclaration {
    ClassDeclaration::new("Order").field(FieldDefinition::foreign_key("customerId", "Customer"))
}

#[test]
fn test_foreign_key_ddl_is_independent_of_registration_order() {
    let target_first = Registry::new();
    target_first.register(keyed_customer()).unwrap();
    target_first.register(customer_order()).unwrap();

    let dependent_first = Registry::new();
    dependent_first.register(customer_order()).unwrap();
    dependent_first.register(keyed_customer()).unwrap();

    let ddl = target_first.get_ddl("Order").unwrap();
    assert_eq!(ddl, dependent_first.get_ddl("Order").unwrap());
    assert!(ddl.contains("customer_id TEXT REFERENCES clients(code)"));
    assert_eq!(
        target_first.get_schema("Order").unwrap(),
        dependent_first.get_schema("Order").unwrap()
    );
}

#[test]
fn test_foreign_key_resolves_once_target_registers() {
    let registry = Registry::new();
    registry.register(customer_order()).unwrap();
    assert!(registry
        .get_ddl("Order")
        .unwrap()
        .contains("customer_id INTEGER REFERENCES customers(id)"));

    registry.register(keyed_customer()).unwrap();
    let schema = registry.get_schema("Order").unwrap();
    let column = schema.columns.iter().find(|c| c.name == "customer_id").unwrap();
    assert_eq!(column.sql_type, "TEXT");
    assert_eq!(column.references.as_deref(), Some("clients(code)"));
}

#[test]
fn test_duplicate_registration_returns_existing_record() {
    let registry = Registry::new();
    let first = registry.register(common::customer()).unwrap();
    let second = registry
        .register(ClassDeclaration::new("Customer").field(FieldDefinition::new("other", FieldType::Integer)))
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get_fields("Customer").unwrap().len(), 2);
}

#[test]
fn test_lookup_is_case_insensitive_and_preserves_case() {
    let registry = common::commerce_registry();

    assert!(registry.is_registered("orderitem"));
    assert_eq!(registry.get_table_name("ORDER").unwrap(), "orders");
    assert_eq!(registry.get_object_metadata("customer").unwrap().name, "Customer");
}

#[test]
fn test_unknown_class_is_not_registered_error() {
    let registry = common::commerce_registry();

    let err = registry.get_schema("Invoice").unwrap_err();
    assert_eq!(
        err,
        RegistryError::NotRegistered {
            class: "Invoice".to_string()
        }
    );
    assert!(err.to_string().contains("register()"));
}

#[test]
fn test_empty_class_fails_registration() {
    let registry = Registry::new();
    let err = registry.register(ClassDeclaration::new("Empty")).unwrap_err();

    assert!(matches!(err, RegistryError::Schema { ref class, .. } if class == "Empty"));
    assert!(!registry.is_registered("Empty"));
}

#[test]
fn test_cycle_surfaces_from_initialization_order() {
    let registry = Registry::new();
    registry
        .register(ClassDeclaration::new("A").field(FieldDefinition::foreign_key("b", "B")))
        .unwrap();
    registry
        .register(ClassDeclaration::new("B").field(FieldDefinition::foreign_key("a", "A")))
        .unwrap();

    let err = registry.get_initialization_order().unwrap_err();
    assert!(matches!(err, RegistryError::CircularDependency { .. }));
    // The relationship map is unaffected by the cycle
    assert_eq!(registry.get_relationship_map().len(), 2);
}

#[test]
fn test_unregistered_target_is_omitted() {
    let registry = Registry::new();
    registry
        .register(ClassDeclaration::new("Note").field(FieldDefinition::foreign_key("authorId", "Author")))
        .unwrap();

    assert!(registry.get_relationships("Note").unwrap().is_empty());
    assert_eq!(registry.get_initialization_order().unwrap(), vec!["Note"]);
    assert!(registry.get_ddl("Note").unwrap().contains("REFERENCES authors(id)"));
}

#[test]
fn test_metadata_covers_every_class() {
    let registry = common::commerce_registry();
    let all = registry.get_all_object_metadata();

    let names: Vec<&str> = all.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Customer", "Order", "Product", "OrderItem"]);

    let order = &all[1];
    assert_eq!(order.manifest.table_name, "orders");
    assert_eq!(order.relationships.len(), 2);
    assert_eq!(order.inverse_relationships.len(), 1);
    assert_eq!(order.inverse_relationships[0].source_class, "OrderItem");
}

// ===== Validation =====

struct Lowercase;

#[async_trait]
impl ValidationStrategy for Lowercase {
    fn name(&self) -> &str {
        "lowercase"
    }

    async fn check(&self, value: &Value) -> anyhow::Result<bool> {
        Ok(value.as_str().is_some_and(|s| s == s.to_lowercase()))
    }
}

#[tokio::test]
async fn test_validate_instance_collects_violations() {
    let registry = common::commerce_registry();

    let report = registry
        .validate(
            "Customer",
            &json!({"name": "", "email": "not-an-email"}),
            ValidationMode::CollectAll,
        )
        .await
        .unwrap();
    assert_eq!(report.errors.len(), 2);
    assert_eq!(report.errors[0].message, "name is required");
    assert_eq!(report.errors[1].field, "email");

    let ok = registry
        .validate(
            "Customer",
            &json!({"name": "Ada", "email": "ada@example.com"}),
            ValidationMode::CollectAll,
        )
        .await
        .unwrap();
    assert!(ok.is_valid());
}

#[tokio::test]
async fn test_report_can_be_inspected_then_raised() {
    let registry = Registry::new();
    registry
        .register(
            ClassDeclaration::new("Account")
                .field(FieldDefinition::new("handle", FieldType::Text).min_length(3).pattern("^[a-z]+$"))
                .field(FieldDefinition::new("age", FieldType::Integer).min(0.0)),
        )
        .unwrap();

    let report = registry
        .validate("Account", &json!({"handle": "A1", "age": -1}), ValidationMode::CollectAll)
        .await
        .unwrap();
    assert_eq!(report.errors.len(), 3);
    assert_eq!(report.for_field("handle").count(), 2);
    assert_eq!(report.for_field("age").count(), 1);
    assert_eq!(report.for_field("email").count(), 0);
    assert_eq!(report.first().unwrap().field, "handle");

    let raised = report.clone().into_result().unwrap_err();
    assert_eq!(raised, RegistryError::Validation(report));

    let valid = registry
        .validate("Account", &json!({"handle": "ada", "age": 36}), ValidationMode::CollectAll)
        .await
        .unwrap();
    assert_eq!(valid.into_result(), Ok(()));
}

#[tokio::test]
async fn test_custom_strategy_by_name() {
    let registry = Registry::new();
    registry.strategies().register(Arc::new(Lowercase));
    registry
        .register(
            ClassDeclaration::new("Tag").field(
                FieldDefinition::new("slug", FieldType::Text)
                    .validator("lowercase")
                    .message("slug must be lowercase"),
            ),
        )
        .unwrap();

    let report = registry
        .validate("Tag", &json!({"slug": "Rust"}), ValidationMode::FailFast)
        .await
        .unwrap();
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].message, "slug must be lowercase");
}

#[test]
fn test_unknown_strategy_fails_registration() {
    let registry = Registry::new();
    let err = registry
        .register(ClassDeclaration::new("Tag").field(FieldDefinition::new("slug", FieldType::Text).validator("nope")))
        .unwrap_err();

    assert!(matches!(err, RegistryError::UnknownValidator { .. }));
}

// ===== Typed declarations =====

struct Invoice;

impl ObjectType for Invoice {
    fn declaration() -> ClassDeclaration {
        ClassDeclaration::new("Invoice").field(FieldDefinition::new("number", FieldType::Text).unique())
    }
}

#[test]
fn test_register_type_records_constructor() {
    let registry = Registry::new();
    let record = registry.register_type::<Invoice>().unwrap();

    let handle = record.constructor.unwrap();
    assert_eq!(handle.type_id, std::any::TypeId::of::<Invoice>());
    assert_eq!(record.table_name(), "invoices");
}

// ===== Collections =====

fn sqlite(location: &str) -> PersistenceConfig {
    PersistenceConfig {
        kind: PersistenceKind::Sqlite,
        location: Some(location.to_string()),
        ..PersistenceConfig::default()
    }
}

#[tokio::test]
async fn test_collection_identity_per_shape() {
    let registry = common::commerce_registry();

    let a = registry.get_collection("Order", CollectionOptions::new(sqlite("a.db"))).await.unwrap();
    let again = registry.get_collection("order", CollectionOptions::new(sqlite("a.db"))).await.unwrap();
    let b = registry.get_collection("Order", CollectionOptions::new(sqlite("b.db"))).await.unwrap();
    let with_ai = registry
        .get_collection("Order", CollectionOptions::new(sqlite("a.db")).with_ai(Arc::new("model")))
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&a, &again));
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &with_ai));
    assert_eq!(registry.cached_collections(), 3);

    let table = a.as_any().downcast_ref::<TableCollection>().unwrap();
    assert_eq!(table.schema().table_name, "orders");

    registry.clear_collections();
    assert_eq!(registry.cached_collections(), 0);
    let rebuilt = registry.get_collection("Order", CollectionOptions::new(sqlite("a.db"))).await.unwrap();
    assert!(!Arc::ptr_eq(&a, &rebuilt));
}

#[tokio::test]
async fn test_concurrent_collection_requests_share_instance() {
    let registry = common::commerce_registry();

    let requests = (0..16).map(|_| {
        let registry = registry.clone();
        async move { registry.get_collection("Product", CollectionOptions::default()).await }
    });
    let collections: Vec<Arc<dyn Collection>> = futures::future::join_all(requests)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    for collection in &collections {
        assert!(Arc::ptr_eq(collection, &collections[0]));
    }
    assert_eq!(registry.cached_collections(), 1);
}

#[tokio::test]
async fn test_collection_for_unknown_class_is_not_registered() {
    let registry = common::commerce_registry();

    let err = registry
        .get_collection("Ghost", CollectionOptions::default())
        .await
        .err()
        .unwrap();
    assert_eq!(
        err,
        RegistryError::NotRegistered {
            class: "Ghost".to_string()
        }
    );
    assert_eq!(registry.cached_collections(), 0);
}

struct Audited {
    class_name: String,
}

impl Collection for Audited {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn table_name(&self) -> &str {
        "audit"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct AuditedType {
    created: Arc<AtomicUsize>,
}

#[async_trait]
impl CollectionType for AuditedType {
    fn name(&self) -> &str {
        "audited"
    }

    async fn create(
        &self,
        class: Arc<ClassRecord>,
        _schema: SchemaDefinition,
        _options: CollectionOptions,
    ) -> anyhow::Result<Arc<dyn Collection>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Audited {
            class_name: class.name.clone(),
        }))
    }
}

#[tokio::test]
async fn test_collection_binding_is_used_and_set_once() {
    let registry = common::commerce_registry();
    let created = Arc::new(AtomicUsize::new(0));

    registry.register_collection_binding("Customer", Arc::new(AuditedType { created: created.clone() }));
    registry.register_collection_binding("Customer", Arc::new(AuditedType { created: Arc::new(AtomicUsize::new(0)) }));
    // Unknown classes are ignored
    registry.register_collection_binding("Ghost", Arc::new(AuditedType { created: created.clone() }));

    let collection = registry.get_collection("Customer", CollectionOptions::default()).await.unwrap();
    assert_eq!(collection.table_name(), "audit");
    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(registry.get_object_metadata("Customer").unwrap().has_collection_binding);
}

struct Failing;

#[async_trait]
impl CollectionType for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    async fn create(
        &self,
        _: Arc<ClassRecord>,
        _: SchemaDefinition,
        _: CollectionOptions,
    ) -> anyhow::Result<Arc<dyn Collection>> {
        anyhow::bail!("backend offline")
    }
}

#[tokio::test]
async fn test_collection_failure_is_reported_and_not_cached() {
    let registry = common::commerce_registry();
    registry.register_collection_binding("Product", Arc::new(Failing));

    let err = registry
        .get_collection("Product", CollectionOptions::default())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, RegistryError::Collection { ref reason, .. } if reason.contains("backend offline")));
    assert_eq!(registry.cached_collections(), 0);
}
