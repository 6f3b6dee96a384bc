//! Common test utilities and a shared commerce model
#![allow(dead_code)]

use object_registry::{
    ClassConfig, ClassDeclaration, FieldDefinition, FieldType, OnDelete, Registry,
};
use std::sync::Arc;

pub fn customer() -> ClassDeclaration {
    ClassDeclaration::new("Customer")
        .field(FieldDefinition::new("name", FieldType::Text).required().max_length(120))
        .field(
            FieldDefinition::new("email", FieldType::Text)
                .required()
                .unique()
                .pattern(r"^[^@\s]+@[^@\s]+$"),
        )
        .config(ClassConfig {
            api: true,
            ..ClassConfig::default()
        })
}

pub fn order() -> ClassDeclaration {
    ClassDeclaration::new("Order")
        .field(
            FieldDefinition::foreign_key("customerId", "Customer")
                .required()
                .on_delete(OnDelete::Cascade),
        )
        .field(FieldDefinition::new("total", FieldType::Decimal).min(0.0))
        .field(FieldDefinition::one_to_many("items", "OrderItem"))
        .config(ClassConfig {
            api: true,
            cli: true,
            ..ClassConfig::default()
        })
}

pub fn product() -> ClassDeclaration {
    ClassDeclaration::new("Product")
        .field(FieldDefinition::new("sku", FieldType::Text).primary_key())
        .field(FieldDefinition::new("price", FieldType::Decimal).required().min(0.0))
}

pub fn order_item() -> ClassDeclaration {
    ClassDeclaration::new("OrderItem")
        .field(FieldDefinition::foreign_key("orderId", "Order").required())
        .field(FieldDefinition::foreign_key("productSku", "Product").on_delete(OnDelete::Restrict))
        .field(FieldDefinition::new("quantity", FieldType::Integer).required().min(1.0))
}

/// Registry with Customer, Order, Product and OrderItem registered in that order
pub fn commerce_registry() -> Arc<Registry> {
    let registry = Arc::new(Registry::new());
    for declaration in [customer(), order(), product(), order_item()] {
        registry.register(declaration).unwrap();
    }
    registry
}
