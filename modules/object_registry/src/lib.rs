//! Object Registry Module
//!
//! Central registry of object classes. From declarative field definitions it
//! derives table schemas and DDL, compiled validators, relationship and
//! dependency graphs and introspection metadata, and hands out cached
//! collection instances per class.

// Public exports
pub mod contract;
pub use contract::{
    client::RegistryApi, error::RegistryError, ClassConfig, ClassDeclaration, FieldDefinition,
    FieldType, ObjectMetadata, OnDelete, Relationship, RelationshipType, SchemaDefinition,
    ValidationReport,
};

pub mod domain;
pub use domain::{
    CollectionOptions, ObjectType, PersistenceConfig, PersistenceKind, Registry, ValidationMode,
    ValidationStrategy,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::ObjectRegistryModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod infra;
