//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models, errors and the native client trait.

pub mod client;
pub mod error;
pub mod model;

pub use client::RegistryApi;
pub use error::{Constraint, RegistryError, ValidationError, ValidationReport};
pub use model::{
    ClassConfig, ClassDeclaration, ClassSummary, ColumnDefinition, ConstructorHandle,
    FieldDefinition, FieldOptions, FieldType, Manifest, ObjectMetadata, OnDelete, Relationship,
    RelationshipType, SchemaDefinition,
};
