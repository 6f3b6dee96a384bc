//! Domain layer - naming, compilation, graph derivation, caching and the registry

pub mod cache;
pub mod collection;
pub mod graph;
pub mod naming;
pub mod registry;
pub mod repository;
pub mod schema;
pub mod validation;

pub use cache::{CacheKey, CollectionCache};
pub use collection::{
    Collection, CollectionOptions, CollectionType, DefaultCollectionType, PersistenceConfig,
    PersistenceKind, TableCollection,
};
pub use graph::{DependencyGraph, RelationshipMap};
pub use registry::{ClassRecord, ObjectType, Registry, SCHEMA_VERSION};
pub use repository::{Database, MetadataRepository};
pub use validation::{StrategyRegistry, ValidationMode, ValidationStrategy, Validator};
