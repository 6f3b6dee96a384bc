//! Registry - class records and every derivation built on them

use super::cache::{CacheKey, CollectionCache};
use super::collection::{Collection, CollectionOptions, CollectionType, DefaultCollectionType};
use super::graph::{self, ClassFields, DependencyGraph, RelationshipMap};
use super::naming::derive_table_name;
use super::repository::{Database, MetadataRepository};
use super::schema::{self, TableRef};
use super::validation::{self, StrategyRegistry, ValidationMode, Validator};
use crate::contract::{
    ClassConfig, ClassDeclaration, ClassSummary, ConstructorHandle, FieldDefinition, Manifest,
    ObjectMetadata, RegistryError, Relationship, SchemaDefinition, ValidationReport,
};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde_json::Value;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

/// Version written to the system table with every class summary
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Explicit declaration capability for Rust types backing a class
pub trait ObjectType: 'static {
    fn declaration() -> ClassDeclaration;
}

/// Registry entry for one class. Immutable once stored, apart from two
/// set-once cells: the collection binding and the resolved schema.
pub struct ClassRecord {
    pub name: String,
    pub constructor: Option<ConstructorHandle>,
    pub config: ClassConfig,
    /// Declaration order
    pub fields: IndexMap<String, FieldDefinition>,
    pub validators: Vec<Validator>,
    pub tools: Value,
    table_name: String,
    /// Set once every foreign-key target is registered
    schema: OnceCell<SchemaDefinition>,
    collection_binding: OnceCell<Arc<dyn CollectionType>>,
}

impl fmt::Debug for ClassRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRecord")
            .field("name", &self.name)
            .field("constructor", &self.constructor)
            .field("config", &self.config)
            .field("fields", &self.fields)
            .field("table_name", &self.table_name)
            .field("schema", &self.schema.get())
            .field("validators", &self.validators)
            .field("tools", &self.tools)
            .field(
                "collection_binding",
                &self.collection_binding.get().map(|binding| binding.name().to_string()),
            )
            .finish()
    }
}

impl ClassRecord {
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn collection_binding(&self) -> Option<&Arc<dyn CollectionType>> {
        self.collection_binding.get()
    }

    pub fn field_list(&self) -> Vec<FieldDefinition> {
        self.fields.values().cloned().collect()
    }

    pub fn manifest(&self) -> Manifest {
        Manifest {
            name: self.name.clone(),
            table_name: self.table_name.clone(),
            tools: self.tools.clone(),
        }
    }

    /// Run the compiled validators against one instance
    pub async fn validate(&self, instance: &Value, mode: ValidationMode) -> ValidationReport {
        validation::run(&self.name, &self.validators, instance, mode).await
    }
}

/// Process-wide store of class records, owned by whoever bootstraps the application
pub struct Registry {
    classes: RwLock<IndexMap<String, Arc<ClassRecord>>>,
    strategies: StrategyRegistry,
    collections: CollectionCache,
    default_collection: Arc<dyn CollectionType>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_strategies(StrategyRegistry::new())
    }

    pub fn with_strategies(strategies: StrategyRegistry) -> Self {
        Self {
            classes: RwLock::new(IndexMap::new()),
            strategies,
            collections: CollectionCache::new(),
            default_collection: Arc::new(DefaultCollectionType),
        }
    }

    /// Validation strategies available to field options
    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    // ===== Registration =====

    /// Register a class. Registering a name twice is a no-op that returns
    /// the existing record.
    pub fn register(&self, declaration: ClassDeclaration) -> Result<Arc<ClassRecord>, RegistryError> {
        if let Some(existing) = self.classes.read().get(&declaration.name) {
            tracing::debug!(class = %declaration.name, "Class already registered, skipping");
            return Ok(existing.clone());
        }

        let record = Arc::new(self.build_record(declaration)?);

        let mut classes = self.classes.write();
        if let Some(existing) = classes.get(&record.name) {
            return Ok(existing.clone());
        }
        classes.insert(record.name.clone(), record.clone());
        drop(classes);

        tracing::info!(
            class = %record.name,
            table = %record.table_name,
            fields = record.fields.len(),
            validators = record.validators.len(),
            "Registered class"
        );
        Ok(record)
    }

    /// Register a Rust type through its declaration
    pub fn register_type<T: ObjectType>(&self) -> Result<Arc<ClassRecord>, RegistryError> {
        let mut declaration = T::declaration();
        declaration.constructor.get_or_insert(ConstructorHandle::of::<T>());
        self.register(declaration)
    }

    fn build_record(&self, declaration: ClassDeclaration) -> Result<ClassRecord, RegistryError> {
        let ClassDeclaration {
            name,
            constructor,
            fields: field_list,
            config,
            tools,
        } = declaration;

        let mut fields = IndexMap::with_capacity(field_list.len());
        for field in field_list {
            if fields.contains_key(&field.name) {
                return Err(RegistryError::Schema {
                    class: name.clone(),
                    reason: format!("duplicate field '{}'", field.name),
                });
            }
            fields.insert(field.name.clone(), field);
        }

        let table_name = config
            .table_name
            .clone()
            .unwrap_or_else(|| derive_table_name(&name));

        let (schema, complete) = self.compile_schema(&name, &table_name, &fields)?;
        let validators = validation::compile(&name, &fields, &self.strategies)?;

        let resolved = OnceCell::new();
        if complete {
            let _ = resolved.set(schema);
        }

        Ok(ClassRecord {
            name,
            constructor,
            config,
            fields,
            validators,
            tools,
            table_name,
            schema: resolved,
            collection_binding: OnceCell::new(),
        })
    }

    /// Compile a schema against the classes registered right now.
    ///
    /// Foreign keys to registered classes reference their table and key
    /// column; unknown targets fall back to the derived name and `id`. The
    /// flag reports whether every target resolved exactly, i.e. whether the
    /// result can no longer change.
    fn compile_schema(
        &self,
        name: &str,
        table_name: &str,
        fields: &IndexMap<String, FieldDefinition>,
    ) -> Result<(SchemaDefinition, bool), RegistryError> {
        let own_table = TableRef::to_table(table_name, fields);
        let complete = Cell::new(true);
        let resolve = |related: &str| -> TableRef {
            if related == name {
                return own_table.clone();
            }
            match self.lookup(related) {
                Some(target) => {
                    if target.name != related {
                        complete.set(false);
                    }
                    TableRef::to_table(&target.table_name, &target.fields)
                }
                None => {
                    complete.set(false);
                    TableRef::derived(related)
                }
            }
        };

        let schema = schema::compile(name, table_name, fields, &resolve)?;
        Ok((schema, complete.get()))
    }

    /// Schema of a registered class, resolved against the live registry
    fn schema_of(&self, record: &ClassRecord) -> Result<SchemaDefinition, RegistryError> {
        if let Some(schema) = record.schema.get() {
            return Ok(schema.clone());
        }
        let (schema, complete) = self.compile_schema(&record.name, &record.table_name, &record.fields)?;
        if complete {
            let _ = record.schema.set(schema.clone());
        }
        Ok(schema)
    }

    /// Attach an explicit collection type to a registered class.
    ///
    /// No-op when the class is unknown or already bound.
    pub fn register_collection_binding(&self, class_name: &str, collection_type: Arc<dyn CollectionType>) {
        let Some(record) = self.lookup(class_name) else {
            tracing::debug!(class = %class_name, "Ignoring collection binding for unregistered class");
            return;
        };
        let name = collection_type.name().to_string();
        if record.collection_binding.set(collection_type).is_err() {
            tracing::warn!(class = %record.name, binding = %name, "Collection binding already set, ignoring");
        }
    }

    // ===== Lookup =====

    /// Find a class by exact name, then case-insensitively
    pub fn lookup(&self, name: &str) -> Option<Arc<ClassRecord>> {
        let classes = self.classes.read();
        classes
            .get(name)
            .or_else(|| {
                classes
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, record)| record)
            })
            .cloned()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Registered class names in registration order
    pub fn class_names(&self) -> Vec<String> {
        self.classes.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    fn require(&self, name: &str) -> Result<Arc<ClassRecord>, RegistryError> {
        self.lookup(name).ok_or_else(|| RegistryError::not_registered(name))
    }

    fn snapshot(&self) -> Vec<Arc<ClassRecord>> {
        self.classes.read().values().cloned().collect()
    }

    fn with_classes<R>(&self, f: impl FnOnce(&[ClassFields<'_>]) -> R) -> R {
        let records = self.snapshot();
        let classes: Vec<ClassFields<'_>> = records
            .iter()
            .map(|record| (record.name.as_str(), &record.fields))
            .collect();
        f(&classes)
    }

    // ===== Per-class Queries =====

    pub fn get_fields(&self, name: &str) -> Result<Vec<FieldDefinition>, RegistryError> {
        Ok(self.require(name)?.field_list())
    }

    pub fn get_config(&self, name: &str) -> Result<ClassConfig, RegistryError> {
        Ok(self.require(name)?.config.clone())
    }

    pub fn get_schema(&self, name: &str) -> Result<SchemaDefinition, RegistryError> {
        self.schema_of(&*self.require(name)?)
    }

    pub fn get_ddl(&self, name: &str) -> Result<String, RegistryError> {
        Ok(self.get_schema(name)?.ddl)
    }

    pub fn get_table_name(&self, name: &str) -> Result<String, RegistryError> {
        Ok(self.require(name)?.table_name.clone())
    }

    pub fn get_validators(&self, name: &str) -> Result<Vec<Validator>, RegistryError> {
        Ok(self.require(name)?.validators.clone())
    }

    pub fn get_relationships(&self, name: &str) -> Result<Vec<Relationship>, RegistryError> {
        let record = self.require(name)?;
        Ok(self
            .get_relationship_map()
            .shift_remove(&record.name)
            .unwrap_or_default())
    }

    pub fn get_inverse_relationships(&self, name: &str) -> Result<Vec<Relationship>, RegistryError> {
        let record = self.require(name)?;
        Ok(self
            .get_inverse_relationship_map()
            .shift_remove(&record.name)
            .unwrap_or_default())
    }

    pub fn get_object_metadata(&self, name: &str) -> Result<ObjectMetadata, RegistryError> {
        let record = self.require(name)?;
        let mut relationships = self.get_relationship_map();
        let mut inverse = graph::inverse_relationship_map(&relationships);
        Ok(Self::metadata_for(
            &record,
            relationships.shift_remove(&record.name).unwrap_or_default(),
            inverse.shift_remove(&record.name).unwrap_or_default(),
        ))
    }

    fn metadata_for(
        record: &ClassRecord,
        relationships: Vec<Relationship>,
        inverse_relationships: Vec<Relationship>,
    ) -> ObjectMetadata {
        ObjectMetadata {
            name: record.name.clone(),
            table_name: record.table_name.clone(),
            fields: record.field_list(),
            config: record.config.clone(),
            relationships,
            inverse_relationships,
            manifest: record.manifest(),
            has_collection_binding: record.collection_binding().is_some(),
        }
    }

    // ===== Registry-wide Queries =====

    pub fn get_dependency_graph(&self) -> DependencyGraph {
        self.with_classes(graph::build_graph)
    }

    /// Class names ordered so every dependency precedes its dependents
    pub fn get_initialization_order(&self) -> Result<Vec<String>, RegistryError> {
        graph::topological_order(&self.get_dependency_graph())
    }

    pub fn get_relationship_map(&self) -> RelationshipMap {
        self.with_classes(graph::relationship_map)
    }

    pub fn get_inverse_relationship_map(&self) -> RelationshipMap {
        graph::inverse_relationship_map(&self.get_relationship_map())
    }

    pub fn get_all_object_metadata(&self) -> Vec<ObjectMetadata> {
        let mut relationships = self.get_relationship_map();
        let mut inverse = graph::inverse_relationship_map(&relationships);
        self.snapshot()
            .iter()
            .map(|record| {
                Self::metadata_for(
                    record,
                    relationships.shift_remove(&record.name).unwrap_or_default(),
                    inverse.shift_remove(&record.name).unwrap_or_default(),
                )
            })
            .collect()
    }

    // ===== Validation =====

    /// Validate an instance of a class
    pub async fn validate(
        &self,
        name: &str,
        instance: &Value,
        mode: ValidationMode,
    ) -> Result<ValidationReport, RegistryError> {
        let record = self.require(name)?;
        Ok(record.validate(instance, mode).await)
    }

    // ===== Collections =====

    /// Shared collection for a class and persistence shape, built on first request
    pub async fn get_collection(
        &self,
        name: &str,
        options: CollectionOptions,
    ) -> Result<Arc<dyn Collection>, RegistryError> {
        let record = self.require(name)?;
        let schema = self.schema_of(&record)?;
        let class_name = record.name.clone();
        let key = CacheKey::new(&class_name, &options);
        let collection_type = record
            .collection_binding()
            .cloned()
            .unwrap_or_else(|| self.default_collection.clone());

        self.collections
            .get_or_create(key, || async move {
                tracing::debug!(class = %record.name, collection_type = %collection_type.name(), "Creating collection");
                collection_type.create(record, schema, options).await
            })
            .await
            .map_err(|e| RegistryError::Collection {
                class: class_name,
                reason: format!("{e:#}"),
            })
    }

    /// Drop every cached collection
    pub fn clear_collections(&self) {
        self.collections.clear();
    }

    pub fn cached_collections(&self) -> usize {
        self.collections.len()
    }

    // ===== Persistence =====

    /// Materialize the schema of one class
    pub async fn sync_schema(&self, database: &dyn Database, name: &str) -> Result<(), RegistryError> {
        let record = self.require(name)?;
        let schema = self.schema_of(&record)?;
        database
            .sync_schema(&schema)
            .await
            .map_err(RegistryError::storage)?;
        tracing::info!(class = %record.name, table = %record.table_name, "Synced schema");
        Ok(())
    }

    /// Materialize every schema in initialization order, returning that order
    pub async fn sync_all(&self, database: &dyn Database) -> Result<Vec<String>, RegistryError> {
        let order = self.get_initialization_order()?;
        for name in &order {
            self.sync_schema(database, name).await?;
        }
        Ok(order)
    }

    /// Write one summary row per class to the system table
    pub async fn persist(&self, repository: &dyn MetadataRepository) -> Result<usize, RegistryError> {
        let mut relationships = self.get_relationship_map();
        let records = self.snapshot();
        let now = chrono::Utc::now();

        for record in &records {
            let summary = ClassSummary {
                class_name: record.name.clone(),
                schema_version: SCHEMA_VERSION.to_string(),
                fields: record.field_list(),
                relationships: relationships.shift_remove(&record.name).unwrap_or_default(),
                config: record.config.clone(),
                manifest: record.manifest(),
                last_updated: now,
            };
            repository.upsert(&summary).await.map_err(RegistryError::storage)?;
        }

        tracing::info!(classes = records.len(), "Persisted registry metadata");
        Ok(records.len())
    }

    /// Read class summaries back from the system table.
    ///
    /// Summaries are for introspection; nothing is re-registered.
    pub async fn load(&self, repository: &dyn MetadataRepository) -> Result<Vec<ClassSummary>, RegistryError> {
        repository.list_all().await.map_err(RegistryError::storage)
    }
}
