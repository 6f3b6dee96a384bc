//! Contract models for the object registry
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - storage and REST layers carry their own representations.

use chrono::{DateTime, Utc};
use std::any::TypeId;

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    Json,
    Binary,
    /// Single reference to another class, stored as a column
    ForeignKey,
    /// Virtual collection of dependents, no column
    OneToMany,
    /// Virtual association through a join, no column
    ManyToMany,
}

impl FieldType {
    /// Whether this field references another class
    pub fn is_relational(self) -> bool {
        matches!(self, Self::ForeignKey | Self::OneToMany | Self::ManyToMany)
    }

    /// Whether range constraints apply
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Json => "json",
            Self::Binary => "binary",
            Self::ForeignKey => "foreignKey",
            Self::OneToMany => "oneToMany",
            Self::ManyToMany => "manyToMany",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let field_type = match s {
            "text" => Self::Text,
            "integer" => Self::Integer,
            "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "datetime" => Self::DateTime,
            "json" => Self::Json,
            "binary" => Self::Binary,
            "foreignKey" => Self::ForeignKey,
            "oneToMany" => Self::OneToMany,
            "manyToMany" => Self::ManyToMany,
            _ => return None,
        };
        Some(field_type)
    }
}

/// Referential action for foreign key columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OnDelete {
    Cascade,
    SetNull,
    Restrict,
    #[default]
    NoAction,
}

impl OnDelete {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().replace('_', " ").as_str() {
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "RESTRICT" => Some(Self::Restrict),
            "NO ACTION" => Some(Self::NoAction),
            _ => None,
        }
    }
}

/// Declarative constraints and storage hints attached to a field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldOptions {
    /// Rejects null, missing and empty-string values
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Regular expression the whole value must match
    pub pattern: Option<String>,
    pub primary_key: bool,
    pub unique: bool,
    /// Emit a plain index for this column
    pub indexed: bool,
    /// Target class name for relational types
    pub related: Option<String>,
    pub on_delete: Option<OnDelete>,
    /// Name of a registered validation strategy
    pub validator: Option<String>,
    /// Message reported when the custom validator rejects a value
    pub message: Option<String>,
}

/// Declarative description of one data attribute
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
    pub options: FieldOptions,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            options: FieldOptions::default(),
        }
    }

    pub fn foreign_key(name: impl Into<String>, related: impl Into<String>) -> Self {
        Self::new(name, FieldType::ForeignKey).related(related)
    }

    pub fn one_to_many(name: impl Into<String>, related: impl Into<String>) -> Self {
        Self::new(name, FieldType::OneToMany).related(related)
    }

    pub fn many_to_many(name: impl Into<String>, related: impl Into<String>) -> Self {
        Self::new(name, FieldType::ManyToMany).related(related)
    }

    pub fn required(mut self) -> Self {
        self.options.required = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.options.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.options.max = Some(max);
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.options.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.options.max_length = Some(len);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.options.pattern = Some(pattern.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.options.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.options.unique = true;
        self
    }

    pub fn indexed(mut self) -> Self {
        self.options.indexed = true;
        self
    }

    pub fn related(mut self, class_name: impl Into<String>) -> Self {
        self.options.related = Some(class_name.into());
        self
    }

    pub fn on_delete(mut self, action: OnDelete) -> Self {
        self.options.on_delete = Some(action);
        self
    }

    pub fn validator(mut self, strategy: impl Into<String>) -> Self {
        self.options.validator = Some(strategy.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.options.message = Some(message.into());
        self
    }
}

/// Per-class declarative configuration
///
/// Opaque to the registry apart from `table_name`; `api` also gates the
/// REST introspection listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassConfig {
    /// Overrides the derived table name
    pub table_name: Option<String>,
    pub api: bool,
    pub cli: bool,
    pub expose: bool,
}

/// Non-owning handle to the Rust type backing a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstructorHandle {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl ConstructorHandle {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Everything the registry needs to register one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub name: String,
    pub constructor: Option<ConstructorHandle>,
    pub fields: Vec<FieldDefinition>,
    pub config: ClassConfig,
    /// Passthrough metadata, never interpreted
    pub tools: serde_json::Value,
}

impl ClassDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            fields: Vec::new(),
            config: ClassConfig::default(),
            tools: serde_json::Value::Null,
        }
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn config(mut self, config: ClassConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tools(mut self, tools: serde_json::Value) -> Self {
        self.tools = tools;
        self
    }

    pub fn constructor(mut self, handle: ConstructorHandle) -> Self {
        self.constructor = Some(handle);
        self
    }
}

/// One generated column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    /// Source field, `None` for the implicit `id` column
    pub field: Option<String>,
    pub sql_type: &'static str,
    pub primary_key: bool,
    pub nullable: bool,
    /// Referenced table for foreign key columns
    pub references: Option<String>,
}

/// Derived storage-layer description of a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDefinition {
    pub table_name: String,
    pub columns: Vec<ColumnDefinition>,
    /// The `CREATE TABLE` statement alone
    pub create_table: String,
    /// Full DDL text: table statement followed by index statements
    pub ddl: String,
    /// Index statements in generation order
    pub indexes: Vec<String>,
}

impl SchemaDefinition {
    /// Statements to execute, table first
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.create_table.as_str()).chain(self.indexes.iter().map(String::as_str))
    }
}

/// Kind of relationship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    ForeignKey,
    OneToMany,
    ManyToMany,
}

impl RelationshipType {
    pub fn from_field_type(field_type: FieldType) -> Option<Self> {
        match field_type {
            FieldType::ForeignKey => Some(Self::ForeignKey),
            FieldType::OneToMany => Some(Self::OneToMany),
            FieldType::ManyToMany => Some(Self::ManyToMany),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForeignKey => "foreignKey",
            Self::OneToMany => "oneToMany",
            Self::ManyToMany => "manyToMany",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        FieldType::parse(s).and_then(Self::from_field_type)
    }
}

/// Directed relationship edge derived from a relational field
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub source_class: String,
    pub field_name: String,
    pub target_class: String,
    pub relationship_type: RelationshipType,
    pub options: FieldOptions,
}

/// Name, table and passthrough tools of a class
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub name: String,
    pub table_name: String,
    pub tools: serde_json::Value,
}

/// Introspection view of one registered class
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMetadata {
    pub name: String,
    pub table_name: String,
    pub fields: Vec<FieldDefinition>,
    pub config: ClassConfig,
    pub relationships: Vec<Relationship>,
    pub inverse_relationships: Vec<Relationship>,
    pub manifest: Manifest,
    pub has_collection_binding: bool,
}

/// Class summary as stored in the registry system table
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
    pub class_name: String,
    pub schema_version: String,
    pub fields: Vec<FieldDefinition>,
    pub relationships: Vec<Relationship>,
    pub config: ClassConfig,
    pub manifest: Manifest,
    pub last_updated: DateTime<Utc>,
}
