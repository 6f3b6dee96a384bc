//! SeaORM entity for the registry system table

use sea_orm::entity::prelude::*;

/// One row per registered class, replaced wholesale on every persist
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "_object_registry")]
pub struct Model {
    /// Class name (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub class_name: String,

    pub schema_version: String,

    /// Serialized field map, in declaration order
    pub fields: Json,

    /// Serialized outgoing relationship edges
    pub relationships: Json,

    pub config: Json,

    /// Name, table name and passthrough tools
    pub manifest: Json,

    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
