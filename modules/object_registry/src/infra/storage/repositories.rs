//! SeaORM repository implementations

use crate::contract::{ClassSummary, SchemaDefinition};
use crate::domain::repository::{Database, MetadataRepository};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{sea_query::OnConflict, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder};
use std::sync::Arc;

use super::entity;

// ===== Schema Sync =====

/// Executes class DDL against a live connection
pub struct SeaOrmDatabase {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmDatabase {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Database for SeaOrmDatabase {
    async fn sync_schema(&self, schema: &SchemaDefinition) -> Result<()> {
        for statement in schema.statements() {
            tracing::debug!(table = %schema.table_name, %statement, "Executing DDL");
            self.db.execute_unprepared(statement).await?;
        }
        Ok(())
    }
}

// ===== Metadata Repository =====

pub struct SeaOrmMetadataRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmMetadataRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetadataRepository for SeaOrmMetadataRepository {
    async fn upsert(&self, summary: &ClassSummary) -> Result<()> {
        let active: entity::ActiveModel = summary.try_into()?;

        entity::Entity::insert(active)
            .on_conflict(
                OnConflict::column(entity::Column::ClassName)
                    .update_columns([
                        entity::Column::SchemaVersion,
                        entity::Column::Fields,
                        entity::Column::Relationships,
                        entity::Column::Config,
                        entity::Column::Manifest,
                        entity::Column::LastUpdated,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        Ok(())
    }

    async fn find(&self, class_name: &str) -> Result<Option<ClassSummary>> {
        let result = entity::Entity::find_by_id(class_name)
            .one(&*self.db)
            .await?;

        match result {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<ClassSummary>> {
        let results = entity::Entity::find()
            .order_by_asc(entity::Column::ClassName)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(|e| e.try_into())
            .collect::<Result<Vec<_>>>()
    }
}
