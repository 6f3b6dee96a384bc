//! Module declaration and lifecycle

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::{RegistryApi, RegistryError, ValidationReport};
use crate::domain::Registry;
use crate::infra::storage::{migrations::Migrator, SeaOrmDatabase, SeaOrmMetadataRepository};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use sea_orm::{ConnectOptions, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::sync::Arc;

/// Owns the registry, its configuration and the optional database handle.
///
/// Lifecycle: register classes on [`registry`](Self::registry), then `init`
/// (connect + migrate), then `start` (sync schemas + persist metadata).
pub struct ObjectRegistryModule {
    config: RwLock<Config>,
    registry: Arc<Registry>,
    db: RwLock<Option<Arc<DatabaseConnection>>>,
}

impl Default for ObjectRegistryModule {
    fn default() -> Self {
        Self::new(Arc::new(Registry::new()))
    }
}

impl ObjectRegistryModule {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            config: RwLock::new(Config::default()),
            registry,
            db: RwLock::new(None),
        }
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Native client for in-process consumers
    pub fn client(&self) -> Arc<dyn RegistryApi> {
        Arc::new(NativeClient::new(self.registry.clone()))
    }

    pub fn connection(&self) -> Option<Arc<DatabaseConnection>> {
        self.db.read().clone()
    }

    /// Store configuration, connect to the configured database and run migrations
    pub async fn init(&self, cfg: Config) -> Result<()> {
        let url = cfg.database_url.clone();
        let max_connections = cfg.max_connections;
        *self.config.write() = cfg;

        let Some(url) = url else {
            tracing::info!("Object registry initialized without a database");
            return Ok(());
        };

        let mut options = ConnectOptions::new(url);
        options.max_connections(max_connections).sqlx_logging(false);
        let conn = sea_orm::Database::connect(options)
            .await
            .context("connecting to object registry database")?;

        self.attach(conn).await
    }

    /// Use an existing connection instead of the configured URL, running migrations on it
    pub async fn attach(&self, conn: DatabaseConnection) -> Result<()> {
        Migrator::up(&conn, None).await?;
        tracing::info!("Object registry migrations completed");

        *self.db.write() = Some(Arc::new(conn));
        Ok(())
    }

    /// Materialize schemas and persist metadata as configured
    pub async fn start(&self) -> Result<()> {
        let Some(conn) = self.connection() else {
            tracing::debug!("No database attached, skipping schema sync and metadata persistence");
            return Ok(());
        };
        let cfg = self.config();

        if cfg.sync_schema_on_start {
            let database = SeaOrmDatabase::new(conn.clone());
            let order = self.registry.sync_all(&database).await?;
            tracing::info!(tables = order.len(), "Synced class schemas");
        }

        if cfg.persist_metadata_on_start {
            let repository = SeaOrmMetadataRepository::new(conn);
            self.registry.persist(&repository).await?;
        }

        Ok(())
    }

    /// Validate an instance using the configured validation mode
    pub async fn validate(&self, class_name: &str, instance: &Value) -> Result<ValidationReport, RegistryError> {
        let mode = self.config.read().validation_mode;
        self.registry.validate(class_name, instance, mode).await
    }

    /// REST routes for the registry
    pub fn router(&self) -> axum::Router {
        tracing::info!("Registering object registry REST routes");
        crate::api::rest::routes::register_routes(axum::Router::new(), self.registry.clone())
    }
}
