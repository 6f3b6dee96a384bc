//! Database migrations for the registry system table

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250301_000001_create_object_registry::Migration)]
    }
}

mod m20250301_000001_create_object_registry {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ObjectRegistry::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ObjectRegistry::ClassName)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ObjectRegistry::SchemaVersion)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ObjectRegistry::Fields).json().not_null())
                        .col(ColumnDef::new(ObjectRegistry::Relationships).json().not_null())
                        .col(ColumnDef::new(ObjectRegistry::Config).json().not_null())
                        .col(ColumnDef::new(ObjectRegistry::Manifest).json().not_null())
                        .col(
                            ColumnDef::new(ObjectRegistry::LastUpdated)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ObjectRegistry::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ObjectRegistry {
        #[sea_orm(iden = "_object_registry")]
        Table,
        ClassName,
        SchemaVersion,
        Fields,
        Relationships,
        Config,
        Manifest,
        LastUpdated,
    }
}
