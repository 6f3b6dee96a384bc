//! Storage layer - system table entity, migrations and sea-orm adapters

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;

pub use repositories::{SeaOrmDatabase, SeaOrmMetadataRepository};
