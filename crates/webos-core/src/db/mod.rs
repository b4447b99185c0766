//! Database layer for the local cache

mod connection;
mod icon_repository;
mod migrations;
mod pending_repository;
mod settings_repository;

pub use connection::Database;
pub use icon_repository::{IconRepository, LibSqlIconRepository};
pub use pending_repository::{LibSqlPendingEditRepository, PendingEditRepository};
pub use settings_repository::{LibSqlSettingsRepository, SettingsRepository};
