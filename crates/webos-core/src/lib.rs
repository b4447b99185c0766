//! webos-core - Core library for the WebOS desktop client
//!
//! This crate holds the scoped local icon cache, the push/pull sync engine,
//! the desktop view controller and the HTTP client they talk through. The
//! CLI (and any other front end) is a thin layer on top.

pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod desktop;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod sync;
pub mod util;

#[cfg(test)]
mod testing;

pub use api::{ApiError, DesktopApi, HttpApi, SyncApi, TenantApi};
pub use config::{ClientConfig, ConfigFile};
pub use desktop::{DesktopController, DesktopView, DropOutcome};
pub use error::{Error, Result};
pub use models::{CategoryId, FolderRef, Icon, IconId, Scope, SyncSettings};
pub use services::LocalStore;
pub use state::SyncPhase;
pub use sync::{SyncEngine, SyncReport};
