pub mod common;
pub mod completions;
pub mod config;
pub mod desktop;
pub mod icons;
pub mod pending;
pub mod settings;
pub mod sync;
pub mod tenants;
