//! # Budgetboard Shared Library
//!
//! Domain core of the Budgetboard backend: boards holding categorized
//! finance, budget and activity records, with board-scoped authorization.
//!
//! ## Module Organization
//!
//! - `models`: entities, create/update DTOs and search filters
//! - `db`: connection pool, migrations and the entity store
//! - `auth`: passwords, tokens, the authenticated-user context and board checks
//! - `validation`: per-field checks
//! - `services`: validated CRUD services
//! - `error`: field error map and service errors

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod validation;

/// Current version of the Budgetboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
