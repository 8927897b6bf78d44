//! # Budgetboard API Server Library
//!
//! HTTP surface of Budgetboard: routes, authentication layer and the
//! mapping from service errors to JSON responses.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
