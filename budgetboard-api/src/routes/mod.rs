/// API route handlers, organized by resource
///
/// Handlers are thin: they parse the request into typed inputs and hand
/// them to the matching service.

pub mod auth;
pub mod boards;
pub mod categories;
pub mod extract;
pub mod groups;
pub mod health;
pub mod params;
pub mod records;
pub mod reference;
pub mod users;
