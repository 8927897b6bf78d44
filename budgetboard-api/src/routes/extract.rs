/// Extractors whose rejections render as [`ApiError`] JSON bodies
///
/// Axum's own `Json` and `Path` reject with plain-text bodies; these wrap
/// them so a malformed body or a non-numeric id answers
/// `400 {"message": ...}` like every other error.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
