//! Extractors whose rejections render as [`AppError`].
//!
//! Axum's stock `Json`, `Query` and `Path` reject with plain-text bodies and
//! 422 for well-formed but mismatched JSON. The wrappers here route every
//! rejection through `AppError::BadRequest` so clients always get a 400 with
//! the usual `{"error": ...}` body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
