//! Extractors whose rejections flow through [`AppError`] so that malformed
//! requests reach the error responder like any other failure.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
