use std::error::Error as StdError;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// A required entity argument was absent.
    #[error("{0}")]
    NullEntityReference(String),
    /// No record exists for the requested key.
    #[error("{0}")]
    EntityNotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("storage error: {0}")]
    Storage(String),
    /// The request could not be turned into handler arguments.
    #[error("{0}")]
    Rejected(String),
    /// No route accepts the request's path or method.
    #[error("{0}")]
    Unroutable(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn null_entity(message: impl Into<String>) -> Self {
        Self::NullEntityReference(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::EntityNotFound(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NullEntityReference(_) => ErrorKind::NullEntityReference,
            Self::EntityNotFound(_) => ErrorKind::EntityNotFound,
            Self::Database(_)
            | Self::Migration(_)
            | Self::Storage(_)
            | Self::Rejected(_)
            | Self::Unroutable(_)
            | Self::Internal(_) => ErrorKind::Unclassified,
        }
    }
}

/// The three classes of failure the error responder distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NullEntityReference,
    EntityNotFound,
    Unclassified,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::NullEntityReference => StatusCode::BAD_REQUEST,
            Self::EntityNotFound => StatusCode::NOT_FOUND,
            Self::Unclassified => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A classified error travelling from a handler to the error responder as a
/// response extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledError {
    pub kind: ErrorKind,
    pub message: String,
    /// Messages of the underlying causes, outermost first.
    pub trace: Vec<String>,
}

impl HandledError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            trace: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

impl From<&AppError> for HandledError {
    fn from(err: &AppError) -> Self {
        let mut trace = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            trace.push(cause.to_string());
            source = cause.source();
        }

        Self {
            kind: err.kind(),
            message: err.to_string(),
            trace,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let handled = HandledError::from(&self);
        let mut response = handled.status().into_response();
        response.extensions_mut().insert(handled);
        response
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}
