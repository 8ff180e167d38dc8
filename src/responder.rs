//! Global error responder.
//!
//! Handlers return [`AppError`](crate::error::AppError); its response carries a
//! [`HandledError`] extension and no body. [`respond_to_errors`] runs around
//! every route, picks that extension up together with the request URL, logs it
//! and replaces the response with the rendered error view.

use std::{any::Any, fmt, sync::Arc};

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use http::{HeaderMap, StatusCode, header};
use serde::Serialize;
use tracing::error;

use crate::{
    error::{AppError, HandledError},
    views::{
        BAD_REQUEST_VIEW, ErrorModel, ErrorPages, GENERIC_ERROR_VIEW, INTERNAL_ERROR_VIEW,
        NOT_FOUND_VIEW, ViewRenderer,
    },
};

/// A view name plus the model to fill it with, and the status to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAndView {
    pub status: StatusCode,
    pub view: &'static str,
    pub model: ErrorModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    pub fn negotiate(headers: &HeaderMap) -> Self {
        let accept = headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if accept.contains("application/json") && !accept.contains("text/html") {
            Self::Json
        } else {
            Self::Html
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    view: &'a str,
    code: &'a str,
    message: &'a str,
}

#[derive(Clone)]
pub struct ErrorResponder {
    renderer: Arc<dyn ViewRenderer>,
}

impl fmt::Debug for ErrorResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorResponder").finish_non_exhaustive()
    }
}

impl Default for ErrorResponder {
    fn default() -> Self {
        Self::new(Arc::new(ErrorPages))
    }
}

impl ErrorResponder {
    pub fn new(renderer: Arc<dyn ViewRenderer>) -> Self {
        Self { renderer }
    }

    /// Logs the error and builds the view for it. Emits exactly one log record.
    pub fn handle(&self, url: &str, err: &HandledError) -> ModelAndView {
        error!(
            kind = ?err.kind,
            url = %url,
            trace = ?err.trace,
            "Exception raised = {} :: URL = {}",
            err.message,
            url
        );

        let status = err.status();
        ModelAndView {
            status,
            view: view_for_status(status),
            model: ErrorModel {
                code: status_line(status),
                message: err.message.clone(),
            },
        }
    }

    pub fn render(&self, mav: ModelAndView, format: ResponseFormat) -> Response {
        match format {
            ResponseFormat::Html => {
                let page = self.renderer.render(mav.view, &mav.model);
                (mav.status, Html(page)).into_response()
            }
            ResponseFormat::Json => {
                let body = ErrorBody {
                    view: mav.view,
                    code: &mav.model.code,
                    message: &mav.model.message,
                };
                (mav.status, Json(body)).into_response()
            }
        }
    }
}

pub fn view_for_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => BAD_REQUEST_VIEW,
        StatusCode::NOT_FOUND => NOT_FOUND_VIEW,
        StatusCode::INTERNAL_SERVER_ERROR => INTERNAL_ERROR_VIEW,
        _ => GENERIC_ERROR_VIEW,
    }
}

/// `"404 / Not Found"`
pub fn status_line(status: StatusCode) -> String {
    format!(
        "{} / {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

pub async fn respond_to_errors(
    State(responder): State<ErrorResponder>,
    request: Request,
    next: Next,
) -> Response {
    let url = request_url(&request);
    let format = ResponseFormat::negotiate(request.headers());

    let response = next.run(request).await;
    let Some(handled) = response.extensions().get::<HandledError>().cloned() else {
        return response;
    };

    let mav = responder.handle(&url, &handled);
    responder.render(mav, format)
}

/// Turns a caught handler panic into an unclassified error response.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "request handler panicked".to_string()
    };

    AppError::internal(detail).into_response()
}

fn request_url(request: &Request) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() {
        return format!(
            "{}://{}{}",
            uri.scheme_str().unwrap_or("http"),
            uri.authority().map(|a| a.as_str()).unwrap_or_default(),
            uri.path()
        );
    }

    match request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
    {
        Some(host) => format!("http://{host}{}", uri.path()),
        None => uri.path().to_string(),
    }
}
