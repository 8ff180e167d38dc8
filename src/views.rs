//! Error pages.
//!
//! Views are resolved by name and filled with an [`ErrorModel`]. The built-in
//! [`ErrorPages`] renderer ships one page per mapped status plus the generic
//! `error` page; anything unknown falls back to the generic page.

use serde::Serialize;

pub const BAD_REQUEST_VIEW: &str = "400-error";
pub const NOT_FOUND_VIEW: &str = "404-error";
pub const INTERNAL_ERROR_VIEW: &str = "500-error";
pub const GENERIC_ERROR_VIEW: &str = "error";

/// Data handed to an error view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorModel {
    /// `"<status> / <reason phrase>"`, e.g. `"404 / Not Found"`.
    pub code: String,
    pub message: String,
}

pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, model: &ErrorModel) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorPages;

impl ErrorPages {
    fn template(view: &str) -> (&'static str, &'static str) {
        match view {
            BAD_REQUEST_VIEW => ("Bad request", "The request could not be processed."),
            NOT_FOUND_VIEW => ("Not found", "Nothing here matches what you asked for."),
            INTERNAL_ERROR_VIEW => ("Server error", "Something went wrong on our side."),
            _ => ("Error", "An error occurred."),
        }
    }
}

impl ViewRenderer for ErrorPages {
    fn render(&self, view: &str, model: &ErrorModel) -> String {
        let (title, lead) = Self::template(view);
        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
             <body class=\"{view}\">\n\
             <h1>{code}</h1>\n\
             <p>{lead}</p>\n\
             <p class=\"message\">{message}</p>\n\
             </body>\n\
             </html>\n",
            title = title,
            view = escape_html(view),
            code = escape_html(&model.code),
            lead = lead,
            message = escape_html(&model.message),
        )
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
