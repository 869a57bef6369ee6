//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use html_escape::encode_text;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No servable document for the request.
    #[error("{0}")]
    NotFound(#[from] mdsite_site::NotFound),

    /// Render error from mdsite-site.
    #[error("Render error: {0}")]
    Render(#[from] mdsite_site::RenderError),
}

impl ServerError {
    /// Build the error page, with diagnostics when `debug` is set.
    pub(crate) fn into_response_with_debug(self, debug: bool) -> Response {
        let (status, mut body) = match &self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "<h1>404 Not Found</h1>".to_owned()),
            Self::Render(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "<h1>500 Internal Server Error</h1>".to_owned(),
            ),
        };

        if debug {
            body.push_str("<pre>Debug Info:\n");
            match &self {
                Self::NotFound(e) => {
                    body.push_str("Requested Path: ");
                    body.push_str(&encode_text(&e.request_path));
                    body.push_str("\nFile Path: ");
                    body.push_str(&encode_text(&e.file_path.to_string_lossy()));
                    body.push('\n');
                }
                Self::Render(e) => {
                    body.push_str("Error: ");
                    body.push_str(&encode_text(&e.to_string()));
                    body.push('\n');
                }
            }
            body.push_str("</pre>");
        }

        (status, Html(body)).into_response()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        self.into_response_with_debug(false)
    }
}
