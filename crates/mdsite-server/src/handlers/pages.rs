//! Page endpoint.
//!
//! Resolves the request path to a markdown document, renders it, and wraps
//! the result in the page template.

use std::sync::Arc;

use axum::extract::State;
use axum::http::Uri;
use axum::response::{Html, IntoResponse, Response};

use crate::error::ServerError;
use crate::state::AppState;
use crate::template::render_page;

/// Handle GET for any path outside the media route.
///
/// The raw, still percent-encoded URI path is the resolver input; the query
/// string is ignored.
pub(crate) async fn get_page(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    match render_document(&state, uri.path()) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            match &err {
                ServerError::NotFound(e) => {
                    tracing::debug!(path = uri.path(), error = %e, "Page not found");
                }
                ServerError::Render(e) => {
                    tracing::error!(path = uri.path(), error = %e, "Failed to render page");
                }
            }
            err.into_response_with_debug(state.debug)
        }
    }
}

/// Resolve and render one document into a full HTML page.
fn render_document(state: &AppState, raw_path: &str) -> Result<String, ServerError> {
    let document = state.resolver.resolve(raw_path)?;
    let page = state.pipeline.render(&document)?;
    Ok(render_page(&page.title, &page.html))
}
