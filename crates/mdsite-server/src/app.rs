//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .nest_service(&state.media_route, ServeDir::new(&state.media_root))
        .route("/", get(handlers::pages::get_page))
        .route("/{*path}", get(handlers::pages::get_page));

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use axum::body::{Body, to_bytes};
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::ServerConfig;

    struct TestServer {
        _dir: tempfile::TempDir,
        router: Router,
    }

    /// Content root with a home page, a plain page, a page with broken
    /// shorthand, and one media file. `secret.md` sits outside the root.
    fn test_server(debug: bool) -> TestServer {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("markdown");
        fs::create_dir_all(root.join("share")).unwrap();
        fs::create_dir_all(root.join("guide")).unwrap();

        fs::write(
            root.join("index.md"),
            "Hello [[About]] and ![[pic.jpg|200]]\n",
        )
        .unwrap();
        fs::write(root.join("About.md"), "# About\n\nSee [[https://example.com]].\n").unwrap();
        fs::write(root.join("guide/setup.md"), "## Setup\n").unwrap();
        fs::write(root.join("broken.md"), "oops [[unterminated\n").unwrap();
        fs::write(root.join("share/pic.jpg"), b"\xff\xd8jpeg").unwrap();
        fs::write(dir.path().join("secret.md"), "secret").unwrap();

        let config = ServerConfig {
            content_root: root,
            debug,
            ..ServerConfig::default()
        };
        let state = Arc::new(AppState::new(&config).unwrap());

        TestServer {
            _dir: dir,
            router: create_router(state),
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    async fn get_page(router: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let (status, headers, body) = send(router, request).await;
        (status, headers, String::from_utf8(body).unwrap())
    }

    #[tokio::test]
    async fn test_home_page_end_to_end() {
        let server = test_server(false);
        let (status, headers, body) = get_page(&server.router, "/index.php").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert!(body.contains("<title>Markdown Site</title>"));
        assert!(body.contains(r#"<a href="/index.php/About">About</a>"#));
        assert!(body.contains(r#"src="/markdown/share/pic.jpg""#));
        assert!(body.contains("width: 200px; height: auto;"));
    }

    #[tokio::test]
    async fn test_default_document_aliases() {
        let server = test_server(false);
        let (_, _, expected) = get_page(&server.router, "/index.php").await;

        for uri in ["/", "/index.php/", "/index.php/index", "/index.md"] {
            let (status, _, body) = get_page(&server.router, uri).await;
            assert_eq!(status, StatusCode::OK, "uri {uri}");
            assert_eq!(body, expected, "uri {uri}");
        }
    }

    #[tokio::test]
    async fn test_page_title_from_file_stem() {
        let server = test_server(false);
        let (status, _, body) = get_page(&server.router, "/index.php/About").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>About</title>"));
        assert!(body.contains("<h1>About</h1>"));
        assert!(body.contains(r#"<a href="https://example.com">https://example.com</a>"#));
    }

    #[tokio::test]
    async fn test_nested_page_and_query_ignored() {
        let server = test_server(false);
        let (status, _, body) = get_page(&server.router, "/index.php/guide/setup?x=1").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>setup</title>"));
        assert!(body.contains("<h2>Setup</h2>"));
    }

    #[tokio::test]
    async fn test_missing_page_is_plain_404() {
        let server = test_server(false);
        let (status, headers, body) = get_page(&server.router, "/index.php/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(body, "<h1>404 Not Found</h1>");
    }

    #[tokio::test]
    async fn test_missing_page_debug_info() {
        let server = test_server(true);
        let (status, _, body) = get_page(&server.router, "/index.php/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.starts_with("<h1>404 Not Found</h1><pre>Debug Info:\n"));
        assert!(body.contains("Requested Path: nope.md\n"));
        assert!(body.contains("File Path: "));
    }

    #[tokio::test]
    async fn test_traversal_is_404() {
        let server = test_server(false);
        for uri in [
            "/index.php/../secret",
            "/index.php/%2e%2e%2fsecret",
            "/index.php/..%2F..%2Fsecret",
        ] {
            let (status, _, body) = get_page(&server.router, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "uri {uri}");
            assert!(!body.contains("secret"), "uri {uri}");
        }
    }

    #[tokio::test]
    async fn test_broken_shorthand_is_500() {
        let server = test_server(false);
        let (status, _, body) = get_page(&server.router, "/index.php/broken").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "<h1>500 Internal Server Error</h1>");
    }

    #[tokio::test]
    async fn test_broken_shorthand_debug_detail() {
        let server = test_server(true);
        let (status, _, body) = get_page(&server.router, "/index.php/broken").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("line 1: unterminated [[ ... ]]"));
    }

    #[tokio::test]
    async fn test_media_file_served() {
        let server = test_server(false);
        let request = Request::get("/markdown/share/pic.jpg")
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(&server.router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "image/jpeg");
        assert_eq!(body, b"\xff\xd8jpeg");
    }

    #[tokio::test]
    async fn test_media_route_rejects_traversal() {
        let server = test_server(false);
        let request = Request::get("/markdown/share/../../secret.md")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(&server.router, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.starts_with(b"secret"));
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let server = test_server(false);
        let request = Request::post("/index.php/About")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&server.router, request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_security_headers_on_every_response() {
        let server = test_server(false);
        for uri in ["/index.php", "/index.php/nope", "/markdown/share/pic.jpg"] {
            let (_, headers, _) = get_page_raw(&server.router, uri).await;
            assert!(headers.contains_key("content-security-policy"), "uri {uri}");
            assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
            assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        }
    }

    async fn get_page_raw(router: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        send(router, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    #[test]
    fn test_custom_media_route() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            content_root: dir.path().to_path_buf(),
            media_public_root: String::new(),
            media_dir: "files".to_owned(),
            ..ServerConfig::default()
        };
        let state = AppState::new(&config).unwrap();

        assert_eq!(state.media_route, "/files");
        assert!(state.media_root.ends_with(Path::new("files")));
        let _router = create_router(Arc::new(state));
    }
}
