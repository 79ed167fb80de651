//! Axum router configuration with middleware.
//!
//! JSON endpoints live under `/api/`. Every other path falls through to the
//! generated projects directory, so `/{project}/` serves that project's
//! `index.html` and `/{project}/{file}` its assets.
//!
//! Middleware: fully open CORS, request tracing.

use std::path::Path;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Projects
        .route("/generate", post(handlers::project::generate))
        .route("/add-feature", post(handlers::project::add_feature))
        .route("/projects", get(handlers::project::list_projects))
        .route("/projects/{name}", get(handlers::project::get_project))
        // Deploy
        .route("/deploy", post(handlers::deploy::deploy))
        // Health
        .route("/health", get(handlers::health::health));

    let site = site_service(&state.config.generated_root);
    tracing::info!(path = %state.config.generated_root.display(), "project site serving enabled");

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(site)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Static service over the generated projects.
///
/// `/{project}` redirects to `/{project}/`, directories serve their
/// `index.html`, and paths escaping `root` are answered with 404.
fn site_service(root: &Path) -> ServeDir {
    ServeDir::new(root).append_index_html_on_directories(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};

    use crate::state::test_support::{MockProvider, PAGE, state_in};

    fn write_project(root: &Path, name: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(dir.join("img")).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>hi</h1>").unwrap();
        std::fs::write(dir.join("style.css"), "h1{}").unwrap();
        std::fs::write(dir.join("img").join("index.html"), "<p>gallery</p>").unwrap();
        std::fs::write(root.join("secret.txt"), "x").unwrap();
    }

    async fn get(root: &Path, uri: &str) -> axum::http::Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = site_service(root).try_call(request).await.unwrap();
        response.map(Body::new)
    }

    async fn body_text(response: axum::http::Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_routes_do_not_conflict() {
        let dir = tempfile::tempdir().unwrap();
        // Route registration panics on overlapping definitions.
        let _router = build_router(state_in(dir.path(), MockProvider::replying(PAGE)));
    }

    #[tokio::test]
    async fn test_project_root_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "Shop");

        let response = get(dir.path(), "/Shop/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        assert_eq!(body_text(response).await, "<h1>hi</h1>");
    }

    #[tokio::test]
    async fn test_nested_directory_serves_its_index() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "Shop");

        let response = get(dir.path(), "/Shop/img/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<p>gallery</p>");
    }

    #[tokio::test]
    async fn test_asset_has_css_content_type() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "Shop");

        let response = get(dir.path(), "/Shop/style.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/css")
        );
    }

    #[tokio::test]
    async fn test_bare_project_redirects_to_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "Shop");

        let response = get(dir.path(), "/Shop").await;
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/Shop/");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "Shop");

        let response = get(dir.path(), "/Shop/nope.js").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("generated_projects");
        write_project(&root, "Shop");
        std::fs::write(dir.path().join("outside.txt"), "x").unwrap();

        let response = get(&root, "/Shop/../../outside.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = get(&root, "/Shop/%2E%2E/secret.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_encoded_host_path_does_not_redirect_offsite() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "Shop");

        for uri in ["/%2Fevil.example", "/%2F%2Fevil.example/"] {
            let response = get(dir.path(), uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            assert!(response.headers().get(header::LOCATION).is_none(), "{uri}");
        }
    }
}
