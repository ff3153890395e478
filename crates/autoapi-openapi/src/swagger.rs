/*!
Swagger UI integration for interactive API documentation.

The viewer is a static page that pulls `swagger-ui-dist` from a CDN and
points it at the JSON document; [`openapi_routes`] mounts both next to each
other on an axum router.
*/

use crate::{
    cache::CachedDocument,
    config::OpenApiConfig,
    error::OpenApiResult,
    specification::{OpenApiSpec, CONTENT_TYPE_JSON},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// `swagger-ui-dist` release loaded by the viewer page
pub const SWAGGER_UI_VERSION: &str = "4.15.5";

/// Anything that can hand out the current document
pub trait DocumentProvider: Send + Sync {
    fn document(&self) -> OpenApiResult<Arc<OpenApiSpec>>;
}

impl DocumentProvider for Arc<OpenApiSpec> {
    fn document(&self) -> OpenApiResult<Arc<OpenApiSpec>> {
        Ok(Arc::clone(self))
    }
}

impl<F> DocumentProvider for CachedDocument<F>
where
    F: Fn() -> OpenApiResult<OpenApiSpec> + Send + Sync,
{
    fn document(&self) -> OpenApiResult<Arc<OpenApiSpec>> {
        CachedDocument::document(self)
    }
}

/// Render the viewer page for the document served at `schema_url`
pub fn swagger_ui_html(schema_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Swagger UI</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui.css" />
    <style>
        html {{ box-sizing: border-box; overflow-y: scroll; }}
        *, *:before, *:after {{ box-sizing: inherit; }}
        body {{ margin: 0; background: #fafafa; }}
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {{
            SwaggerUIBundle({{
                url: "{schema_url}",
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                layout: "StandaloneLayout"
            }});
        }};
    </script>
</body>
</html>"#,
        version = SWAGGER_UI_VERSION,
        schema_url = schema_url,
    )
}

/// Application state shared by the documentation handlers
#[derive(Clone)]
struct DocsState {
    provider: Arc<dyn DocumentProvider>,
    page: Arc<str>,
}

/// Router serving the JSON document and the viewer page.
///
/// Both answer GET only, under a permissive CORS layer.
pub fn openapi_routes(config: &OpenApiConfig, provider: Arc<dyn DocumentProvider>) -> Router {
    let schema_route = config.schema_route();
    let state = DocsState {
        provider,
        page: Arc::from(swagger_ui_html(&schema_route)),
    };

    Router::new()
        .route(&schema_route, get(serve_document))
        .route(&config.ui_route(), get(serve_viewer))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the OpenAPI document as JSON.
///
/// Providers may read files and rebuild the document, so they run on the
/// blocking pool rather than on a runtime worker.
async fn serve_document(State(state): State<DocsState>) -> Response {
    let provider = Arc::clone(&state.provider);
    let body = tokio::task::spawn_blocking(move || {
        provider.document().and_then(|spec| spec.to_json(false))
    })
    .await;

    match body {
        Ok(Ok(json)) => ([(header::CONTENT_TYPE, CONTENT_TYPE_JSON)], json).into_response(),
        Ok(Err(e)) => error_response(e.to_string()),
        Err(e) => error_response(format!("document task failed: {}", e)),
    }
}

fn error_response(message: String) -> Response {
    tracing::warn!("Failed to produce OpenAPI document: {}", message);
    let error = serde_json::json!({
        "status": "error",
        "message": message,
        "code": 500,
    });
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)],
        error.to_string(),
    )
        .into_response()
}

/// Serve the Swagger UI page
async fn serve_viewer(State(state): State<DocsState>) -> Html<String> {
    Html(state.page.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::OpenApiError, generator::assemble};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use parking_lot::Mutex;
    use std::sync::mpsc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn static_provider() -> Arc<dyn DocumentProvider> {
        Arc::new(Arc::new(assemble(&[], "Docs API", "1.0.0", "", Vec::new())))
    }

    async fn get_request(router: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_viewer_page_references_document_and_assets() {
        let html = swagger_ui_html("/docs/openapi.json");

        assert!(html.contains(r#"url: "/docs/openapi.json""#));
        assert!(html.contains("swagger-ui-dist@4.15.5/swagger-ui-bundle.js"));
        assert!(html.contains("swagger-ui-dist@4.15.5/swagger-ui.css"));
        assert!(html.contains("StandaloneLayout"));
    }

    #[tokio::test]
    async fn test_serves_document_json() {
        let router = openapi_routes(&OpenApiConfig::default(), static_provider());
        let (status, content_type, body) = get_request(router, "/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["info"]["title"], "Docs API");
        assert_eq!(value["openapi"], "3.0.0");
    }

    #[tokio::test]
    async fn test_serves_viewer_page() {
        let router = openapi_routes(&OpenApiConfig::default(), static_provider());
        let (status, content_type, body) = get_request(router, "/swagger/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains(r#"url: "/openapi.json""#));
    }

    #[tokio::test]
    async fn test_viewer_rejects_non_get() {
        let router = openapi_routes(&OpenApiConfig::default(), static_provider());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/swagger/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    /// Hands out its document only after the test releases the gate
    struct GatedProvider {
        gate: Mutex<mpsc::Receiver<()>>,
        spec: Arc<OpenApiSpec>,
    }

    impl DocumentProvider for GatedProvider {
        fn document(&self) -> OpenApiResult<Arc<OpenApiSpec>> {
            self.gate
                .lock()
                .recv_timeout(Duration::from_secs(2))
                .map_err(|_| OpenApiError::route_source_error("gate never opened"))?;
            Ok(Arc::clone(&self.spec))
        }
    }

    #[tokio::test]
    async fn test_slow_provider_does_not_block_the_runtime() {
        let (open, gate) = mpsc::channel();
        let provider = GatedProvider {
            gate: Mutex::new(gate),
            spec: Arc::new(assemble(&[], "Gated API", "1.0.0", "", Vec::new())),
        };
        let router = openapi_routes(&OpenApiConfig::default(), Arc::new(provider));

        // single-threaded runtime: if the provider ran on it, this task could
        // not open the gate until the provider had already timed out
        let request = tokio::spawn(get_request(router, "/openapi.json"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = open.send(());

        let (status, _, body) = request.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Gated API"));
    }

    #[tokio::test]
    async fn test_provider_failure_answers_500() {
        let provider = CachedDocument::new(Duration::from_secs(60), || {
            Err(OpenApiError::route_source_error("registry unavailable"))
        });
        let router = openapi_routes(&OpenApiConfig::default(), Arc::new(provider));
        let (status, _, body) = get_request(router, "/openapi.json").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "error");
    }
}
