//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a key-value pair
/// - `GET /get/:key` - Retrieve a value by key
/// - `DELETE /del/:key` - Delete a key
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{LocalCache, MirrorPolicy, RemoteCache};
    use crate::config::Backend;
    use crate::error::StoreError;
    use crate::store::RemoteStore;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn local_app() -> Router {
        create_router(AppState::local(LocalCache::new(), Duration::from_secs(300)))
    }

    struct DownStore;

    #[async_trait]
    impl RemoteStore for DownStore {
        async fn put(&self, _: &str, _: Vec<u8>, _: Duration) -> Result<(), StoreError> {
            Err(StoreError::OperationFailed("down".to_string()))
        }

        async fn delete(&self, _: &str) -> Result<u64, StoreError> {
            Err(StoreError::OperationFailed("down".to_string()))
        }
    }

    fn request(method: &str, uri: &str, body: Option<&'static str>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_routes_and_methods() {
        let cases = [
            ("PUT", "/set", Some(r#"{"key":"a","value":"1"}"#), StatusCode::OK),
            ("GET", "/get/a", None, StatusCode::NOT_FOUND),
            ("DELETE", "/del/a", None, StatusCode::OK),
            ("GET", "/stats", None, StatusCode::OK),
            ("GET", "/health", None, StatusCode::OK),
            ("POST", "/set", Some(r#"{"key":"a","value":"1"}"#), StatusCode::METHOD_NOT_ALLOWED),
            ("GET", "/del/a", None, StatusCode::METHOD_NOT_ALLOWED),
            ("GET", "/unknown", None, StatusCode::NOT_FOUND),
        ];

        for (method, uri, body, expected) in cases {
            let response = local_app().oneshot(request(method, uri, body)).await.unwrap();
            assert_eq!(response.status(), expected, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let response = local_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_strict_mirror_failure_maps_to_bad_gateway() {
        let cache =
            RemoteCache::<String, _>::new(DownStore).with_mirror_policy(MirrorPolicy::Strict);
        let app = create_router(AppState::new(
            Arc::new(cache),
            Backend::Redis,
            Duration::from_secs(300),
        ));

        let response = app
            .oneshot(request("PUT", "/set", Some(r#"{"key":"a","value":"1"}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
