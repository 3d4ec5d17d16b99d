//! Health check endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    store: bool,
    cache: bool,
    cache_provider: &'static str,
    version: &'static str,
}

/// 503 only when the store is down; a failing cache just degrades
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.store().health_check().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "store health check failed");
        false
    });
    let cache = state.cache().health_check().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "cache health check failed");
        false
    });

    let (code, status) = match (store, cache) {
        (true, true) => (StatusCode::OK, "ok"),
        (true, false) => (StatusCode::OK, "degraded"),
        (false, _) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
    };

    (
        code,
        Json(HealthResponse {
            status,
            store,
            cache,
            cache_provider: state.cache().provider_name(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::state::AppState;

    #[tokio::test]
    async fn health_reports_backends() {
        let app = crate::routes::router(AppState::in_memory());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["store"], true);
        assert_eq!(json["cacheProvider"], "memory");
    }
}
