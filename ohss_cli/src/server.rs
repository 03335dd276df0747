use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use ohss_metrics::exporters::CONTENT_TYPE;
use ohss_metrics::{MetricsStore, PrometheusExporter};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    start_time: Instant,
    store: Arc<MetricsStore>,
    exporter: Arc<PrometheusExporter>,
}

impl AppState {
    pub fn new(store: Arc<MetricsStore>, exporter: Arc<PrometheusExporter>) -> Self {
        Self {
            start_time: Instant::now(),
            store,
            exporter,
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    timestamp: DateTime<Utc>,
    uptime_seconds: u64,
    last_successful_poll: Option<DateTime<Utc>>,
    poll_failures: u64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Serve until `shutdown` is cancelled, then drain in-flight requests.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.exporter.gather() {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!("Failed to gather metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        last_successful_poll: state.store.last_success(),
        poll_failures: state.store.poll_failures(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use ohss_core::Issue;
    use ohss_metrics::MetricsAggregator;
    use tower::ServiceExt;

    fn state() -> (Arc<MetricsStore>, AppState) {
        let store = Arc::new(MetricsStore::new().unwrap());
        let exporter = Arc::new(PrometheusExporter::new(store.clone()).unwrap());
        (store.clone(), AppState::new(store, exporter))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String, Option<String>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap(), content_type)
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let (store, state) = state();
        let now = Utc::now();
        store
            .publish(MetricsAggregator::aggregate(
                &[
                    Issue::new("high", "new", now),
                    Issue::new("high", "new", now),
                ],
                now,
            ))
            .unwrap();

        let (status, body, content_type) = get_body(router(state), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/plain"));
        assert!(body.contains(r#"ohss_issues{priority="high",status="new"} 2"#));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (store, state) = state();
        store.record_failure();

        let (status, body, _) = get_body(router(state), "/health").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["poll_failures"], 1);
        assert!(json["last_successful_poll"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (_store, state) = state();
        let (status, _, _) = get_body(router(state), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
