//! `GET /metrics`: Prometheus text exposition of everything recorded
//! through the `metrics` facade.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use metrics_exporter_prometheus::PrometheusHandle;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// Unauthenticated scrape endpoint; mounted only when a recorder is installed.
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.handle.render(),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;

    use crate::interfaces::http::testing::TestApp;

    #[tokio::test]
    async fn renders_recorded_series() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("users_registered_total").increment(3);
        });

        let app = TestApp::with_metrics(handle);
        let (status, body) = app.send_raw(Method::GET, "/metrics", None, None).await;

        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(
            text.contains("users_registered_total 3"),
            "unexpected exposition: {}",
            text
        );
    }
}
