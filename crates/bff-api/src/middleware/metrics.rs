//! HTTP 요청 metrics middleware.
//!
//! 모든 HTTP 요청에 대해 메트릭을 수집합니다.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::{record_http_duration, record_http_request, record_http_response};

/// 라우트에 매칭되지 않은 요청의 path 라벨.
pub const UNMATCHED_PATH: &str = "unmatched";

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// 각 요청에 대해 다음 메트릭을 기록합니다:
/// - `http_requests_total`: 총 요청 수 (method, path 라벨)
/// - `http_responses_total`: 총 응답 수 (method, path, status 라벨)
/// - `http_request_duration_seconds`: 요청 처리 시간 히스토그램
///
/// path 라벨은 라우트 템플릿을 사용하므로 임의 경로 요청으로 카디널리티가 늘지 않습니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());

    record_http_request(&method, &path);

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_response(&method, &path, status);
    record_http_duration(&method, &path, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    async fn test_handler() -> &'static str {
        "OK"
    }

    /// 스레드 로컬 레코더를 건 상태로 요청 하나를 보내고 상태 코드와 렌더링 결과를 돌려줍니다.
    async fn send_recorded(uri: &str) -> (StatusCode, String) {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let app = Router::new()
            .route("/api/analyze", get(test_handler))
            .layer(middleware::from_fn(metrics_layer));

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        (response.status(), handle.render())
    }

    #[tokio::test]
    async fn test_metrics_middleware() {
        let (status, rendered) = send_recorded("/api/analyze").await;

        assert_eq!(status, StatusCode::OK);
        assert!(rendered.contains("http_requests_total{"));
        assert!(rendered.contains(r#"path="/api/analyze""#));
        assert!(rendered.contains(r#"status="200""#));
    }

    /// 매칭되지 않은 경로는 원래 URI 대신 고정 라벨로 기록됩니다.
    #[tokio::test]
    async fn test_metrics_middleware_unmatched() {
        let (status, rendered) = send_recorded("/wp-admin/setup.php").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(rendered.contains(&format!(r#"path="{UNMATCHED_PATH}""#)));
        assert!(rendered.contains(r#"status="404""#));
        assert!(!rendered.contains("wp-admin"));
    }
}
