//! 분석 endpoint.
//!
//! - `POST /api/analyze`: 분석 파이프라인
//! - `GET /api/analyze`: 생존 확인
//! - `OPTIONS /api/analyze`: preflight가 아닌 단순 OPTIONS

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{field, info_span, Instrument};
use uuid::Uuid;

use bff_core::AnalyzeResponse;

use crate::error::ApiResult;
use crate::services::{run_analyze, AnalyzeInput, BFF_TOKEN_HEADER};
use crate::state::AppState;

/// 서비스 이름.
pub const SERVICE_NAME: &str = "fx-indicators-bff";

/// 생존 확인 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
}

/// 분석 요청 처리.
///
/// 본문은 원시 바이트로 받아 파이프라인이 직접 파싱합니다. 클라이언트 연결이 끊겨
/// 이 future가 drop되면 요청 토큰이 취소되어 upstream 호출도 중단됩니다.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<AnalyzeResponse>> {
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let input = AnalyzeInput {
        token: headers.get(BFF_TOKEN_HEADER).and_then(|v| v.to_str().ok()),
        body: &body,
    };

    let request_id = Uuid::new_v4();
    let span = info_span!("analyze", %request_id, instrument = field::Empty);

    let response = run_analyze(&state, input, &cancel).instrument(span).await?;
    Ok(Json(response))
}

/// 생존 확인.
pub async fn liveness(State(state): State<Arc<AppState>>) -> Json<LivenessResponse> {
    Json(LivenessResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
        version: state.version.clone(),
    })
}

/// 단순 OPTIONS 요청.
pub async fn options() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use bff_core::{AuthPolicy, BffConfig};
    use tower::ServiceExt;

    fn app(config: BffConfig) -> Router {
        let state = Arc::new(AppState::new(config).unwrap());
        Router::new()
            .route("/api/analyze", get(liveness).post(analyze).options(options))
            .with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_liveness() {
        let response = app(BffConfig::default())
            .oneshot(Request::builder().uri("/api/analyze").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["service"], SERVICE_NAME);
    }

    #[tokio::test]
    async fn test_options_no_content() {
        let response = app(BffConfig::default())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/analyze")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_missing_base_url_is_env_failure() {
        let config = BffConfig::default().with_auth(AuthPolicy::Disabled);
        let response = app(config)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/analyze")
                    .body(Body::from(r#"{"instrument":"USD_JPY","tf":["H1"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["ok"], false);
        assert_eq!(json["step"], "env");
        assert_eq!(json["error"], "INDICATORS_BASE_URL is not set");
    }
}
