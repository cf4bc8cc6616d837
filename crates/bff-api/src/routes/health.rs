//! 헬스 체크 endpoint.
//!
//! upstream 지표 서비스의 생존 여부를 그대로 전달합니다.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::AppState;

/// 헬스 체크 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,

    /// upstream base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// upstream 응답 상태 코드
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /api/health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let Some(upstream) = state.upstream.as_deref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                ok: false,
                base: None,
                upstream_status: None,
                error: Some("INDICATORS_BASE_URL is not set".to_string()),
            }),
        );
    };

    let base = Some(upstream.base_url().to_string());

    match upstream.health().await {
        Ok(health) => (
            StatusCode::OK,
            Json(HealthResponse {
                ok: true,
                base,
                upstream_status: Some(health.status),
                error: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Upstream health check failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(HealthResponse {
                    ok: false,
                    base,
                    upstream_status: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
