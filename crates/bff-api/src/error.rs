//! 파이프라인 에러의 HTTP 응답 변환.
//!
//! 모든 실패는 `{ ok: false, step, error }` envelope와 단계별 상태 코드로 나갑니다.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use bff_core::{AnalyzeResponse, PipelineError};

/// 핸들러 에러.
#[derive(Debug)]
pub struct ApiError(pub PipelineError);

/// 핸들러 결과 타입.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(AnalyzeResponse::from(&self.0))).into_response()
    }
}
