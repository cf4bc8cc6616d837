//! upstream 호출 에러 타입.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use bff_core::{PipelineError, PipelineStage};

/// upstream 호출 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamCall {
    /// `POST /v1/ensure`
    Ensure,
    /// `GET /v1/series`
    Series,
    /// `GET /health` (또는 `/docs`)
    Health,
}

impl UpstreamCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamCall::Ensure => "ensure",
            UpstreamCall::Series => "series",
            UpstreamCall::Health => "health",
        }
    }

    /// 이 호출이 실패했을 때의 파이프라인 단계.
    pub fn stage(&self) -> PipelineStage {
        match self {
            UpstreamCall::Ensure => PipelineStage::Ensure,
            UpstreamCall::Series => PipelineStage::Series,
            UpstreamCall::Health => PipelineStage::Unknown,
        }
    }
}

impl fmt::Display for UpstreamCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// upstream 호출 에러.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// upstream이 비성공 상태 코드로 응답 (본문이 메시지)
    #[error("{body}")]
    Status {
        call: UpstreamCall,
        status: u16,
        body: String,
    },

    /// 연결/전송 실패
    #[error("{call} request failed: {source}")]
    Transport {
        call: UpstreamCall,
        #[source]
        source: reqwest::Error,
    },

    /// 성공 응답이지만 JSON으로 해석할 수 없음
    #[error("{call} response could not be decoded: {message}")]
    Decode { call: UpstreamCall, message: String },

    /// deadline 초과
    #[error("{call} timed out after {}ms", .after.as_millis())]
    Timeout { call: UpstreamCall, after: Duration },

    /// 호출자가 요청을 취소함
    #[error("{call} cancelled")]
    Cancelled { call: UpstreamCall },

    /// HTTP 클라이언트 생성 실패
    #[error("http client could not be built: {0}")]
    Client(#[from] reqwest::Error),
}

/// upstream 작업을 위한 Result 타입.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

impl UpstreamError {
    pub fn call(&self) -> Option<UpstreamCall> {
        let call = match self {
            UpstreamError::Status { call, .. }
            | UpstreamError::Transport { call, .. }
            | UpstreamError::Decode { call, .. }
            | UpstreamError::Timeout { call, .. }
            | UpstreamError::Cancelled { call } => *call,
            UpstreamError::Client(_) => return None,
        };
        Some(call)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout { .. })
    }
}

impl From<UpstreamError> for PipelineError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { call, status, body } => PipelineError::Upstream {
                stage: call.stage(),
                status: Some(status),
                message: body,
            },
            UpstreamError::Transport { call, .. } => PipelineError::Upstream {
                stage: call.stage(),
                status: None,
                message: err.to_string(),
            },
            UpstreamError::Timeout { .. } => PipelineError::Timeout(err.to_string()),
            UpstreamError::Decode { .. }
            | UpstreamError::Cancelled { .. }
            | UpstreamError::Client(_) => {
                PipelineError::Unknown(err.to_string())
            }
        }
    }
}
