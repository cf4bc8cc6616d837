//! 파이프라인 에러 타입.
//!
//! 모든 실패는 어느 단계에서 발생했는지를 나타내는 [`PipelineStage`] 태그를 가지며,
//! 이 태그가 호출자에게 노출되는 유일한 에러 분류입니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::TimeframeCode;

/// 파이프라인 단계 태그.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// 필수 설정 누락
    Env,
    /// 공유 시크릿 불일치
    Auth,
    /// 요청 본문 JSON 파싱 실패
    Parse,
    /// 통화쌍/타임프레임 검증 실패
    Validate,
    /// upstream ensure 호출 실패
    Ensure,
    /// upstream 응답에 기대한 캐시 키 없음
    CacheKey,
    /// upstream series 호출 실패
    Series,
    /// upstream 호출 deadline 초과
    Timeout,
    /// 분류되지 않은 실패
    Unknown,
}

impl PipelineStage {
    /// 와이어 표현 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Env => "env",
            PipelineStage::Auth => "auth",
            PipelineStage::Parse => "parse",
            PipelineStage::Validate => "validate",
            PipelineStage::Ensure => "ensure",
            PipelineStage::CacheKey => "cache_key",
            PipelineStage::Series => "series",
            PipelineStage::Timeout => "timeout",
            PipelineStage::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 분석 파이프라인 에러.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 필수 설정 누락
    #[error("{0}")]
    NotConfigured(String),

    /// 인증 실패
    #[error("unauthorized")]
    Unauthorized,

    /// 본문이 올바른 JSON이 아님
    #[error("{0}")]
    Parse(String),

    /// 입력값 검증 실패
    #[error("{0}")]
    Validate(String),

    /// upstream 호출 실패.
    ///
    /// `status`가 있으면 upstream이 비성공 응답을 보낸 경우이고,
    /// 없으면 전송 계층 실패입니다.
    #[error("{message}")]
    Upstream {
        stage: PipelineStage,
        status: Option<u16>,
        message: String,
    },

    /// upstream이 선택된 타임프레임의 캐시 키를 누락
    #[error("cache key for {0} missing from upstream response")]
    MissingCacheKey(TimeframeCode),

    /// deadline 초과
    #[error("{0}")]
    Timeout(String),

    /// 분류되지 않은 실패
    #[error("{0}")]
    Unknown(String),
}

/// 파이프라인 작업을 위한 Result 타입.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// 이 에러를 발생시킨 파이프라인 단계.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::NotConfigured(_) => PipelineStage::Env,
            PipelineError::Unauthorized => PipelineStage::Auth,
            PipelineError::Parse(_) => PipelineStage::Parse,
            PipelineError::Validate(_) => PipelineStage::Validate,
            PipelineError::Upstream { stage, .. } => *stage,
            PipelineError::MissingCacheKey(_) => PipelineStage::CacheKey,
            PipelineError::Timeout(_) => PipelineStage::Timeout,
            PipelineError::Unknown(_) => PipelineStage::Unknown,
        }
    }

    /// 응답 HTTP 상태 코드.
    ///
    /// upstream이 보고한 실패는 502, 전송 계층/timeout/내부 계약 위반은 500입니다.
    pub fn http_status(&self) -> u16 {
        match self {
            PipelineError::Unauthorized => 401,
            PipelineError::Parse(_) | PipelineError::Validate(_) => 400,
            PipelineError::Upstream {
                status: Some(_), ..
            } => 502,
            PipelineError::NotConfigured(_)
            | PipelineError::Upstream { status: None, .. }
            | PipelineError::MissingCacheKey(_)
            | PipelineError::Timeout(_)
            | PipelineError::Unknown(_) => 500,
        }
    }

    /// 클라이언트 요청 자체의 문제인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Unknown(err.to_string())
    }
}
