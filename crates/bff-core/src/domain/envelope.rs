//! 분석 응답 envelope.
//!
//! 성공: `{ ok: true, latest, key, raw, notes }`
//! 실패: `{ ok: false, step, error }`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PipelineError, PipelineStage};

/// 성공 응답 본문.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeSuccess {
    /// 항상 true
    pub ok: bool,
    /// ensure 응답의 타임프레임별 최신 스냅샷
    pub latest: Value,
    /// series 조회에 사용한 캐시 키
    pub key: String,
    /// series 응답 원본
    pub raw: Value,
    /// 룰 기반 소견
    pub notes: String,
}

/// 실패 응답 본문.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeFailure {
    /// 항상 false
    pub ok: bool,
    /// 실패한 파이프라인 단계
    pub step: PipelineStage,
    /// 에러 상세 (upstream 응답 본문 또는 내부 메시지)
    pub error: String,
}

/// 분석 응답.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Success(AnalyzeSuccess),
    Failure(AnalyzeFailure),
}

impl AnalyzeResponse {
    /// 성공 envelope를 조립합니다.
    pub fn success(latest: Value, key: impl Into<String>, raw: Value, notes: impl Into<String>) -> Self {
        AnalyzeResponse::Success(AnalyzeSuccess {
            ok: true,
            latest,
            key: key.into(),
            raw,
            notes: notes.into(),
        })
    }

    /// 실패 envelope를 조립합니다.
    pub fn failure(step: PipelineStage, error: impl Into<String>) -> Self {
        AnalyzeResponse::Failure(AnalyzeFailure {
            ok: false,
            step,
            error: error.into(),
        })
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AnalyzeResponse::Success(_))
    }

    /// 실패 단계 (성공이면 `None`).
    pub fn step(&self) -> Option<PipelineStage> {
        match self {
            AnalyzeResponse::Success(_) => None,
            AnalyzeResponse::Failure(failure) => Some(failure.step),
        }
    }
}

impl From<&PipelineError> for AnalyzeResponse {
    fn from(err: &PipelineError) -> Self {
        AnalyzeResponse::failure(err.stage(), err.to_string())
    }
}

impl From<PipelineError> for AnalyzeResponse {
    fn from(err: PipelineError) -> Self {
        AnalyzeResponse::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let response = AnalyzeResponse::success(
            json!({"H1": {"rsi": 50}}),
            "k2",
            json!({"ohlcv": {}}),
            "no notable signal",
        );
        assert!(response.is_ok());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "ok": true,
                "latest": {"H1": {"rsi": 50}},
                "key": "k2",
                "raw": {"ohlcv": {}},
                "notes": "no notable signal"
            })
        );
    }

    #[test]
    fn test_failure_from_pipeline_error() {
        let err = PipelineError::Upstream {
            stage: PipelineStage::Ensure,
            status: Some(500),
            message: "boom".to_string(),
        };
        let response = AnalyzeResponse::from(&err);

        assert_eq!(response.step(), Some(PipelineStage::Ensure));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"ok": false, "step": "ensure", "error": "boom"})
        );
    }

    #[test]
    fn test_failure_has_no_raw() {
        let response = AnalyzeResponse::failure(PipelineStage::Timeout, "ensure timed out");
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("raw").is_none());
        assert_eq!(value["step"], "timeout");
    }

    #[test]
    fn test_deserialize_either_variant() {
        let failure: AnalyzeResponse =
            serde_json::from_value(json!({"ok": false, "step": "validate", "error": "x"})).unwrap();
        assert_eq!(failure.step(), Some(PipelineStage::Validate));

        let success: AnalyzeResponse = serde_json::from_value(json!({
            "ok": true, "latest": {}, "key": "k", "raw": [], "notes": "n"
        }))
        .unwrap();
        assert!(success.is_ok());
    }
}
