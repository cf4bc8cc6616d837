//! 분석 요청 정규화.
//!
//! 원시 요청 본문을 검증된 [`AnalyzeRequest`]로 변환합니다.
//! 본문이 JSON이 아니면 `parse`, JSON이지만 내용이 잘못되었으면 `validate` 단계로 실패합니다.

use serde::Deserialize;
use serde_json::Value;

use super::preset::IndicatorConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{normalize_timeframes, Instrument, TimeframeCode};

/// `count` 미지정 시 기본 봉 개수.
pub const DEFAULT_COUNT: u32 = 240;

/// 클라이언트가 보내는 요청 본문 그대로의 형태.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeBody {
    /// 통화쌍 (예: "USD_JPY")
    #[serde(default)]
    pub instrument: Option<String>,
    /// 타임프레임 코드 목록
    #[serde(default, alias = "timeframes")]
    pub tf: Option<Vec<String>>,
    /// 봉 개수
    #[serde(default)]
    pub count: Option<i64>,
    /// 지표 설정 override
    #[serde(default, alias = "indicatorConfig")]
    pub indicators: Option<IndicatorConfig>,
    /// 프리셋 이름
    #[serde(default, alias = "presetName")]
    pub preset: Option<String>,
}

/// 검증 및 정규화가 끝난 분석 요청.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeRequest {
    pub instrument: Instrument,
    /// 중복 없이 입력 순서를 유지한 타임프레임 (항상 비어 있지 않음)
    pub timeframes: Vec<TimeframeCode>,
    pub count: u32,
    pub indicators: Option<IndicatorConfig>,
    pub preset: Option<String>,
}

impl AnalyzeRequest {
    /// 원시 바이트에서 요청을 파싱하고 검증합니다.
    pub fn from_slice(body: &[u8]) -> PipelineResult<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| PipelineError::Parse(format!("invalid JSON body: {}", e)))?;
        Self::from_json(value)
    }

    /// 이미 파싱된 JSON 값에서 요청을 검증합니다.
    pub fn from_json(value: Value) -> PipelineResult<Self> {
        let body: AnalyzeBody = serde_json::from_value(value)
            .map_err(|e| PipelineError::Validate(format!("invalid request shape: {}", e)))?;
        Self::from_body(body)
    }

    /// 역직렬화된 본문을 검증합니다.
    pub fn from_body(body: AnalyzeBody) -> PipelineResult<Self> {
        let symbol = body
            .instrument
            .ok_or_else(|| PipelineError::Validate("instrument is required".to_string()))?;
        let instrument = Instrument::parse(&symbol)?;

        let timeframes = normalize_timeframes(body.tf.unwrap_or_default());
        if timeframes.is_empty() {
            return Err(PipelineError::Validate(format!(
                "tf must contain at least one of {}",
                TimeframeCode::ALL
                    .iter()
                    .map(TimeframeCode::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let count = match body.count {
            None => DEFAULT_COUNT,
            Some(n) if n > 0 => u32::try_from(n).map_err(|_| {
                PipelineError::Validate(format!("count is out of range: {}", n))
            })?,
            Some(n) => {
                return Err(PipelineError::Validate(format!(
                    "count must be positive, got {}",
                    n
                )))
            }
        };

        Ok(Self {
            instrument,
            timeframes,
            count,
            indicators: body.indicators,
            preset: body.preset,
        })
    }

    /// 정규화된 타임프레임에 `tf`가 포함되어 있는지 확인합니다.
    pub fn includes(&self, tf: TimeframeCode) -> bool {
        self.timeframes.contains(&tf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineStage;
    use serde_json::json;

    fn stage_of(value: Value) -> PipelineStage {
        AnalyzeRequest::from_json(value).unwrap_err().stage()
    }

    #[test]
    fn test_valid_request_with_defaults() {
        let req = AnalyzeRequest::from_json(json!({
            "instrument": "USD_JPY",
            "tf": ["M15", "H1", "D1"]
        }))
        .unwrap();

        assert_eq!(req.instrument.as_str(), "USD_JPY");
        assert_eq!(
            req.timeframes,
            vec![TimeframeCode::M15, TimeframeCode::H1, TimeframeCode::H4]
        );
        assert_eq!(req.count, DEFAULT_COUNT);
        assert!(req.indicators.is_none());
        assert!(req.preset.is_none());
        assert!(req.includes(TimeframeCode::H1));
    }

    #[test]
    fn test_aliases_accepted() {
        let req = AnalyzeRequest::from_json(json!({
            "instrument": "EUR_USD",
            "timeframes": ["H4"],
            "count": 500,
            "indicatorConfig": {"rsi": {"period": 9}},
            "presetName": "trend"
        }))
        .unwrap();

        assert_eq!(req.count, 500);
        assert_eq!(req.preset.as_deref(), Some("trend"));
        assert!(req.indicators.unwrap().get("rsi").is_some());
    }

    #[test]
    fn test_malformed_json_is_parse_failure() {
        let err = AnalyzeRequest::from_slice(b"{\"instrument\": ").unwrap_err();
        assert_eq!(err.stage(), PipelineStage::Parse);
        assert_eq!(err.http_status(), 400);

        let err = AnalyzeRequest::from_slice(b"").unwrap_err();
        assert_eq!(err.stage(), PipelineStage::Parse);
    }

    #[test]
    fn test_missing_or_malformed_instrument_is_validate_failure() {
        assert_eq!(stage_of(json!({"tf": ["H1"]})), PipelineStage::Validate);
        assert_eq!(
            stage_of(json!({"instrument": "usdjpy", "tf": ["H1"]})),
            PipelineStage::Validate
        );
        assert_eq!(
            stage_of(json!({"instrument": 42, "tf": ["H1"]})),
            PipelineStage::Validate
        );
    }

    #[test]
    fn test_empty_timeframes_after_normalization() {
        assert_eq!(
            stage_of(json!({"instrument": "USD_JPY", "tf": ["W1", "M1"]})),
            PipelineStage::Validate
        );
        assert_eq!(
            stage_of(json!({"instrument": "USD_JPY", "tf": []})),
            PipelineStage::Validate
        );
        assert_eq!(
            stage_of(json!({"instrument": "USD_JPY"})),
            PipelineStage::Validate
        );
    }

    #[test]
    fn test_count_must_be_positive_integer() {
        for count in [json!(0), json!(-5), json!(1.5), json!("240")] {
            assert_eq!(
                stage_of(json!({"instrument": "USD_JPY", "tf": ["H1"], "count": count})),
                PipelineStage::Validate
            );
        }
    }

    #[test]
    fn test_no_upper_bound_on_count() {
        let req = AnalyzeRequest::from_json(json!({
            "instrument": "USD_JPY", "tf": ["H1"], "count": 100000
        }))
        .unwrap();
        assert_eq!(req.count, 100_000);
    }

    #[test]
    fn test_non_object_body_is_validate_failure() {
        assert_eq!(stage_of(json!(["USD_JPY"])), PipelineStage::Validate);
        let err = AnalyzeRequest::from_slice(b"null").unwrap_err();
        assert_eq!(err.stage(), PipelineStage::Validate);
    }
}
