//! upstream 와이어 타입.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use bff_core::{AnalyzeRequest, IndicatorConfig, Instrument, TimeframeCode};

/// `POST /v1/ensure` 요청 본문.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsureRequest {
    pub instrument: Instrument,
    pub tf: Vec<TimeframeCode>,
    pub count: u32,
    /// 비어 있으면 본문에서 생략되어 upstream 기본값을 따릅니다.
    #[serde(skip_serializing_if = "IndicatorConfig::is_empty")]
    pub indicators: IndicatorConfig,
}

impl EnsureRequest {
    /// 검증된 요청과 병합된 지표 설정으로 ensure 본문을 만듭니다.
    pub fn new(request: &AnalyzeRequest, indicators: IndicatorConfig) -> Self {
        Self {
            instrument: request.instrument.clone(),
            tf: request.timeframes.clone(),
            count: request.count,
            indicators,
        }
    }
}

/// `POST /v1/ensure` 응답.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnsureResult {
    /// 타임프레임 코드별 최신 지표 스냅샷
    #[serde(default = "empty_object")]
    pub latest: Value,
    /// 타임프레임 코드별 캐시 키. 문자열이 아닌 값은 키가 없는 것으로 본다.
    #[serde(default, alias = "cacheKeys", deserialize_with = "string_entries")]
    pub cache_keys: BTreeMap<String, String>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn string_entries<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(tf, key)| key.as_str().map(|key| (tf, key.to_string())))
        .collect())
}

impl EnsureResult {
    /// 타임프레임의 최신 스냅샷.
    pub fn latest_for(&self, tf: TimeframeCode) -> Option<&Value> {
        self.latest.get(tf.as_str())
    }
}

/// upstream 생존 확인 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamHealth {
    /// upstream 응답 상태 코드
    pub status: u16,
    /// 응답한 경로 (`/health` 또는 `/docs`)
    pub path: &'static str,
}

impl UpstreamHealth {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> AnalyzeRequest {
        AnalyzeRequest::from_json(json!({"instrument": "USD_JPY", "tf": ["H1", "H4"]})).unwrap()
    }

    #[test]
    fn test_ensure_body_shape() {
        let indicators = IndicatorConfig::new().with("rsi", json!({"period": 14}));
        let body = serde_json::to_value(EnsureRequest::new(&request(), indicators)).unwrap();

        assert_eq!(
            body,
            json!({
                "instrument": "USD_JPY",
                "tf": ["H1", "H4"],
                "count": 240,
                "indicators": {"rsi": {"period": 14}}
            })
        );
    }

    #[test]
    fn test_empty_indicators_omitted() {
        let body = serde_json::to_value(EnsureRequest::new(&request(), IndicatorConfig::new())).unwrap();
        assert!(body.get("indicators").is_none());
    }

    #[test]
    fn test_ensure_result_defaults_and_alias() {
        let empty: EnsureResult = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.latest, json!({}));
        assert!(empty.cache_keys.is_empty());

        let camel: EnsureResult = serde_json::from_value(json!({
            "latest": {"H1": {"rsi": 55}},
            "cacheKeys": {"H1": "k2"}
        }))
        .unwrap();
        assert_eq!(camel.cache_keys.get("H1").map(String::as_str), Some("k2"));
        assert_eq!(camel.latest_for(TimeframeCode::H1), Some(&json!({"rsi": 55})));
        assert_eq!(camel.latest_for(TimeframeCode::H4), None);
    }

    /// 문자열이 아닌 캐시 키 값은 디코딩 실패 대신 없는 키로 취급합니다.
    #[test]
    fn test_non_string_cache_keys_dropped() {
        let result: EnsureResult = serde_json::from_value(json!({
            "cache_keys": {"M15": null, "H1": "k2", "H4": 42}
        }))
        .unwrap();
        assert_eq!(result.cache_keys.len(), 1);
        assert_eq!(result.cache_keys.get("H1").map(String::as_str), Some("k2"));

        let null_map: EnsureResult = serde_json::from_value(json!({"cacheKeys": null})).unwrap();
        assert!(null_map.cache_keys.is_empty());
    }

    #[test]
    fn test_health_status_range() {
        assert!(UpstreamHealth { status: 204, path: "/health" }.is_ok());
        assert!(!UpstreamHealth { status: 404, path: "/docs" }.is_ok());
    }
}
