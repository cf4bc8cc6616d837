//! 캐시 키 선택.
//!
//! ensure 결과의 타임프레임별 캐시 키 중 series 조회와 요약에 쓸 하나를 고릅니다.
//! H1이 요청에 있으면 위치와 관계없이 H1을, 없으면 첫 번째 요청 타임프레임을 사용합니다.

use std::collections::BTreeMap;

use crate::error::{PipelineError, PipelineResult};
use crate::types::TimeframeCode;

/// 요청에 있으면 항상 우선하는 타임프레임.
pub const PREFERRED_TIMEFRAME: TimeframeCode = TimeframeCode::H1;

/// 요약 대상 타임프레임을 고릅니다.
pub fn pick_timeframe(requested: &[TimeframeCode]) -> Option<TimeframeCode> {
    if requested.contains(&PREFERRED_TIMEFRAME) {
        Some(PREFERRED_TIMEFRAME)
    } else {
        requested.first().copied()
    }
}

/// 선택된 타임프레임과 그 캐시 키를 반환합니다.
///
/// upstream이 선택된 타임프레임의 키를 누락했으면 `cache_key` 단계로 실패합니다.
pub fn select_cache_key(
    cache_keys: &BTreeMap<String, String>,
    requested: &[TimeframeCode],
) -> PipelineResult<(TimeframeCode, String)> {
    let tf = pick_timeframe(requested)
        .ok_or_else(|| PipelineError::Validate("no timeframes requested".to_string()))?;

    cache_keys
        .get(tf.as_str())
        .map(|key| (tf, key.clone()))
        .ok_or(PipelineError::MissingCacheKey(tf))
}
