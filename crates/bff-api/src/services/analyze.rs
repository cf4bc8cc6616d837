//! 분석 파이프라인 오케스트레이션.
//!
//! 단계 순서: env → auth → parse/validate → 프리셋 병합 → ensure → 캐시 키 선택 →
//! series → 소견 → 응답. 첫 실패에서 멈추고 해당 단계 태그로 보고합니다.

use std::future::Future;
use std::time::Instant;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Span};

use bff_core::{
    resolve_indicators, select_cache_key, series_len, synthesize, synthesize_series,
    AnalyzeRequest, AnalyzeResponse, PipelineError, PipelineResult, Snapshot, TimeframeCode,
};
use bff_upstream::{EnsureRequest, EnsureResult, IndicatorsUpstream, UpstreamCall, UpstreamResult};

use crate::metrics::{record_analyze, record_upstream_duration};
use crate::state::AppState;

/// 공유 토큰 헤더 이름.
pub const BFF_TOKEN_HEADER: &str = "x-bff-token";

const BASE_URL_MISSING: &str = "INDICATORS_BASE_URL is not set";

/// 한 번의 분석 호출 입력.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeInput<'a> {
    /// `x-bff-token` 헤더 값
    pub token: Option<&'a str>,
    /// 원시 요청 본문
    pub body: &'a [u8],
}

/// 분석 파이프라인을 실행합니다.
///
/// `cancel`이 취소되면 진행 중인 upstream 호출이 중단됩니다. 결과는
/// `bff_analyze_total` 메트릭으로 기록됩니다.
pub async fn run_analyze(
    state: &AppState,
    input: AnalyzeInput<'_>,
    cancel: &CancellationToken,
) -> PipelineResult<AnalyzeResponse> {
    let result = pipeline(state, input, cancel).await;

    match &result {
        Ok(_) => record_analyze("ok"),
        Err(err) => {
            warn!(step = %err.stage(), error = %err, "Analyze failed");
            record_analyze(err.stage().as_str());
        }
    }

    result
}

async fn pipeline(
    state: &AppState,
    input: AnalyzeInput<'_>,
    cancel: &CancellationToken,
) -> PipelineResult<AnalyzeResponse> {
    let upstream: &dyn IndicatorsUpstream = state
        .upstream
        .as_deref()
        .ok_or_else(|| PipelineError::NotConfigured(BASE_URL_MISSING.to_string()))?;

    state.config.auth.check(input.token)?;

    let request = AnalyzeRequest::from_slice(input.body)?;
    Span::current().record("instrument", request.instrument.as_str());

    let indicators = resolve_indicators(request.preset.as_deref(), request.indicators.as_ref());
    debug!(
        timeframes = ?request.timeframes,
        count = request.count,
        indicators = indicators.len(),
        "Request normalized"
    );

    let ensure_request = EnsureRequest::new(&request, indicators);
    let ensured = timed(UpstreamCall::Ensure, upstream.ensure(&ensure_request, cancel)).await?;

    let (tf, key) = select_cache_key(&ensured.cache_keys, &request.timeframes)?;
    debug!(tf = %tf, key = %key, "Cache key selected");

    let series = timed(UpstreamCall::Series, upstream.series(&key, cancel)).await?;

    let notes = compose_notes(&ensured, tf, &series);
    info!(tf = %tf, notes = %notes, "Analyze completed");

    Ok(AnalyzeResponse::success(ensured.latest, key, series, notes))
}

/// upstream 호출 시간을 기록하고 에러를 파이프라인 에러로 변환합니다.
async fn timed<T, F>(call: UpstreamCall, fut: F) -> PipelineResult<T>
where
    F: Future<Output = UpstreamResult<T>>,
{
    let started = Instant::now();
    let result = fut.await;
    record_upstream_duration(call.as_str(), started.elapsed().as_secs_f64());
    result.map_err(PipelineError::from)
}

/// 시계열에 봉 데이터가 있으면 시계열 기준, 없으면 선택된 타임프레임의 최신 스냅샷 기준.
fn compose_notes(ensured: &EnsureResult, tf: TimeframeCode, series: &Value) -> String {
    if series_len(series).is_some() {
        return synthesize_series(series);
    }

    let snapshot = ensured
        .latest_for(tf)
        .map(Snapshot::from_latest)
        .unwrap_or_default();
    synthesize(&snapshot)
}
