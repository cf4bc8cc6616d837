//! upstream 지표 서비스 trait 정의.

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::UpstreamResult;
use crate::types::{EnsureRequest, EnsureResult, UpstreamHealth};

/// 지표 서비스 게이트웨이.
///
/// 파이프라인은 이 trait만 보고 upstream을 호출하며, 테스트에서는 스텁 서버를
/// 가리키는 구현으로 교체됩니다.
#[async_trait]
pub trait IndicatorsUpstream: Send + Sync {
    /// 지표 계산과 캐싱을 요청합니다 (`POST /v1/ensure`).
    async fn ensure(
        &self,
        request: &EnsureRequest,
        cancel: &CancellationToken,
    ) -> UpstreamResult<EnsureResult>;

    /// 캐시 키로 전체 시계열을 조회합니다 (`GET /v1/series?key=`).
    async fn series(&self, key: &str, cancel: &CancellationToken) -> UpstreamResult<Value>;

    /// upstream 생존 여부를 확인합니다.
    async fn health(&self) -> UpstreamResult<UpstreamHealth>;

    /// 호출 대상 base URL.
    fn base_url(&self) -> &str;
}
