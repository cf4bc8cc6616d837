//! upstream 호출 deadline.
//!
//! 호출 future를 타이머 및 호출자의 [`CancellationToken`]과 경쟁시킵니다.
//! 시간 초과나 취소가 먼저 오면 future를 drop하며, 진행 중인 HTTP 요청은 그 drop으로
//! 중단됩니다. 시간 초과는 호출자의 토큰을 건드리지 않습니다.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{UpstreamCall, UpstreamError, UpstreamResult};

/// 호출 하나에 적용되는 제한 시간.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    timeout: Duration,
}

impl Deadline {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `fut`를 제한 시간 안에 실행합니다.
    ///
    /// 시간 초과면 [`UpstreamError::Timeout`], 부모 토큰이 먼저 취소되면
    /// [`UpstreamError::Cancelled`]를 반환합니다. 두 경우 모두 `fut`는 완료 전에 drop됩니다.
    pub async fn run<T, F>(
        &self,
        call: UpstreamCall,
        cancel: &CancellationToken,
        fut: F,
    ) -> UpstreamResult<T>
    where
        F: Future<Output = UpstreamResult<T>>,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(UpstreamError::Cancelled { call }),
            result = fut => result,
            _ = tokio::time::sleep(self.timeout) => {
                warn!(call = %call, timeout_ms = self.timeout.as_millis() as u64, "Upstream call timed out");
                Err(UpstreamError::Timeout { call, after: self.timeout })
            }
        }
    }
}
