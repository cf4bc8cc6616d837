//! reqwest 기반 지표 서비스 클라이언트.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::deadline::Deadline;
use crate::error::{UpstreamCall, UpstreamError, UpstreamResult};
use crate::gateway::IndicatorsUpstream;
use crate::types::{EnsureRequest, EnsureResult, UpstreamHealth};

const ENSURE_PATH: &str = "/v1/ensure";
const SERIES_PATH: &str = "/v1/series";
const HEALTH_PATH: &str = "/health";
const DOCS_PATH: &str = "/docs";

/// 지표 서비스 HTTP 클라이언트.
#[derive(Debug, Clone)]
pub struct IndicatorsClient {
    http: reqwest::Client,
    base_url: String,
    deadline: Deadline,
}

impl IndicatorsClient {
    /// 새 클라이언트를 생성합니다. `timeout`은 호출마다 적용되는 deadline입니다.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder().connect_timeout(timeout).build()?;
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            deadline: Deadline::new(timeout),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.deadline.timeout()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 상태 코드를 확인하고 본문을 JSON으로 읽습니다.
    async fn read_json(call: UpstreamCall, response: reqwest::Response) -> UpstreamResult<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| UpstreamError::Transport { call, source })?;

        if !status.is_success() {
            warn!(call = %call, status = status.as_u16(), "Upstream returned failure status");
            return Err(UpstreamError::Status {
                call,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| UpstreamError::Decode {
            call,
            message: e.to_string(),
        })
    }

    async fn check_path(&self, path: &'static str, cancel: &CancellationToken) -> UpstreamResult<UpstreamHealth> {
        let call = UpstreamCall::Health;
        let response = self
            .deadline
            .run(call, cancel, async {
                self.http
                    .get(self.url(path))
                    .send()
                    .await
                    .map_err(|source| UpstreamError::Transport { call, source })
            })
            .await?;

        Ok(UpstreamHealth {
            status: response.status().as_u16(),
            path,
        })
    }
}

#[async_trait]
impl IndicatorsUpstream for IndicatorsClient {
    async fn ensure(
        &self,
        request: &EnsureRequest,
        cancel: &CancellationToken,
    ) -> UpstreamResult<EnsureResult> {
        let call = UpstreamCall::Ensure;
        let started = Instant::now();

        let value = self
            .deadline
            .run(call, cancel, async {
                let response = self
                    .http
                    .post(self.url(ENSURE_PATH))
                    .json(request)
                    .send()
                    .await
                    .map_err(|source| UpstreamError::Transport { call, source })?;
                Self::read_json(call, response).await
            })
            .await?;

        debug!(
            instrument = %request.instrument,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ensure completed"
        );

        serde_json::from_value(value).map_err(|e| UpstreamError::Decode {
            call,
            message: e.to_string(),
        })
    }

    async fn series(&self, key: &str, cancel: &CancellationToken) -> UpstreamResult<Value> {
        let call = UpstreamCall::Series;
        let started = Instant::now();

        let value = self
            .deadline
            .run(call, cancel, async {
                let response = self
                    .http
                    .get(self.url(SERIES_PATH))
                    .query(&[("key", key)])
                    .send()
                    .await
                    .map_err(|source| UpstreamError::Transport { call, source })?;
                Self::read_json(call, response).await
            })
            .await?;

        debug!(key, elapsed_ms = started.elapsed().as_millis() as u64, "series completed");
        Ok(value)
    }

    async fn health(&self) -> UpstreamResult<UpstreamHealth> {
        let cancel = CancellationToken::new();

        match self.check_path(HEALTH_PATH, &cancel).await {
            Err(UpstreamError::Transport { source, .. }) => {
                debug!(error = %source, "health check failed, trying docs");
                self.check_path(DOCS_PATH, &cancel).await
            }
            other => other,
        }
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
