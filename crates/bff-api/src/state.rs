//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 시작 시 한 번 로드한 설정과 upstream 게이트웨이를 보관합니다.
//! Arc로 래핑되어 여러 요청 간에 공유됩니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use bff_core::BffConfig;
use bff_upstream::{IndicatorsClient, IndicatorsUpstream, UpstreamResult};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 프로세스 설정 (요청 처리 중 다시 읽지 않음)
    pub config: Arc<BffConfig>,

    /// upstream 게이트웨이 (`INDICATORS_BASE_URL` 미설정 시 None)
    pub upstream: Option<Arc<dyn IndicatorsUpstream>>,

    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,

    /// 서비스 버전
    pub version: String,
}

impl AppState {
    /// 설정으로부터 상태를 만들고, base URL이 있으면 HTTP 클라이언트를 생성합니다.
    pub fn new(config: BffConfig) -> UpstreamResult<Self> {
        let upstream = match &config.indicators_base_url {
            Some(base) => {
                let client = IndicatorsClient::new(base.as_str(), config.upstream_timeout)?;
                Some(Arc::new(client) as Arc<dyn IndicatorsUpstream>)
            }
            None => None,
        };

        Ok(Self::from_parts(config, upstream))
    }

    /// 미리 만든 게이트웨이로 상태를 조립합니다.
    pub fn from_parts(config: BffConfig, upstream: Option<Arc<dyn IndicatorsUpstream>>) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn has_upstream(&self) -> bool {
        self.upstream.is_some()
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
