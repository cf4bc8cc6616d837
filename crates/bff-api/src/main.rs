//! FX 지표 BFF 서버 진입점.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use bff_api::{create_router, setup_metrics_recorder, shutdown_signal, AppState};
use bff_core::{init_logging, AuthPolicy, BffConfig, LogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    init_logging(LogConfig::from_env()).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

    info!("Starting FX indicators BFF...");

    let metrics_handle = setup_metrics_recorder().context("Prometheus 레코더 설치 실패")?;
    info!("Prometheus metrics recorder initialized");

    let config = BffConfig::from_env().context("설정 로드 실패")?;

    match &config.indicators_base_url {
        Some(base) => info!(base = %base, timeout_ms = config.upstream_timeout.as_millis() as u64, "Upstream configured"),
        None => warn!("INDICATORS_BASE_URL not set, analyze requests will fail with step=env"),
    }
    match &config.auth {
        AuthPolicy::SharedSecret(_) => info!("Shared token auth enabled"),
        AuthPolicy::Disabled => warn!("BFF_AUTH_DISABLED=true, analyze requests are not authenticated"),
        AuthPolicy::Unconfigured => {
            warn!("Neither BFF_TOKEN nor BFF_AUTH_DISABLED set, analyze requests will fail with step=env")
        }
    }

    let addr = config.server.bind_addr();
    let state = Arc::new(AppState::new(config).context("upstream 클라이언트 생성 실패")?);
    info!(version = %state.version, has_upstream = state.has_upstream(), "Application state initialized");

    let app = create_router(state, metrics_handle);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("{addr} 바인딩 실패. API_HOST, API_PORT 환경변수를 확인하세요."))?;
    info!(%addr, "API server listening");
    info!("Metrics available at http://{}/metrics", addr);

    let shutdown_token = CancellationToken::new();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}
