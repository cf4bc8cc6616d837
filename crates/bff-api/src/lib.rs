//! FX 지표 BFF HTTP 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 분석 API
//! - upstream 헬스 체크 패스스루
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`services`]: 분석 파이프라인 오케스트레이션
//! - [`routes`]: REST API 엔드포인트
//! - [`server`]: 라우터 조립, CORS, graceful shutdown
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어

pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use metrics::{detached_metrics_handle, setup_metrics_recorder};
pub use middleware::metrics_layer;
pub use server::{cors_layer, create_router, shutdown_signal};
pub use services::{run_analyze, AnalyzeInput, BFF_TOKEN_HEADER};
pub use state::AppState;
