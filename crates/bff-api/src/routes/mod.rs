//! REST API 라우트.

pub mod analyze;
pub mod health;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::state::AppState;

pub use analyze::{LivenessResponse, SERVICE_NAME};
pub use health::HealthResponse;

/// `/api` 라우터를 생성합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/analyze",
            get(analyze::liveness)
                .post(analyze::analyze)
                .options(analyze::options),
        )
        .route("/api/health", get(health::health_check))
}
