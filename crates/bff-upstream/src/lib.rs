//! # BFF Upstream
//!
//! 지표 서비스(upstream)로의 HTTP 게이트웨이.
//!
//! - [`IndicatorsUpstream`]: 파이프라인이 의존하는 게이트웨이 trait
//! - [`IndicatorsClient`]: reqwest 구현
//! - [`Deadline`]: 시간 제한 및 취소
//! - [`UpstreamError`]: 호출 에러와 파이프라인 에러로의 변환

pub mod client;
pub mod deadline;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::IndicatorsClient;
pub use deadline::Deadline;
pub use error::{UpstreamCall, UpstreamError, UpstreamResult};
pub use gateway::IndicatorsUpstream;
pub use types::{EnsureRequest, EnsureResult, UpstreamHealth};
