//! # BFF Core
//!
//! 지표(indicators) 서비스 앞단 BFF의 핵심 도메인 타입과 요청 파이프라인 규칙을 제공합니다.
//!
//! 이 크레이트는 I/O 없이 순수 로직만 포함합니다:
//! - 파이프라인 단계 태그 및 에러 타입
//! - 프로세스 설정 및 인증 정책
//! - 로깅 인프라
//! - 통화쌍/타임프레임 값 타입
//! - 요청 정규화, 프리셋 병합, 캐시 키 선택, 소견(notes) 생성
//! - 응답 envelope

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
