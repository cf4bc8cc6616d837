//! 설정 관리.
//!
//! 프로세스 시작 시 한 번 로드되어 이후 변경되지 않는 설정입니다.
//! 모든 컴포넌트에 명시적으로 전달되며, 요청 처리 중에 환경 변수를 다시 읽지 않습니다.
//!
//! # 환경변수
//!
//! - `INDICATORS_BASE_URL`: upstream 지표 서비스 주소 (미설정 시 분석 요청이 `env` 단계로 실패)
//! - `BFF_TOKEN`: `x-bff-token` 헤더와 비교할 공유 시크릿
//! - `BFF_AUTH_DISABLED`: 토큰 없이 인증 검사를 건너뛰는 명시적 스위치 (기본값: false)
//! - `UPSTREAM_TIMEOUT_MS`: upstream 호출별 deadline (기본값: 8000)
//! - `API_HOST`, `API_PORT`: 바인딩 주소 (기본값: 127.0.0.1:3000)
//! - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin (미설정 시 모든 origin 허용)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::error::PipelineError;

/// 기본 upstream deadline (밀리초).
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 8000;

/// 설정 로드 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 설정 소스 읽기/역직렬화 실패
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),

    /// 값은 읽었으나 유효하지 않음
    #[error("잘못된 설정: {0}")]
    Invalid(String),
}

/// 서버 바인딩 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` 문자열.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 인바운드 요청 인증 정책.
#[derive(Debug)]
pub enum AuthPolicy {
    /// `x-bff-token` 헤더가 이 값과 같아야 함
    SharedSecret(SecretString),
    /// `BFF_AUTH_DISABLED=true`로 명시적으로 비활성화됨
    Disabled,
    /// 토큰도 스위치도 설정되지 않음
    Unconfigured,
}

impl AuthPolicy {
    fn resolve(token: Option<String>, disabled: bool) -> Self {
        match token {
            Some(token) if !token.is_empty() => AuthPolicy::SharedSecret(SecretString::from(token)),
            _ if disabled => AuthPolicy::Disabled,
            _ => AuthPolicy::Unconfigured,
        }
    }

    /// 제시된 헤더 값을 검사합니다.
    pub fn check(&self, presented: Option<&str>) -> Result<(), PipelineError> {
        match self {
            AuthPolicy::SharedSecret(secret) => match presented {
                Some(value) if secrets_match(value, secret.expose_secret()) => Ok(()),
                _ => Err(PipelineError::Unauthorized),
            },
            AuthPolicy::Disabled => Ok(()),
            AuthPolicy::Unconfigured => Err(PipelineError::NotConfigured(
                "BFF_TOKEN is not set (set BFF_AUTH_DISABLED=true to run without a token)"
                    .to_string(),
            )),
        }
    }

    pub fn is_enforced(&self) -> bool {
        matches!(self, AuthPolicy::SharedSecret(_))
    }
}

/// 일치하는 앞부분 길이에 따라 비교 시간이 달라지지 않도록 상수 시간으로 비교합니다.
fn secrets_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// 환경 변수에서 그대로 읽어온 값.
#[derive(Deserialize)]
struct RawConfig {
    indicators_base_url: Option<String>,
    bff_token: Option<String>,
    #[serde(default)]
    bff_auth_disabled: bool,
    upstream_timeout_ms: u64,
    api_host: String,
    api_port: u16,
    cors_origins: Option<String>,
}

/// BFF 프로세스 설정.
#[derive(Debug)]
pub struct BffConfig {
    /// upstream 기본 URL (끝의 `/` 제거됨)
    pub indicators_base_url: Option<String>,
    /// 인증 정책
    pub auth: AuthPolicy,
    /// upstream 호출별 deadline
    pub upstream_timeout: Duration,
    /// 서버 바인딩
    pub server: ServerConfig,
    /// CORS 허용 origin (비어 있으면 모두 허용)
    pub cors_origins: Vec<String>,
}

impl Default for BffConfig {
    fn default() -> Self {
        Self {
            indicators_base_url: None,
            auth: AuthPolicy::Unconfigured,
            upstream_timeout: Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS),
            server: ServerConfig::default(),
            cors_origins: Vec::new(),
        }
    }
}

impl BffConfig {
    /// 프로세스 환경 변수에서 설정을 로드합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Environment::default())
    }

    /// 주어진 키/값 맵을 환경 변수처럼 취급하여 로드합니다.
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(config::Environment::default().source(Some(vars)))
    }

    // 환경 변수 값은 문자열로 둔다. 숫자/불리언 변환은 RawConfig 필드 타입이 정한다.
    fn load(env: config::Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = config::Config::builder()
            .set_default("upstream_timeout_ms", DEFAULT_UPSTREAM_TIMEOUT_MS)?
            .set_default("api_host", "127.0.0.1")?
            .set_default("api_port", 3000)?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let indicators_base_url = raw
            .indicators_base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        if let Some(url) = &indicators_base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "INDICATORS_BASE_URL must be an http(s) URL, got {}",
                    url
                )));
            }
        }

        let cors_origins = raw
            .cors_origins
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            indicators_base_url,
            auth: AuthPolicy::resolve(raw.bff_token, raw.bff_auth_disabled),
            upstream_timeout: Duration::from_millis(raw.upstream_timeout_ms.max(1)),
            server: ServerConfig {
                host: raw.api_host,
                port: raw.api_port,
            },
            cors_origins,
        })
    }

    /// upstream 주소를 설정합니다.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.indicators_base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// 인증 정책을 설정합니다.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthPolicy) -> Self {
        self.auth = auth;
        self
    }

    /// upstream deadline을 설정합니다.
    #[must_use]
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }
}
