//! 통화쌍 심볼 정의.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

/// `USD_JPY` 형태의 3글자/3글자 통화쌍 패턴.
static INSTRUMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{3}_[A-Z]{3}$").expect("instrument pattern is a valid regex")
});

/// 검증된 통화쌍 심볼 (예: "USD_JPY").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Instrument(String);

impl Instrument {
    /// 심볼을 검증하여 생성합니다.
    pub fn parse(symbol: &str) -> Result<Self, PipelineError> {
        if INSTRUMENT_PATTERN.is_match(symbol) {
            Ok(Self(symbol.to_string()))
        } else {
            Err(PipelineError::Validate(format!(
                "instrument must look like USD_JPY, got {:?}",
                symbol
            )))
        }
    }

    /// 기준 통화 (예: "USD").
    pub fn base(&self) -> &str {
        &self.0[..3]
    }

    /// 견적 통화 (예: "JPY").
    pub fn quote(&self) -> &str {
        &self.0[4..]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Instrument {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Instrument {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Instrument> for String {
    fn from(value: Instrument) -> Self {
        value.0
    }
}
