//! 분석 요청에 쓰이는 타임프레임 코드.
//!
//! 허용 집합은 M15, H1, H4이며, 레거시 코드 D1은 검증 전에 H4로 정규화됩니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 타임프레임 코드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeframeCode {
    /// 15분봉
    M15,
    /// 1시간봉
    H1,
    /// 4시간봉
    H4,
}

/// 레거시 코드 → 정규 코드 매핑.
const LEGACY_SYNONYMS: &[(&str, TimeframeCode)] = &[("D1", TimeframeCode::H4)];

impl TimeframeCode {
    /// 허용되는 모든 정규 코드.
    pub const ALL: [TimeframeCode; 3] = [TimeframeCode::M15, TimeframeCode::H1, TimeframeCode::H4];

    /// 와이어 표현 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeframeCode::M15 => "M15",
            TimeframeCode::H1 => "H1",
            TimeframeCode::H4 => "H4",
        }
    }

    /// 레거시 동의어를 적용한 뒤 허용 집합에서 코드를 찾습니다.
    ///
    /// 허용 집합에 없는 코드는 `None`입니다.
    pub fn canonicalize(code: &str) -> Option<Self> {
        if let Some((_, canonical)) = LEGACY_SYNONYMS.iter().find(|(legacy, _)| *legacy == code) {
            return Some(*canonical);
        }
        Self::ALL.iter().copied().find(|tf| tf.as_str() == code)
    }
}

impl fmt::Display for TimeframeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeframeCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::canonicalize(s).ok_or_else(|| format!("Invalid timeframe: {}", s))
    }
}

/// 입력 코드 목록을 정규화합니다.
///
/// 동의어 매핑 → 허용되지 않는 코드 제거 → 첫 등장 순서를 유지한 중복 제거.
pub fn normalize_timeframes<I, S>(codes: I) -> Vec<TimeframeCode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<TimeframeCode> = Vec::new();
    for code in codes {
        if let Some(tf) = TimeframeCode::canonicalize(code.as_ref()) {
            if !out.contains(&tf) {
                out.push(tf);
            }
        }
    }
    out
}
