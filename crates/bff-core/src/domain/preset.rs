//! 지표 설정 프리셋.
//!
//! 이름이 붙은 기본 지표 설정 묶음을 제공하고, 호출자가 보낸 override와
//! 최상위 키 단위로 얕게(shallow) 병합합니다. 중첩 파라미터 객체는 통째로 교체되며
//! 재귀 병합하지 않습니다.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// 지표 이름 → 파라미터 객체 매핑.
///
/// 파라미터 형태는 검증하지 않으며, 잘못된 값은 upstream에서 거부됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorConfig(Map<String, Value>);

impl IndicatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지표 파라미터를 설정합니다.
    #[must_use]
    pub fn with(mut self, indicator: impl Into<String>, params: Value) -> Self {
        self.0.insert(indicator.into(), params);
        self
    }

    pub fn get(&self, indicator: &str) -> Option<&Value> {
        self.0.get(indicator)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 지표 이름 목록.
    pub fn indicators(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// override를 얕게 병합합니다. 같은 최상위 키는 override 값으로 교체됩니다.
    pub fn merge_overrides(&mut self, overrides: &IndicatorConfig) {
        for (indicator, params) in &overrides.0 {
            self.0.insert(indicator.clone(), params.clone());
        }
    }

    /// 병합 결과를 새 값으로 반환합니다.
    #[must_use]
    pub fn merged(mut self, overrides: &IndicatorConfig) -> Self {
        self.merge_overrides(overrides);
        self
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for IndicatorConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// 내장 프리셋.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// RSI/SMA/EMA/MACD/볼린저 밴드 기본값
    Default,
    /// RSI와 SMA만 계산하는 가벼운 설정
    Light,
    /// 추세 추종용 (장기 이동평균, MACD, ADX)
    Trend,
    /// 평균 회귀용 (단기 RSI, 넓은 밴드)
    MeanRevert,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Default, Preset::Light, Preset::Trend, Preset::MeanRevert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Light => "light",
            Preset::Trend => "trend",
            Preset::MeanRevert => "mean_revert",
        }
    }

    /// 이 프리셋의 기본 지표 설정.
    pub fn base_config(&self) -> IndicatorConfig {
        let macd = json!({"fast": 12, "slow": 26, "signal": 9});
        match self {
            Preset::Default => IndicatorConfig::new()
                .with("rsi", json!({"period": 14}))
                .with("sma", json!({"period": 20}))
                .with("ema", json!({"period": 20}))
                .with("macd", macd)
                .with("bb", json!({"period": 20, "stddev": 2.0})),
            Preset::Light => IndicatorConfig::new()
                .with("rsi", json!({"period": 14}))
                .with("sma", json!({"period": 20})),
            Preset::Trend => IndicatorConfig::new()
                .with("sma", json!({"period": 200}))
                .with("ema", json!({"period": 50}))
                .with("macd", macd)
                .with("adx", json!({"period": 14})),
            Preset::MeanRevert => IndicatorConfig::new()
                .with("rsi", json!({"period": 7}))
                .with("bb", json!({"period": 20, "stddev": 2.5})),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown preset: {}", s))
    }
}

/// 프리셋 이름과 override로 최종 지표 설정을 만듭니다.
///
/// 알 수 없는 프리셋 이름은 에러 없이 빈 기본 설정으로 처리됩니다.
pub fn resolve_indicators(
    preset: Option<&str>,
    overrides: Option<&IndicatorConfig>,
) -> IndicatorConfig {
    let base = match preset {
        Some(name) => match name.parse::<Preset>() {
            Ok(preset) => preset.base_config(),
            Err(_) => {
                warn!(preset = %name, "Unknown preset, falling back to empty base");
                IndicatorConfig::new()
            }
        },
        None => IndicatorConfig::new(),
    };

    match overrides {
        Some(overrides) => base.merged(overrides),
        None => base,
    }
}
