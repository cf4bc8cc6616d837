//! 룰 기반 소견(notes) 생성.
//!
//! 마지막 봉의 지표 값에서 짧은 범주형 코멘트를 만듭니다. 규칙은 서로 독립적으로
//! 평가되며 고정된 순서(RSI → 볼린저 밴드 → MACD → ADX)로 이어 붙입니다.

use serde_json::Value;

use super::snapshot::{series_len, BollingerSnapshot, MacdSnapshot, Snapshot};

/// 시계열 모드에서 규칙을 평가하기 위한 최소 봉 개수.
pub const MIN_SERIES_BARS: usize = 30;
/// 태그 구분자.
pub const NOTE_SEPARATOR: &str = " / ";
/// 어떤 규칙도 발동하지 않았을 때.
pub const NO_SIGNAL_NOTE: &str = "no notable signal";
/// 봉 개수가 부족할 때.
pub const INSUFFICIENT_DATA_NOTE: &str = "insufficient data, reference only";

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;
const ADX_STRONG_TREND: f64 = 25.0;

/// 스냅샷 하나에서 소견 문자열을 만듭니다.
pub fn synthesize(snapshot: &Snapshot) -> String {
    let tags: Vec<String> = [
        snapshot.rsi.map(rsi_tag),
        snapshot.bb.and_then(|bb| band_tag(snapshot.close, &bb)),
        snapshot.macd.and_then(|macd| cross_tag(&macd)),
        snapshot.adx.and_then(trend_tag),
    ]
    .into_iter()
    .flatten()
    .collect();

    if tags.is_empty() {
        NO_SIGNAL_NOTE.to_string()
    } else {
        tags.join(NOTE_SEPARATOR)
    }
}

/// 전체 시계열에서 소견 문자열을 만듭니다.
///
/// 봉이 [`MIN_SERIES_BARS`]개 미만이면 규칙을 평가하지 않습니다.
pub fn synthesize_series(series: &Value) -> String {
    let bars = series_len(series).unwrap_or(0);
    if bars < MIN_SERIES_BARS {
        return INSUFFICIENT_DATA_NOTE.to_string();
    }

    match Snapshot::from_series(series) {
        Some(snapshot) => synthesize(&snapshot),
        None => INSUFFICIENT_DATA_NOTE.to_string(),
    }
}

fn rsi_tag(rsi: f64) -> String {
    if rsi >= RSI_OVERBOUGHT {
        format!("RSI={:.1} (overbought)", rsi)
    } else if rsi <= RSI_OVERSOLD {
        format!("RSI={:.1} (oversold)", rsi)
    } else {
        format!("RSI={:.1}", rsi)
    }
}

// 밴드 터치와 중심선 보고는 한 번에 하나만 나온다.
fn band_tag(close: Option<f64>, bb: &BollingerSnapshot) -> Option<String> {
    if let Some(close) = close {
        if bb.lower.is_some_and(|lower| close <= lower) {
            return Some("near lower band".to_string());
        }
        if bb.upper.is_some_and(|upper| close >= upper) {
            return Some("near upper band".to_string());
        }
    }
    bb.mid.map(|mid| format!("BB mid={:.3}", mid))
}

fn cross_tag(macd: &MacdSnapshot) -> Option<String> {
    let (line, signal) = (macd.line?, macd.signal?);
    if line < signal {
        Some("MACD dead cross (bearish)".to_string())
    } else if line > signal {
        Some("MACD golden cross (bullish)".to_string())
    } else {
        None
    }
}

fn trend_tag(adx: f64) -> Option<String> {
    (adx >= ADX_STRONG_TREND).then(|| format!("ADX={:.1} (strong trend)", adx))
}
