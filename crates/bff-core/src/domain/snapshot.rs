//! 지표 스냅샷 추출.
//!
//! upstream 응답 스키마는 이 계층이 소유하지 않으므로, JSON에서 필요한 값만
//! 관대하게 읽어 [`Snapshot`]으로 만듭니다.
//!
//! - 스냅샷 형태: `{ close, rsi: 75 | {value}, bb: {lower, mid, upper}, macd: {macd, signal}, adx }`
//! - 시계열 형태: `{ ohlcv: {time: [], close: []}, indicators: { rsi: [], bb: {...: []}, ... } }`

use serde_json::Value;

static NO_INDICATORS: Value = Value::Null;

/// 볼린저 밴드 값.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BollingerSnapshot {
    pub lower: Option<f64>,
    pub mid: Option<f64>,
    pub upper: Option<f64>,
}

/// MACD 라인/시그널 값.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacdSnapshot {
    pub line: Option<f64>,
    pub signal: Option<f64>,
}

/// 한 타임프레임의 마지막 봉 지표 값.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Snapshot {
    pub close: Option<f64>,
    pub rsi: Option<f64>,
    pub bb: Option<BollingerSnapshot>,
    pub macd: Option<MacdSnapshot>,
    pub adx: Option<f64>,
}

impl Snapshot {
    /// ensure 응답의 `latest` 스냅샷 하나에서 값을 읽습니다.
    ///
    /// 지표가 `indicators` 아래에 묶여 있어도 읽습니다.
    pub fn from_latest(snapshot: &Value) -> Self {
        let indicators = snapshot.get("indicators").unwrap_or(snapshot);
        let close = snapshot.get("close").and_then(|v| scalar(v, &[]));
        extract(close, indicators, scalar)
    }

    /// 시계열의 마지막 인덱스에서 값을 읽습니다.
    ///
    /// `ohlcv.time`이 없거나 비어 있으면 `None`입니다.
    pub fn from_series(series: &Value) -> Option<Self> {
        let last = series_len(series)?.checked_sub(1)?;
        let at = |v: &Value, keys: &[&str]| array(v, keys)?.get(last)?.as_f64();

        let close = series
            .get("ohlcv")
            .and_then(|ohlcv| ohlcv.get("close"))
            .and_then(|v| at(v, &[]));
        let indicators = series.get("indicators").unwrap_or(&NO_INDICATORS);
        Some(extract(close, indicators, at))
    }
}

/// 시계열의 봉 개수 (`ohlcv.time` 길이).
pub fn series_len(series: &Value) -> Option<usize> {
    series
        .get("ohlcv")?
        .get("time")?
        .as_array()
        .map(Vec::len)
}

fn extract<F>(close: Option<f64>, indicators: &Value, read: F) -> Snapshot
where
    F: Fn(&Value, &[&str]) -> Option<f64>,
{
    let field = |obj: &Value, names: &[&str]| -> Option<f64> {
        names.iter().find_map(|name| obj.get(*name)).and_then(|v| read(v, &[]))
    };

    let rsi = indicators.get("rsi").and_then(|v| read(v, &["value", "rsi"]));
    let bb = indicators
        .get("bb")
        .filter(|v| v.is_object())
        .map(|bb| BollingerSnapshot {
            lower: field(bb, &["lower"]),
            mid: field(bb, &["mid", "middle"]),
            upper: field(bb, &["upper"]),
        });
    let macd = indicators
        .get("macd")
        .filter(|v| v.is_object())
        .map(|macd| MacdSnapshot {
            line: field(macd, &["macd", "line", "value"]),
            signal: field(macd, &["signal"]),
        });
    let adx = indicators.get("adx").and_then(|v| read(v, &["value", "adx"]));

    Snapshot {
        close,
        rsi,
        bb,
        macd,
        adx,
    }
}

/// 숫자이거나, 주어진 키 중 하나에 숫자를 담은 객체.
fn scalar(value: &Value, keys: &[&str]) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => keys.iter().find_map(|k| map.get(*k)?.as_f64()),
        _ => None,
    }
}

/// 배열이거나, 주어진 키 중 하나에 배열을 담은 객체.
fn array<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => keys.iter().find_map(|k| map.get(*k)?.as_array()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_latest_snapshot_shapes() {
        let snap = Snapshot::from_latest(&json!({
            "close": 112.0,
            "rsi": {"value": 75},
            "bb": {"lower": 100, "mid": 105, "upper": 110},
            "macd": {"macd": 0.4, "signal": 0.1, "hist": 0.3},
            "adx": 31.5
        }));

        assert_eq!(snap.close, Some(112.0));
        assert_eq!(snap.rsi, Some(75.0));
        assert_eq!(
            snap.bb,
            Some(BollingerSnapshot {
                lower: Some(100.0),
                mid: Some(105.0),
                upper: Some(110.0)
            })
        );
        assert_eq!(snap.macd.unwrap().line, Some(0.4));
        assert_eq!(snap.adx, Some(31.5));
    }

    #[test]
    fn test_latest_snapshot_nested_indicators() {
        let snap = Snapshot::from_latest(&json!({
            "close": 1.1,
            "indicators": {"rsi": 40, "adx": {"adx": 12}}
        }));
        assert_eq!(snap.rsi, Some(40.0));
        assert_eq!(snap.adx, Some(12.0));
        assert!(snap.bb.is_none());
    }

    #[test]
    fn test_latest_snapshot_ignores_garbage() {
        let snap = Snapshot::from_latest(&json!({"rsi": "high", "bb": [1, 2], "macd": 3}));
        assert_eq!(snap, Snapshot::default());
        assert_eq!(Snapshot::from_latest(&Value::Null), Snapshot::default());
    }

    #[test]
    fn test_series_reads_last_index() {
        let series = json!({
            "ohlcv": {"time": [1, 2, 3], "close": [10.0, 11.0, 12.0]},
            "indicators": {
                "rsi": [50, 60, 71],
                "bb": {"lower": [9, 9, 9], "middle": [10, 10, 10.5], "upper": [11, 11, 12]},
                "macd": {"macd": [0, 0, -1], "signal": [0, 0, 1]},
                "adx": {"value": [20, 22, 26]}
            }
        });

        assert_eq!(series_len(&series), Some(3));
        let snap = Snapshot::from_series(&series).unwrap();
        assert_eq!(snap.close, Some(12.0));
        assert_eq!(snap.rsi, Some(71.0));
        assert_eq!(snap.bb.unwrap().mid, Some(10.5));
        assert_eq!(snap.macd.unwrap().signal, Some(1.0));
        assert_eq!(snap.adx, Some(26.0));
    }

    #[test]
    fn test_series_with_null_points() {
        let series = json!({
            "ohlcv": {"time": [1, 2], "close": [1.0, 2.0]},
            "indicators": {"rsi": [null, null]}
        });
        let snap = Snapshot::from_series(&series).unwrap();
        assert_eq!(snap.rsi, None);
        assert_eq!(snap.close, Some(2.0));
    }

    #[test]
    fn test_series_without_time_axis() {
        assert!(Snapshot::from_series(&json!({"ohlcv": {}})).is_none());
        assert!(Snapshot::from_series(&json!({"ohlcv": {"time": []}})).is_none());
        assert_eq!(series_len(&json!({"rows": []})), None);
    }
}
