//! 분석 파이프라인 도메인 규칙.
//!
//! 흐름: 요청 정규화 → 프리셋 병합 → (upstream ensure) → 캐시 키 선택 →
//! (upstream series) → 소견 생성 → 응답 조립

pub mod envelope;
pub mod notes;
pub mod preset;
pub mod request;
pub mod selector;
pub mod snapshot;

pub use envelope::{AnalyzeFailure, AnalyzeResponse, AnalyzeSuccess};
pub use notes::{
    synthesize, synthesize_series, INSUFFICIENT_DATA_NOTE, MIN_SERIES_BARS, NOTE_SEPARATOR,
    NO_SIGNAL_NOTE,
};
pub use preset::{resolve_indicators, IndicatorConfig, Preset};
pub use request::{AnalyzeBody, AnalyzeRequest, DEFAULT_COUNT};
pub use selector::{pick_timeframe, select_cache_key, PREFERRED_TIMEFRAME};
pub use snapshot::{series_len, BollingerSnapshot, MacdSnapshot, Snapshot};
