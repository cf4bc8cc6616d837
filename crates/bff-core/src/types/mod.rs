//! 도메인 값 타입.

pub mod instrument;
pub mod timeframe;

pub use instrument::Instrument;
pub use timeframe::{normalize_timeframes, TimeframeCode};
