//! 핸들러 뒤에서 동작하는 서비스 계층.

pub mod analyze;

pub use analyze::{run_analyze, AnalyzeInput, BFF_TOKEN_HEADER};
