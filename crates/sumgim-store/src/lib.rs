//! # sumgim-store
//!
//! 인메모리 이벤트 버퍼.
//! (지표, 리포트)별 유계 (이벤트 벡터 → 카운트) 집계와
//! 업로드 코디네이터를 위한 원자적 drain을 제공한다.
//!
//! ## 모듈
//! - `buffer`: `EventBuffer` (`EntryStore` 포트 구현)와 `RecordOutcome`

pub mod buffer;

pub use buffer::{EventBuffer, RecordOutcome};
