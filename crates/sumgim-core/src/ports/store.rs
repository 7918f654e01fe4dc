//! 버퍼 저장소 포트.
//!
//! 구현: `sumgim-store` crate (인메모리 `EventBuffer`)
//!
//! 코디네이터는 이 포트로만 버퍼를 소비한다. 내구 저장소로 교체하더라도
//! `drain`의 원자적 take(읽고 지우기를 한 트랜잭션으로) 의미는 유지해야 한다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::event::BufferedEntry;
use crate::models::report::ReportKey;

/// 드레인 가능한 이벤트 엔트리 저장소
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// 버퍼된 엔트리가 있는 리포트 키 목록
    async fn occupied_keys(&self) -> Result<Vec<ReportKey>, CoreError>;

    /// 키의 전체 엔트리를 원자적으로 가져오고 비운다.
    ///
    /// 동시 `record`와 경합해도 증가분이 사라지거나 이중 집계되지 않는다.
    /// 한 번의 drain이 반환하는 엔트리는 일관된 스냅샷이다.
    async fn drain(&self, key: &ReportKey) -> Result<Vec<BufferedEntry>, CoreError>;
}
