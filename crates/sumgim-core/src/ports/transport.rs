//! 전송 포트.
//!
//! 코디네이터가 의존하는 유일한 I/O 경계. 암호화된 봉투 바이트를 수집
//! 엔드포인트로 옮기는 실제 네트워크 구현은 이 crate 밖의 관심사다.

use async_trait::async_trait;

use crate::error::CoreError;

/// 업로드 전송 계층
#[async_trait]
pub trait Transport: Send + Sync {
    /// 암호화된 봉투 페이로드 전송.
    ///
    /// 전송 계층 실패는 `Err` — 코디네이터는 이를 사이클 실패로 기록한다.
    async fn send(&self, payload: &[u8]) -> Result<(), CoreError>;
}
