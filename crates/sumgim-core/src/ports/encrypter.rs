//! 암호화기 포트.
//!
//! 구현: `sumgim-crypto` crate (pass-through / fail-on-demand / AEAD)
//!
//! "빈 입력 → 출력 없음"과 "실제 입력 → 실패"의 구분이 계약의 핵심이다.
//! 호출자는 `Ok(None)`을 에러로 취급해서는 안 되고, `Err`를 "보낼 것 없음"으로
//! 취급해서도 안 된다 — 후자는 실제 데이터를 조용히 버리는 버그가 된다.

use crate::error::CoreError;
use crate::models::wire::{EncryptedMessage, Envelope, ObservationToEncrypt};

/// 평문 와이어 메시지를 암호문으로 바꾸는 능력
pub trait Encrypter: Send + Sync {
    /// 봉투 암호화.
    ///
    /// 0바이트로 인코딩되는 빈/기본값 봉투는 `Ok(None)` — 에러도 아니고
    /// 길이 0 암호문도 아니다. 암호화 연산 실패는 `CoreError::Encryption`.
    fn encrypt_envelope(&self, envelope: &Envelope) -> Result<Option<EncryptedMessage>, CoreError>;

    /// 관측 암호화.
    ///
    /// 빈 입력 규칙은 봉투와 같다. 반환된 `EncryptedMessage`는 입력의
    /// 기여 ID를 변경 없이 담아야 한다.
    fn encrypt_observation(
        &self,
        observation: &ObservationToEncrypt,
    ) -> Result<Option<EncryptedMessage>, CoreError>;
}
