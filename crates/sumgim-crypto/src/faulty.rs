//! 주문형 실패 암호화기.
//!
//! 다음 호출을 실패시키도록 무장할 수 있는 테스트용 구현.
//! 에러 전파 경로(관측 단위 부분 실패, 봉투 단위 사이클 중단)를 검증할 때 쓴다.
//! 무장되지 않은 호출은 패스스루로 동작한다.

use std::sync::atomic::{AtomicBool, Ordering};

use sumgim_core::error::CoreError;
use sumgim_core::models::wire::{EncryptedMessage, Envelope, ObservationToEncrypt};
use sumgim_core::ports::encrypter::Encrypter;

use crate::passthrough::PassThroughEncrypter;

/// 다음 호출을 실패시킬 수 있는 암호화기
#[derive(Debug, Default)]
pub struct FaultyEncrypter {
    inner: PassThroughEncrypter,
    fail_next_envelope: AtomicBool,
    fail_next_observation: AtomicBool,
}

impl FaultyEncrypter {
    /// 새 주문형 실패 암호화기 생성 (무장 해제 상태)
    pub fn new() -> Self {
        Self::default()
    }

    /// 다음 `encrypt_envelope` 호출을 실패시키도록 무장
    pub fn fail_on_next_envelope(&self) {
        self.fail_next_envelope.store(true, Ordering::SeqCst);
    }

    /// 다음 `encrypt_observation` 호출을 실패시키도록 무장
    pub fn fail_on_next_observation(&self) {
        self.fail_next_observation.store(true, Ordering::SeqCst);
    }
}

impl Encrypter for FaultyEncrypter {
    fn encrypt_envelope(&self, envelope: &Envelope) -> Result<Option<EncryptedMessage>, CoreError> {
        if self.fail_next_envelope.swap(false, Ordering::SeqCst) {
            return Err(CoreError::Encryption("주입된 봉투 암호화 실패".to_string()));
        }
        self.inner.encrypt_envelope(envelope)
    }

    fn encrypt_observation(
        &self,
        observation: &ObservationToEncrypt,
    ) -> Result<Option<EncryptedMessage>, CoreError> {
        if self.fail_next_observation.swap(false, Ordering::SeqCst) {
            return Err(CoreError::Encryption("주입된 관측 암호화 실패".to_string()));
        }
        self.inner.encrypt_observation(observation)
    }
}
