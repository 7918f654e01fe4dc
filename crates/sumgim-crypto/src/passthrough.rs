//! 패스스루 암호화기.
//!
//! 평문 인코딩을 그대로 암호문 자리에 싣는 테스트용 구현.
//! 정확히 왕복되므로 실제 암호화와 무관하게 배치/업로드 로직을 검증할 때 쓴다.

use prost::Message;

use sumgim_core::error::CoreError;
use sumgim_core::models::wire::{EncryptedMessage, Envelope, ObservationToEncrypt};
use sumgim_core::ports::encrypter::Encrypter;

/// 평문을 암호문처럼 싣는 암호화기
#[derive(Debug, Default)]
pub struct PassThroughEncrypter;

impl PassThroughEncrypter {
    /// 새 패스스루 암호화기 생성
    pub fn new() -> Self {
        Self
    }
}

impl Encrypter for PassThroughEncrypter {
    fn encrypt_envelope(&self, envelope: &Envelope) -> Result<Option<EncryptedMessage>, CoreError> {
        let plain = envelope.encode_to_vec();
        if plain.is_empty() {
            return Ok(None);
        }
        Ok(Some(EncryptedMessage {
            ciphertext: plain,
            contribution_id: Vec::new(),
        }))
    }

    fn encrypt_observation(
        &self,
        observation: &ObservationToEncrypt,
    ) -> Result<Option<EncryptedMessage>, CoreError> {
        let Some(inner) = &observation.observation else {
            return Ok(None);
        };
        let plain = inner.encode_to_vec();
        if plain.is_empty() {
            return Ok(None);
        }
        Ok(Some(EncryptedMessage {
            ciphertext: plain,
            contribution_id: observation.contribution_id.clone(),
        }))
    }
}
