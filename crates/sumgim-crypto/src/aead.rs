//! AEAD 암호화기.
//!
//! AES-256-GCM으로 관측/봉투를 봉인하는 실제 구현. 키 인덱스가 알려진
//! 키 집합에서 하나를 고르고, 논스는 주입된 난수 소스에서 뽑아
//! 암호문 앞에 붙인다. 키 교체/관리 정책은 이 crate 밖의 관심사다.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use prost::Message;
use std::sync::Arc;

use sumgim_core::error::CoreError;
use sumgim_core::models::wire::{EncryptedMessage, Envelope, ObservationToEncrypt};
use sumgim_core::ports::encrypter::Encrypter;
use sumgim_core::ports::random::RandomSource;

/// AES-256 키 길이 (바이트)
pub const KEY_LEN: usize = 32;

/// GCM 논스 길이 (바이트)
pub const NONCE_LEN: usize = 12;

/// AES-256-GCM 암호화기
pub struct AeadEncrypter {
    ciphers: Vec<Aes256Gcm>,
    key_index: usize,
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for AeadEncrypter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AeadEncrypter")
            .field("key_count", &self.ciphers.len())
            .field("key_index", &self.key_index)
            .finish_non_exhaustive()
    }
}

impl AeadEncrypter {
    /// 키 집합과 키 인덱스로 암호화기 생성.
    ///
    /// 인덱스가 키 집합 범위를 벗어나면 설정 에러다.
    pub fn new(
        keys: &[[u8; KEY_LEN]],
        key_index: u32,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, CoreError> {
        if keys.is_empty() {
            return Err(CoreError::Config("암호화 키 집합이 비어 있음".to_string()));
        }
        let index = key_index as usize;
        if index >= keys.len() {
            return Err(CoreError::Config(format!(
                "키 인덱스 {key_index}가 키 집합 크기 {}를 벗어남",
                keys.len()
            )));
        }

        let ciphers = keys
            .iter()
            .map(|key| Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)))
            .collect();
        Ok(Self {
            ciphers,
            key_index: index,
            random,
        })
    }

    /// 평문 봉인: nonce || ciphertext
    fn seal(&self, plain: &[u8]) -> Result<Vec<u8>, CoreError> {
        let mut nonce = [0u8; NONCE_LEN];
        self.random.fill_bytes(&mut nonce);

        let sealed = self.ciphers[self.key_index]
            .encrypt(Nonce::from_slice(&nonce), plain)
            .map_err(|e| CoreError::Encryption(format!("AES-GCM 봉인 실패: {e}")))?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    /// 봉인 해제 — 검증/테스트용
    pub fn open(&self, data: &[u8]) -> Result<Vec<u8>, CoreError> {
        if data.len() < NONCE_LEN {
            return Err(CoreError::Encryption(
                "암호문이 논스보다 짧음".to_string(),
            ));
        }
        let (nonce, sealed) = data.split_at(NONCE_LEN);
        self.ciphers[self.key_index]
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|e| CoreError::Encryption(format!("AES-GCM 해제 실패: {e}")))
    }
}

impl Encrypter for AeadEncrypter {
    fn encrypt_envelope(&self, envelope: &Envelope) -> Result<Option<EncryptedMessage>, CoreError> {
        let plain = envelope.encode_to_vec();
        if plain.is_empty() {
            return Ok(None);
        }
        Ok(Some(EncryptedMessage {
            ciphertext: self.seal(&plain)?,
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
            ciphertext: self.seal(&plain)?,
            contribution_id: observation.contribution_id.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sumgim_core::models::wire::{Environment, Observation};
    use sumgim_core::ports::random::SystemRandom;

    fn test_keys() -> Vec<[u8; KEY_LEN]> {
        vec![[0x01; KEY_LEN], [0x02; KEY_LEN]]
    }

    fn encrypter(key_index: u32) -> AeadEncrypter {
        AeadEncrypter::new(&test_keys(), key_index, Arc::new(SystemRandom::new())).unwrap()
    }

    fn sample_envelope() -> Envelope {
        Envelope {
            api_key: b"12345678".to_vec(),
            encrypted_observations: vec![],
            environment: Environment::Prod as i32,
            key_index: 1,
        }
    }

    #[test]
    fn out_of_range_key_index_fails() {
        assert_matches!(
            AeadEncrypter::new(&test_keys(), 2, Arc::new(SystemRandom::new())),
            Err(CoreError::Config(_))
        );
    }

    #[test]
    fn empty_key_set_fails() {
        assert_matches!(
            AeadEncrypter::new(&[], 0, Arc::new(SystemRandom::new())),
            Err(CoreError::Config(_))
        );
    }

    #[test]
    fn envelope_seal_open_roundtrip() {
        let encrypter = encrypter(0);
        let envelope = sample_envelope();

        let message = encrypter
            .encrypt_envelope(&envelope)
            .unwrap()
            .expect("비어 있지 않은 봉투");
        assert_ne!(message.ciphertext, envelope.encode_to_vec());

        let plain = encrypter.open(&message.ciphertext).unwrap();
        assert_eq!(Envelope::decode(plain.as_slice()).unwrap(), envelope);
    }

    #[test]
    fn empty_envelope_yields_no_value() {
        let result = encrypter(0).encrypt_envelope(&Envelope::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn contribution_id_is_preserved() {
        let to_encrypt = ObservationToEncrypt {
            observation: Some(Observation {
                random_id: vec![3; 8],
                payload: None,
            }),
            contribution_id: vec![0xEE],
        };
        let message = encrypter(0)
            .encrypt_observation(&to_encrypt)
            .unwrap()
            .expect("비어 있지 않은 관측");
        assert_eq!(message.contribution_id, vec![0xEE]);
    }

    #[test]
    fn nonces_differ_between_calls() {
        let encrypter = encrypter(0);
        let envelope = sample_envelope();
        let a = encrypter.encrypt_envelope(&envelope).unwrap().unwrap();
        let b = encrypter.encrypt_envelope(&envelope).unwrap().unwrap();
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn different_key_index_cannot_open() {
        let sealed_with_0 = encrypter(0)
            .encrypt_envelope(&sample_envelope())
            .unwrap()
            .unwrap();
        assert_matches!(
            encrypter(1).open(&sealed_with_0.ciphertext),
            Err(CoreError::Encryption(_))
        );
    }
}
