//! # sumgim-crypto
//!
//! `Encrypter` 포트 구현.
//!
//! ## 모듈
//! - `passthrough`: 평문 왕복 구현 (배치/업로드 로직 검증용)
//! - `faulty`: 다음 호출을 실패시킬 수 있는 구현 (에러 전파 검증용)
//! - `aead`: AES-256-GCM 실제 구현 (키 인덱스로 키 선택)

pub mod aead;
pub mod faulty;
pub mod passthrough;

pub use aead::AeadEncrypter;
pub use faulty::FaultyEncrypter;
pub use passthrough::PassThroughEncrypter;
