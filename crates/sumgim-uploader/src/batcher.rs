//! 봉투 배처.
//!
//! 한 업로드 사이클의 암호화된 관측을 봉투 하나로 묶는다.
//! 재정렬/중복 제거/병합 없이 받은 순서대로 덧붙이는 O(n) 조립이며 I/O가 없다.

use sumgim_core::models::wire::{EncryptedMessage, Envelope, Environment};

/// 암호화된 관측 목록으로 봉투 조립
pub fn assemble_envelope(
    api_key: &[u8],
    environment: Environment,
    key_index: u32,
    messages: Vec<EncryptedMessage>,
) -> Envelope {
    Envelope {
        api_key: api_key.to_vec(),
        encrypted_observations: messages,
        environment: environment as i32,
        key_index,
    }
}
