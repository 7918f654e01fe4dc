//! 와이어 포맷 메시지.
//!
//! 서버와 공유하는 Protobuf 메시지를 prost 생성 코드 스타일로 수동 관리한다.
//! 기본값 메시지는 0바이트로 인코딩된다 — 암호화기의 "빈 입력 → 출력 없음"
//! 판정이 이 성질에 의존한다.

use serde::{Deserialize, Serialize};

/// (이벤트 코드 시퀀스, 값) 쌍 하나
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IntegerEventValue {
    /// 이벤트 코드 시퀀스
    #[prost(uint32, repeated, tag = "1")]
    pub event_codes: Vec<u32>,
    /// 집계값
    #[prost(sint64, tag = "2")]
    pub value: i64,
}

/// 정수 관측 — 하나 이상의 (이벤트 코드, 값) 쌍
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IntegerObservation {
    /// 관측에 포함된 값 목록
    #[prost(message, repeated, tag = "1")]
    pub values: Vec<IntegerEventValue>,
}

/// 관측 레코드 — 랜덤 식별자 + 타입별 페이로드
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Observation {
    /// 관측별 랜덤 식별자 (빌더 호출자가 주입)
    #[prost(bytes = "vec", tag = "1")]
    pub random_id: Vec<u8>,
    /// 타입별 페이로드
    #[prost(oneof = "observation::Payload", tags = "2")]
    pub payload: Option<observation::Payload>,
}

/// `Observation`의 oneof 페이로드 정의
pub mod observation {
    /// 관측 페이로드
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        /// 정수 관측
        #[prost(message, tag = "2")]
        Integer(super::IntegerObservation),
    }
}

/// 암호화 입력 — 관측과 서버 정산용 기여 ID.
/// 기여 ID는 암호화기가 아니라 호출자가 부여하며, 노이즈 관측에는 붙지 않는다.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ObservationToEncrypt {
    /// 암호화할 관측
    #[prost(message, optional, tag = "1")]
    pub observation: Option<Observation>,
    /// 기여 ID (실제 관측에만 존재)
    #[prost(bytes = "vec", tag = "2")]
    pub contribution_id: Vec<u8>,
}

/// 암호화 결과 — 암호문과 평문에서 넘겨받은 기여 ID
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EncryptedMessage {
    /// 암호문
    #[prost(bytes = "vec", tag = "1")]
    pub ciphertext: Vec<u8>,
    /// 기여 ID (입력에서 변경 없이 전달)
    #[prost(bytes = "vec", tag = "2")]
    pub contribution_id: Vec<u8>,
}

/// 업로드 환경 구분
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    ::prost::Enumeration,
    Serialize,
    Deserialize,
)]
#[repr(i32)]
pub enum Environment {
    /// 개발 환경
    Dev = 0,
    /// 운영 환경
    Prod = 1,
}

/// 업로드 봉투 — 한 사이클에서 암호화된 관측 묶음.
/// 사이클마다 새로 만들고, 전송에 넘긴 뒤에는 변경하지 않는다.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Envelope {
    /// API 키
    #[prost(bytes = "vec", tag = "1")]
    pub api_key: Vec<u8>,
    /// 암호화된 관측 목록 (수신 순서 유지)
    #[prost(message, repeated, tag = "2")]
    pub encrypted_observations: Vec<EncryptedMessage>,
    /// 업로드 환경
    #[prost(enumeration = "Environment", tag = "3")]
    pub environment: i32,
    /// 공개키 인덱스
    #[prost(uint32, tag = "4")]
    pub key_index: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn default_messages_encode_to_zero_bytes() {
        assert_eq!(Observation::default().encoded_len(), 0);
        assert_eq!(Envelope::default().encoded_len(), 0);
        assert_eq!(ObservationToEncrypt::default().encoded_len(), 0);
    }

    #[test]
    fn envelope_roundtrip() {
        let envelope = Envelope {
            api_key: b"12345678".to_vec(),
            encrypted_observations: vec![EncryptedMessage {
                ciphertext: vec![1, 2, 3],
                contribution_id: vec![9],
            }],
            environment: Environment::Prod as i32,
            key_index: 3,
        };
        let bytes = envelope.encode_to_vec();
        assert!(!bytes.is_empty());

        let decoded = Envelope::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, envelope);
        assert_eq!(decoded.environment(), Environment::Prod);
    }

    #[test]
    fn unknown_environment_falls_back_to_dev() {
        let envelope = Envelope {
            environment: 99,
            ..Envelope::default()
        };
        assert_eq!(envelope.environment(), Environment::Dev);
    }
}
