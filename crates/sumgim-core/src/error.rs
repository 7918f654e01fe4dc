//! SUMGIM 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 에러 대신 `CoreError`를 그대로 반환한다.
//! 기록 경로(record)의 용량 초과는 에러가 아니라 `RecordOutcome` 상태값으로
//! 처리한다 — 애플리케이션 코드에 예외가 전파되지 않는다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 설정, 유효성 검증, 암호화, 전송 등 파이프라인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 와이어 메시지 디코딩 실패
    #[error("와이어 디코딩 에러: {0}")]
    WireDecode(#[from] prost::DecodeError),

    /// 설정값 오류 (잘못된 샘플링 비율, 레지스트리 불일치 등)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 암호화 실패 (관측 단위는 복구 가능, 봉투 단위는 사이클 중단)
    #[error("암호화 에러: {0}")]
    Encryption(String),

    /// 전송 실패 (연결 실패, 서버 거부)
    #[error("전송 에러: {0}")]
    Network(String),

    /// 업로드 타임아웃
    #[error("업로드 타임아웃: {timeout_ms}ms 초과")]
    UploadTimeout {
        /// 초과된 타임아웃 시간 (밀리초)
        timeout_ms: u64,
    },

    /// 업로드 사이클이 이미 진행 중 (동시 실행 거부)
    #[error("업로드 사이클이 이미 진행 중")]
    CycleInFlight,

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}
