//! 이벤트 벡터 모델.
//!
//! 이벤트 벡터는 차원값의 순서 있는 튜플이다. 차원값은 작은 숫자 코드이거나
//! 문자열 레이블이다. 동등성은 차원 시퀀스의 요소별 비교로 판정한다.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// 이벤트 벡터의 차원값 하나
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventCode {
    /// 숫자 이벤트 코드
    Index(u32),
    /// 문자열 레이블 (와이어 인코딩 시 해시 코드로 축약)
    Label(String),
}

impl EventCode {
    /// 와이어 포맷용 u32 코드.
    ///
    /// 레이블은 SHA-256 다이제스트 앞 4바이트를 big-endian u32로 읽는다.
    /// 같은 레이블은 항상 같은 코드가 된다.
    pub fn wire_code(&self) -> u32 {
        match self {
            EventCode::Index(code) => *code,
            EventCode::Label(label) => {
                let digest = Sha256::digest(label.as_bytes());
                u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
            }
        }
    }
}

/// 이벤트 벡터 — 한 번의 이벤트 발생을 식별하는 차원값 튜플.
/// 생성 후 불변.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventVector {
    dims: Vec<EventCode>,
}

impl EventVector {
    /// 차원값 목록으로 이벤트 벡터 생성
    pub fn new(dims: Vec<EventCode>) -> Self {
        Self { dims }
    }

    /// 숫자 코드만으로 이벤트 벡터 생성
    pub fn from_codes(codes: &[u32]) -> Self {
        Self {
            dims: codes.iter().copied().map(EventCode::Index).collect(),
        }
    }

    /// 차원값 목록
    pub fn dims(&self) -> &[EventCode] {
        &self.dims
    }

    /// 와이어 포맷용 코드 시퀀스 (레이블은 해시 코드로 축약)
    pub fn wire_codes(&self) -> Vec<u32> {
        self.dims.iter().map(EventCode::wire_code).collect()
    }
}

impl fmt::Display for EventVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match dim {
                EventCode::Index(code) => write!(f, "{code}")?,
                EventCode::Label(label) => write!(f, "{label:?}")?,
            }
        }
        write!(f, "]")
    }
}

/// 버퍼에서 드레인된 (이벤트 벡터, 누적 카운트) 엔트리
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedEntry {
    /// 이벤트 벡터
    pub event_vector: EventVector,
    /// 누적 카운트
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_elementwise() {
        let a = EventVector::from_codes(&[1, 5]);
        let b = EventVector::from_codes(&[1, 5]);
        let c = EventVector::from_codes(&[5, 1]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn label_wire_code_is_stable() {
        let first = EventCode::Label("browser".to_string()).wire_code();
        let second = EventCode::Label("browser".to_string()).wire_code();
        assert_eq!(first, second);
        assert_ne!(first, EventCode::Label("editor".to_string()).wire_code());
    }

    #[test]
    fn mixed_vector_wire_codes() {
        let vector = EventVector::new(vec![
            EventCode::Index(3),
            EventCode::Label("ko-KR".to_string()),
        ]);
        let codes = vector.wire_codes();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0], 3);
    }
}
