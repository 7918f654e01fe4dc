//! 관측 빌더.
//!
//! 버퍼에서 드레인된 (이벤트 벡터, 카운트) 쌍을 타입 있는 관측 레코드로
//! 바꾼다. 순수 함수다 — 랜덤 ID는 항상 호출자가 주입하므로 같은 입력이면
//! 바이트 단위로 같은 출력이 나온다. 업로드 경로의 무작위성은
//! `RandomSource` 한 곳에 모인다.

use sumgim_core::models::event::EventVector;
use sumgim_core::models::wire::{
    observation::Payload, IntegerEventValue, IntegerObservation, Observation,
};
use sumgim_core::ports::random::RandomSource;

/// 관측 랜덤 ID 길이 (바이트)
pub const RANDOM_ID_LEN: usize = 8;

/// 난수 소스에서 관측/기여 ID용 바이트열 생성
pub fn new_random_id(random: &dyn RandomSource) -> Vec<u8> {
    let mut id = vec![0u8; RANDOM_ID_LEN];
    random.fill_bytes(&mut id);
    id
}

/// (이벤트 벡터, 값) 한 쌍으로 정수 관측 생성
pub fn integer_observation(event_vector: &EventVector, value: i64, random_id: Vec<u8>) -> Observation {
    Observation {
        random_id,
        payload: Some(Payload::Integer(IntegerObservation {
            values: vec![event_value(event_vector, value)],
        })),
    }
}

/// 두 쌍을 하나의 관측으로 묶는다 (배치 효율용)
pub fn integer_observation_pair(
    first: (&EventVector, i64),
    second: (&EventVector, i64),
    random_id: Vec<u8>,
) -> Observation {
    Observation {
        random_id,
        payload: Some(Payload::Integer(IntegerObservation {
            values: vec![
                event_value(first.0, first.1),
                event_value(second.0, second.1),
            ],
        })),
    }
}

fn event_value(event_vector: &EventVector, value: i64) -> IntegerEventValue {
    IntegerEventValue {
        event_codes: event_vector.wire_codes(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use sumgim_core::models::event::EventCode;
    use sumgim_core::ports::random::ConstantRandom;

    #[test]
    fn identical_inputs_yield_identical_bytes() {
        let vector = EventVector::from_codes(&[1, 5]);
        let a = integer_observation(&vector, 3, vec![1; RANDOM_ID_LEN]);
        let b = integer_observation(&vector, 3, vec![1; RANDOM_ID_LEN]);
        assert_eq!(a.encode_to_vec(), b.encode_to_vec());
    }

    #[test]
    fn single_entry_observation() {
        let vector = EventVector::from_codes(&[2, 6]);
        let observation = integer_observation(&vector, 4, vec![9; RANDOM_ID_LEN]);

        assert_eq!(observation.random_id, vec![9; RANDOM_ID_LEN]);
        let Some(Payload::Integer(integer)) = observation.payload else {
            panic!("정수 페이로드가 아님");
        };
        assert_eq!(integer.values.len(), 1);
        assert_eq!(integer.values[0].event_codes, vec![2, 6]);
        assert_eq!(integer.values[0].value, 4);
    }

    #[test]
    fn pair_observation_packs_two_values() {
        let v1 = EventVector::from_codes(&[1]);
        let v2 = EventVector::from_codes(&[2]);
        let observation = integer_observation_pair((&v1, 10), (&v2, 20), vec![0; RANDOM_ID_LEN]);

        let Some(Payload::Integer(integer)) = observation.payload else {
            panic!("정수 페이로드가 아님");
        };
        assert_eq!(integer.values.len(), 2);
        assert_eq!(integer.values[0].value, 10);
        assert_eq!(integer.values[1].value, 20);
    }

    #[test]
    fn label_dimension_encodes_to_stable_code() {
        let vector = EventVector::new(vec![EventCode::Label("browser".to_string())]);
        let a = integer_observation(&vector, 1, vec![0; RANDOM_ID_LEN]);
        let b = integer_observation(&vector, 1, vec![0; RANDOM_ID_LEN]);
        assert_eq!(a.encode_to_vec(), b.encode_to_vec());
    }

    #[test]
    fn random_id_comes_from_injected_source() {
        let random = ConstantRandom::new(0.0, 0x11);
        let id = new_random_id(&random);
        assert_eq!(id, vec![0x11; RANDOM_ID_LEN]);
    }
}
