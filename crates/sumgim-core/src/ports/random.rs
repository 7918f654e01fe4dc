//! 난수 소스 포트.
//!
//! 샘플링 추첨, 노이즈 추첨, 관측 랜덤 ID가 모두 이 포트를 통해 난수를
//! 얻는다. 업로드 경로의 무작위성을 한 곳에 모아 테스트에서 결정적 소스로
//! 치환할 수 있게 한다.

use rand::{Rng, RngExt};
use std::collections::VecDeque;
use std::sync::Mutex;

/// 주입 가능한 난수 소스
pub trait RandomSource: Send + Sync {
    /// [0, 1) 구간의 f64 하나
    fn next_f64(&self) -> f64;

    /// 버퍼를 난수 바이트로 채움
    fn fill_bytes(&self, buf: &mut [u8]);
}

/// OS 난수 기반 기본 구현
#[derive(Debug, Default)]
pub struct SystemRandom;

impl SystemRandom {
    /// 새 시스템 난수 소스 생성
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for SystemRandom {
    fn next_f64(&self) -> f64 {
        rand::rng().random::<f64>()
    }

    fn fill_bytes(&self, buf: &mut [u8]) {
        rand::rng().fill_bytes(buf);
    }
}

/// 테스트용 고정 난수 소스 — 항상 같은 값을 돌려준다
#[derive(Debug)]
pub struct ConstantRandom {
    value: f64,
    byte: u8,
}

impl ConstantRandom {
    /// 추첨값과 채움 바이트를 고정한 소스 생성
    pub fn new(value: f64, byte: u8) -> Self {
        Self { value, byte }
    }
}

impl RandomSource for ConstantRandom {
    fn next_f64(&self) -> f64 {
        self.value
    }

    fn fill_bytes(&self, buf: &mut [u8]) {
        buf.fill(self.byte);
    }
}

/// 테스트용 수열 난수 소스 — 주어진 수열을 순환하며 돌려준다
#[derive(Debug)]
pub struct SequenceRandom {
    values: Mutex<VecDeque<f64>>,
    byte: u8,
}

impl SequenceRandom {
    /// 추첨값 수열과 채움 바이트로 소스 생성.
    /// 수열이 비어 있으면 `next_f64`는 0.0을 돌려준다.
    pub fn new(values: &[f64], byte: u8) -> Self {
        Self {
            values: Mutex::new(values.iter().copied().collect()),
            byte,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&self) -> f64 {
        let mut values = self.values.lock().unwrap();
        match values.pop_front() {
            Some(value) => {
                values.push_back(value);
                value
            }
            None => 0.0,
        }
    }

    fn fill_bytes(&self, buf: &mut [u8]) {
        buf.fill(self.byte);
    }
}
