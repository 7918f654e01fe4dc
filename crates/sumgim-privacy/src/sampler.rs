//! 로그 샘플러.
//!
//! 지표별로 "이 이벤트를 기록할 것인가"를 확률적으로 결정한다.
//! 설정이 없는 지표는 항상 기록한다 — 설정 배관 문제로 텔레메트리가
//! 조용히 사라지는 것보다 열어 두는 쪽을 택한 의도적 정책이다.

use std::collections::HashMap;
use std::sync::Arc;

use sumgim_core::config::ReporterConfig;
use sumgim_core::error::CoreError;
use sumgim_core::ports::random::RandomSource;

/// 샘플링 비율 설정값.
///
/// [0,1] 밖의 비율은 생성 시점 에러다 — 클램핑하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig {
    rate: f64,
}

impl SampleConfig {
    /// 비율 검증 후 생성
    pub fn new(rate: f64) -> Result<Self, CoreError> {
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(CoreError::Config(format!(
                "샘플링 비율 {rate}은 [0,1] 범위의 유한값이어야 함"
            )));
        }
        Ok(Self { rate })
    }

    /// 항상 기록 (비율 1.0)
    pub fn always() -> Self {
        Self { rate: 1.0 }
    }

    /// 샘플링 비율
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// 지표별 로그 샘플러
pub struct LogSampler {
    rates: HashMap<u32, SampleConfig>,
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for LogSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSampler")
            .field("rates", &self.rates)
            .finish_non_exhaustive()
    }
}

impl LogSampler {
    /// 지표별 비율 맵으로 샘플러 생성
    pub fn new(rates: HashMap<u32, SampleConfig>, random: Arc<dyn RandomSource>) -> Self {
        Self { rates, random }
    }

    /// 리포터 설정에서 샘플러 구성. 잘못된 비율은 여기서 즉시 실패한다.
    pub fn from_config(
        config: &ReporterConfig,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, CoreError> {
        let mut rates = HashMap::new();
        for (metric_id, rate) in &config.sampling_rates {
            rates.insert(*metric_id, SampleConfig::new(*rate)?);
        }
        Ok(Self::new(rates, random))
    }

    /// 지표의 이벤트를 기록할지 결정.
    ///
    /// 추첨은 항상 수행한다 (비율 0/1도 특별 취급하지 않는다 — 결정적
    /// 난수 소스를 쓰는 테스트의 추첨 수가 일정하게 유지된다).
    /// 설정이 없는 지표는 비율 1.0으로 동작한다.
    pub fn should_log(&self, metric_id: u32) -> bool {
        let draw = self.random.next_f64();
        let rate = self
            .rates
            .get(&metric_id)
            .map(SampleConfig::rate)
            .unwrap_or(1.0);
        draw < rate
    }
}
