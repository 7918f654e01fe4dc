//! 리포터 설정 구조체.
//!
//! 업로드 사이클이 시작될 때 소비하는 해석 완료된 설정 스냅샷.
//! 샘플링 비율, 버퍼 한도, 암호화 키 인덱스, 환경 태그 등을 정의하며
//! JSON 파일에서 로드/저장한다. 로드 시점에 검증해 잘못된 설정은 즉시 실패한다.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::CoreError;
use crate::models::report::ReportKey;
use crate::models::wire::Environment;

/// 이벤트 버퍼 한도 설정
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BufferLimits {
    /// (지표, 리포트)당 고유 이벤트 벡터 최대 수 (0 = 무제한)
    #[serde(default = "default_max_event_vectors")]
    pub max_event_vectors: u64,
    /// 이벤트 벡터 안 레이블의 최대 길이 (바이트, 0 = 무제한)
    #[serde(default = "default_max_label_length")]
    pub max_label_length: usize,
    /// 이벤트 코드의 최대 크기 (0 = 무제한)
    #[serde(default)]
    pub max_value: u32,
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            max_event_vectors: default_max_event_vectors(),
            max_label_length: default_max_label_length(),
            max_value: 0,
        }
    }
}

/// 프라이버시(노이즈) 설정
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PrivacyOptions {
    /// 노이즈 주입 판단 기준이 되는 소량 버킷 임계값.
    /// 이 값 미만의 실제 카운트를 가진 버킷이 조작 관측 후보가 된다.
    #[serde(default = "default_low_count_threshold")]
    pub low_count_threshold: u64,
}

impl Default for PrivacyOptions {
    fn default() -> Self {
        Self {
            low_count_threshold: default_low_count_threshold(),
        }
    }
}

/// 리포터 설정 — 한 업로드 사이클의 설정 스냅샷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// 업로드 API 키
    pub api_key: String,
    /// 업로드 환경 태그
    #[serde(default)]
    pub environment: Environment,
    /// 암호화 공개키 인덱스
    #[serde(default)]
    pub key_index: u32,
    /// 리포터 활성화 여부. 꺼져 있으면 사이클이 아무 것도 하지 않는다.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 지표별 로그 샘플링 비율 (없는 지표는 1.0으로 동작)
    #[serde(default)]
    pub sampling_rates: HashMap<u32, f64>,
    /// 이벤트 버퍼 한도
    #[serde(default)]
    pub buffer: BufferLimits,
    /// 프라이버시(노이즈) 설정
    #[serde(default)]
    pub privacy: PrivacyOptions,
    /// 업로드 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// 사이클에서 제외할 리포트 목록 (드레인 후 버림)
    #[serde(default)]
    pub ignored_reports: Vec<ReportKey>,
}

impl ReporterConfig {
    /// API 키만 지정한 기본 설정
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            environment: Environment::Dev,
            key_index: 0,
            enabled: true,
            sampling_rates: HashMap::new(),
            buffer: BufferLimits::default(),
            privacy: PrivacyOptions::default(),
            request_timeout_ms: default_request_timeout_ms(),
            ignored_reports: Vec::new(),
        }
    }

    /// 설정 검증.
    ///
    /// 샘플링 비율이 [0,1] 밖이거나 유한하지 않으면, API 키가 비어 있으면
    /// 설정 에러다. 샘플링 비율의 *부재*는 에러가 아니다 (1.0으로 동작).
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_key.is_empty() {
            return Err(CoreError::Config("api_key가 비어 있음".to_string()));
        }
        for (metric_id, rate) in &self.sampling_rates {
            if !rate.is_finite() || !(0.0..=1.0).contains(rate) {
                return Err(CoreError::Config(format!(
                    "지표 {metric_id}의 샘플링 비율 {rate}은 [0,1] 범위의 유한값이어야 함"
                )));
            }
        }
        Ok(())
    }

    /// 지표의 샘플링 비율 (설정이 없으면 None)
    pub fn sampling_rate(&self, metric_id: u32) -> Option<f64> {
        self.sampling_rates.get(&metric_id).copied()
    }

    /// 업로드 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// JSON 파일에서 설정 로드 및 검증
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        info!("리포터 설정 로드: {}", path.display());
        Ok(config)
    }

    /// 설정을 JSON 파일로 저장
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_max_event_vectors() -> u64 {
    100
}

fn default_max_label_length() -> usize {
    64
}

fn default_low_count_threshold() -> u64 {
    10
}

fn default_request_timeout_ms() -> u64 {
    30_000
}
