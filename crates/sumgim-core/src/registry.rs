//! 지표/리포트 레지스트리.
//!
//! 어떤 (고객, 프로젝트, 지표, 리포트) 식별자가 유효한지, 각 리포트가 어떤
//! 프라이버시 메커니즘을 쓰는지를 담는 순수 데이터 모델. 생성 후 읽기 전용이라
//! 동기화가 필요 없다.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::report::ReportKey;

/// 리포트의 프라이버시 메커니즘
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum PrivacyMechanism {
    /// 비식별화만 수행 (노이즈 없음)
    #[default]
    DeIdentification,
    /// 셔플 기반 차등 프라이버시 — 소량 버킷에 노이즈 관측 주입
    ShuffledDp {
        /// 노이즈 추첨의 포아송 평균
        poisson_mean: f64,
    },
}

/// 리포트 정의
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDefinition {
    /// 리포트 ID
    pub id: u32,
    /// 프라이버시 메커니즘
    #[serde(default)]
    pub privacy_mechanism: PrivacyMechanism,
}

/// 지표 정의
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// 지표 ID
    pub id: u32,
    /// 지표에 속한 리포트 목록
    #[serde(default)]
    pub reports: Vec<ReportDefinition>,
}

/// 프로젝트 — 한 (고객, 프로젝트) 쌍의 지표/리포트 레지스트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// 고객 ID
    pub customer_id: u32,
    /// 프로젝트 ID
    pub project_id: u32,
    /// 지표 정의 목록
    #[serde(default)]
    pub metrics: Vec<MetricDefinition>,
}

impl Project {
    /// 레지스트리에서 (고객, 프로젝트) 쌍으로 프로젝트 조회.
    ///
    /// 일치하는 프로젝트가 정확히 하나일 때만 성공한다. 0개 또는 2개 이상이면
    /// 설정 에러로 즉시 실패한다 — 추측해서 고르지 않는다.
    pub fn lookup(
        projects: &[Project],
        customer_id: u32,
        project_id: u32,
    ) -> Result<Project, CoreError> {
        let mut matches = projects
            .iter()
            .filter(|p| p.customer_id == customer_id && p.project_id == project_id);

        let Some(found) = matches.next() else {
            return Err(CoreError::Config(format!(
                "레지스트리에서 프로젝트 미발견: customer={customer_id}, project={project_id}"
            )));
        };
        if matches.next().is_some() {
            return Err(CoreError::Config(format!(
                "레지스트리에 중복 프로젝트: customer={customer_id}, project={project_id}"
            )));
        }

        found.validate()?;
        Ok(found.clone())
    }

    /// 레지스트리 정의 검증.
    ///
    /// 지표 안의 리포트 ID 중복, 양수가 아닌 포아송 평균은 설정 에러다.
    pub fn validate(&self) -> Result<(), CoreError> {
        for metric in &self.metrics {
            let mut seen = std::collections::HashSet::new();
            for report in &metric.reports {
                if !seen.insert(report.id) {
                    return Err(CoreError::Config(format!(
                        "지표 {}에 중복 리포트 ID {}",
                        metric.id, report.id
                    )));
                }
                if let PrivacyMechanism::ShuffledDp { poisson_mean } = report.privacy_mechanism {
                    if !(poisson_mean > 0.0) || !poisson_mean.is_finite() {
                        return Err(CoreError::Config(format!(
                            "지표 {} 리포트 {}: poisson_mean은 양의 유한값이어야 함 (현재 {poisson_mean})",
                            metric.id, report.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// 지표 ID로 지표 정의 조회
    pub fn metric(&self, metric_id: u32) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|m| m.id == metric_id)
    }

    /// 리포트 키로 리포트 정의 조회.
    /// 고객/프로젝트 ID가 이 프로젝트와 다르면 None.
    pub fn report(&self, key: &ReportKey) -> Option<&ReportDefinition> {
        if key.customer_id != self.customer_id || key.project_id != self.project_id {
            return None;
        }
        self.metric(key.metric_id)?
            .reports
            .iter()
            .find(|r| r.id == key.report_id)
    }

    /// 이 프로젝트의 전체 리포트 키 목록
    pub fn report_keys(&self) -> Vec<ReportKey> {
        self.metrics
            .iter()
            .flat_map(|m| {
                m.reports
                    .iter()
                    .map(|r| ReportKey::new(self.customer_id, self.project_id, m.id, r.id))
            })
            .collect()
    }
}
