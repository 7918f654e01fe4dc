//! 리포트 식별 키.
//!
//! (고객, 프로젝트, 지표, 리포트) 4-튜플이 파이프라인 전역의 조회 키다.
//! 생성 시점에는 타입 외 검증이 없다 — 유효성은 레지스트리 조회에서 판정한다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 리포트 식별 키 — (customer, project, metric, report)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportKey {
    /// 고객 ID
    pub customer_id: u32,
    /// 프로젝트 ID
    pub project_id: u32,
    /// 지표 ID
    pub metric_id: u32,
    /// 리포트 ID
    pub report_id: u32,
}

impl ReportKey {
    /// 새 리포트 키 생성
    pub fn new(customer_id: u32, project_id: u32, metric_id: u32, report_id: u32) -> Self {
        Self {
            customer_id,
            project_id,
            metric_id,
            report_id,
        }
    }

    /// 운영 카운터 키로 쓰이는 (지표, 리포트) 쌍
    pub fn metric_report(&self) -> (u32, u32) {
        (self.metric_id, self.report_id)
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.customer_id, self.project_id, self.metric_id, self.report_id
        )
    }
}
