//! 운영 카운터.
//!
//! 버퍼 한도 초과와 업로드 성공/실패를 (지표, 리포트) 단위로 집계한다.
//! 여러 기록 지점에서 동시에 증가시키고 업로드 코디네이터가 읽는다 —
//! 원자 카운터 기반이라 호출자 쪽 락이 필요 없다. 카운터 간 읽기 일관성은
//! 보장하지 않는다 (운영 대시보드용이지 정산용이 아니다).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// 버퍼 한도 초과 카운터 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceededCounterKind {
    /// 레이블 길이 한도 초과
    StringBuffer,
    /// 고유 이벤트 벡터 수 한도 초과
    EventVectorBuffer,
    /// 이벤트 코드 크기 한도 초과
    MaxValue,
}

#[derive(Debug, Default)]
struct BufferExceededCounts {
    string_buffer: AtomicU64,
    event_vector_buffer: AtomicU64,
    max_value: AtomicU64,
}

impl BufferExceededCounts {
    fn cell(&self, kind: ExceededCounterKind) -> &AtomicU64 {
        match kind {
            ExceededCounterKind::StringBuffer => &self.string_buffer,
            ExceededCounterKind::EventVectorBuffer => &self.event_vector_buffer,
            ExceededCounterKind::MaxValue => &self.max_value,
        }
    }
}

/// 운영 카운터 로거.
///
/// 프로세스 수명 동안 단조 증가한다. 리셋은 테스트/디버그 전용 동작이며
/// 프로덕션 코드 경로에서는 호출하지 않는다.
#[derive(Debug, Default)]
pub struct OperationLogger {
    buffer_counts: RwLock<HashMap<(u32, u32), Arc<BufferExceededCounts>>>,
    upload_success: AtomicU64,
    upload_failure: AtomicU64,
}

impl OperationLogger {
    /// 새 운영 카운터 로거 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// (지표, 리포트)의 한도 초과 카운터 1 증가
    pub fn log_buffer_exceeded(&self, kind: ExceededCounterKind, metric_id: u32, report_id: u32) {
        self.counts_for(metric_id, report_id)
            .cell(kind)
            .fetch_add(1, Ordering::Relaxed);
    }

    /// (지표, 리포트)의 한도 초과 카운터 현재값. 기록된 적 없으면 0.
    pub fn buffer_exceeded_count(
        &self,
        kind: ExceededCounterKind,
        metric_id: u32,
        report_id: u32,
    ) -> u64 {
        let counts = self.buffer_counts.read().unwrap();
        counts
            .get(&(metric_id, report_id))
            .map(|c| c.cell(kind).load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// 업로드 성공 1 증가
    pub fn log_upload_success(&self) {
        self.upload_success.fetch_add(1, Ordering::Relaxed);
    }

    /// 업로드 실패 1 증가
    pub fn log_upload_failure(&self) {
        self.upload_failure.fetch_add(1, Ordering::Relaxed);
    }

    /// 업로드 성공 횟수
    pub fn upload_success_count(&self) -> u64 {
        self.upload_success.load(Ordering::Relaxed)
    }

    /// 업로드 실패 횟수
    pub fn upload_failure_count(&self) -> u64 {
        self.upload_failure.load(Ordering::Relaxed)
    }

    /// 모든 카운터 초기화 — 테스트/디버그 전용
    pub fn reset(&self) {
        self.buffer_counts.write().unwrap().clear();
        self.upload_success.store(0, Ordering::Relaxed);
        self.upload_failure.store(0, Ordering::Relaxed);
    }

    fn counts_for(&self, metric_id: u32, report_id: u32) -> Arc<BufferExceededCounts> {
        {
            let counts = self.buffer_counts.read().unwrap();
            if let Some(existing) = counts.get(&(metric_id, report_id)) {
                return Arc::clone(existing);
            }
        }
        let mut counts = self.buffer_counts.write().unwrap();
        Arc::clone(counts.entry((metric_id, report_id)).or_default())
    }
}
