//! 이벤트 버퍼.
//!
//! (지표, 리포트)별로 (이벤트 벡터 → 누적 카운트)를 담는 유계 컬렉션.
//! 한도 초과는 조용한 절단이 아니라 명시적 `RecordOutcome`으로 드러나고,
//! 거부된 호출마다 해당 운영 카운터가 정확히 한 번 증가한다.
//!
//! 기록 경로는 키별 짧은 임계 구역이라 여러 스레드에서 동시에 불러도 되고,
//! `drain`은 키 단위의 원자적 take다.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use sumgim_core::config::BufferLimits;
use sumgim_core::error::CoreError;
use sumgim_core::models::event::{BufferedEntry, EventCode, EventVector};
use sumgim_core::models::report::ReportKey;
use sumgim_core::oplog::{ExceededCounterKind, OperationLogger};
use sumgim_core::ports::store::EntryStore;

/// 기록 호출의 결과 상태값.
///
/// 용량/검증 실패는 에러가 아니다 — 이벤트 하나가 버려지고 카운터가
/// 증가할 뿐, 기록 호출자에게 예외가 전파되지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// 엔트리에 반영됨
    Accepted,
    /// 고유 이벤트 벡터 수 한도 초과로 버려짐
    DroppedEventVectorCapacity,
    /// 레이블 길이 한도 초과로 버려짐
    DroppedLabelLength,
    /// 이벤트 코드 크기 한도 초과로 버려짐
    DroppedValueLimit,
}

type Entries = HashMap<EventVector, u64>;

/// 인메모리 이벤트 버퍼 — `EntryStore` 포트 구현
pub struct EventBuffer {
    limits: BufferLimits,
    oplog: Arc<OperationLogger>,
    shards: RwLock<HashMap<ReportKey, Arc<Mutex<Entries>>>>,
}

impl EventBuffer {
    /// 한도와 운영 카운터로 버퍼 생성
    pub fn new(limits: BufferLimits, oplog: Arc<OperationLogger>) -> Self {
        Self {
            limits,
            oplog,
            shards: RwLock::new(HashMap::new()),
        }
    }

    /// 이벤트 벡터의 누적 카운트를 `increment`만큼 올린다.
    ///
    /// 검증 순서: 레이블 길이 → 코드 크기 → 고유 벡터 용량.
    /// 한 호출은 최대 한 종류의 카운터만 증가시킨다.
    /// 카운트는 saturating add로 누적된다 (u64::MAX에서 멈춤).
    pub fn record(
        &self,
        key: ReportKey,
        event_vector: &EventVector,
        increment: u64,
    ) -> RecordOutcome {
        let (metric_id, report_id) = key.metric_report();

        if let Some(outcome) = self.check_dimensions(event_vector) {
            let kind = match outcome {
                RecordOutcome::DroppedLabelLength => ExceededCounterKind::StringBuffer,
                _ => ExceededCounterKind::MaxValue,
            };
            self.oplog.log_buffer_exceeded(kind, metric_id, report_id);
            warn!("리포트 {key}: 이벤트 벡터 {event_vector} 검증 실패로 버림 ({outcome:?})");
            return outcome;
        }

        let shard = self.shard(key);
        let mut entries = shard.lock();
        if let Some(count) = entries.get_mut(event_vector) {
            *count = count.saturating_add(increment);
            return RecordOutcome::Accepted;
        }

        if self.limits.max_event_vectors > 0
            && entries.len() as u64 >= self.limits.max_event_vectors
        {
            drop(entries);
            self.oplog.log_buffer_exceeded(
                ExceededCounterKind::EventVectorBuffer,
                metric_id,
                report_id,
            );
            warn!(
                "리포트 {key}: 고유 이벤트 벡터 한도 {} 초과로 버림",
                self.limits.max_event_vectors
            );
            return RecordOutcome::DroppedEventVectorCapacity;
        }

        entries.insert(event_vector.clone(), increment);
        RecordOutcome::Accepted
    }

    /// 키의 현재 고유 이벤트 벡터 수
    pub fn entry_count(&self, key: &ReportKey) -> usize {
        let shards = self.shards.read();
        shards.get(key).map(|s| s.lock().len()).unwrap_or(0)
    }

    /// 레이블 길이/코드 크기 검증. 한도 0은 무제한.
    fn check_dimensions(&self, event_vector: &EventVector) -> Option<RecordOutcome> {
        for dim in event_vector.dims() {
            match dim {
                EventCode::Label(label) => {
                    if self.limits.max_label_length > 0 && label.len() > self.limits.max_label_length
                    {
                        return Some(RecordOutcome::DroppedLabelLength);
                    }
                }
                EventCode::Index(code) => {
                    if self.limits.max_value > 0 && *code > self.limits.max_value {
                        return Some(RecordOutcome::DroppedValueLimit);
                    }
                }
            }
        }
        None
    }

    fn shard(&self, key: ReportKey) -> Arc<Mutex<Entries>> {
        {
            let shards = self.shards.read();
            if let Some(existing) = shards.get(&key) {
                return Arc::clone(existing);
            }
        }
        let mut shards = self.shards.write();
        Arc::clone(shards.entry(key).or_default())
    }
}

#[async_trait]
impl EntryStore for EventBuffer {
    async fn occupied_keys(&self) -> Result<Vec<ReportKey>, CoreError> {
        let shards = self.shards.read();
        Ok(shards
            .iter()
            .filter(|(_, s)| !s.lock().is_empty())
            .map(|(key, _)| *key)
            .collect())
    }

    async fn drain(&self, key: &ReportKey) -> Result<Vec<BufferedEntry>, CoreError> {
        let shard = {
            let shards = self.shards.read();
            match shards.get(key) {
                Some(existing) => Arc::clone(existing),
                None => return Ok(Vec::new()),
            }
        };
        let taken = std::mem::take(&mut *shard.lock());
        Ok(taken
            .into_iter()
            .map(|(event_vector, count)| BufferedEntry {
                event_vector,
                count,
            })
            .collect())
    }
}
