//! 업로드 코디네이터.
//!
//! 한 번의 업로드 사이클을 끝까지 몰고 가는 상태 기계:
//! 드레인 → 샘플링 → 인코딩 → 암호화 → 배치 → 전송 → 성공/실패 기록.
//! 사이클은 동시에 하나만 돈다 (Idle 가드). 관측 하나의 암호화 실패는
//! 그 관측만 제외하고 계속하지만, 봉투 암호화 실패는 사이클 전체 실패다.
//! 실패한 사이클의 데이터는 버린다 — 재시도는 외부 스케줄러가 다음 주기에
//! 코디네이터를 다시 부르는 것으로 이뤄진다.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sumgim_core::config::ReporterConfig;
use sumgim_core::error::CoreError;
use sumgim_core::models::event::{BufferedEntry, EventVector};
use sumgim_core::models::report::ReportKey;
use sumgim_core::models::wire::{EncryptedMessage, ObservationToEncrypt};
use sumgim_core::oplog::OperationLogger;
use sumgim_core::ports::encrypter::Encrypter;
use sumgim_core::ports::random::RandomSource;
use sumgim_core::ports::store::EntryStore;
use sumgim_core::ports::transport::Transport;
use sumgim_core::registry::{PrivacyMechanism, Project};
use sumgim_privacy::observations::{integer_observation, integer_observation_pair, new_random_id};
use sumgim_privacy::{LogSampler, NoiseGenerator};

use crate::batcher::assemble_envelope;

/// 업로드 사이클 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// 사이클 없음
    Idle,
    /// 버퍼 드레인 중
    Draining,
    /// 로그 샘플링/노이즈 선별 중
    Sampling,
    /// 관측 인코딩 중
    Encoding,
    /// 관측 암호화 중
    Encrypting,
    /// 봉투 조립 중
    Batching,
    /// 전송 중
    Uploading,
    /// 사이클 성공 (Idle 복귀 직전)
    Succeeded,
    /// 사이클 실패 (Idle 복귀 직전)
    Failed,
}

/// 직전 사이클의 최종 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 성공 (빈 사이클 포함)
    Succeeded,
    /// 실패
    Failed,
}

/// 한 사이클의 운영 리포트
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 사이클 식별자
    pub cycle_id: Uuid,
    /// 사이클 시작 시각
    pub started_at: DateTime<Utc>,
    /// 리포터 비활성화로 건너뜀
    pub skipped: bool,
    /// 드레인된 엔트리 수
    pub drained_entries: usize,
    /// 샘플링으로 제외된 엔트리 수
    pub sampled_out: usize,
    /// 주입된 조작 관측 수
    pub fabricated: usize,
    /// 암호화 대상 관측 수
    pub observations: usize,
    /// 관측 단위 암호화 실패 수 (해당 관측만 제외)
    pub encrypt_failures: usize,
    /// 실제 전송 수행 여부 (빈 사이클이면 false)
    pub uploaded: bool,
}

impl CycleReport {
    fn new() -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            started_at: Utc::now(),
            skipped: false,
            drained_entries: 0,
            sampled_out: 0,
            fabricated: 0,
            observations: 0,
            encrypt_failures: 0,
            uploaded: false,
        }
    }
}

/// 업로드 코디네이터
pub struct UploadCoordinator {
    project: Project,
    config: ReporterConfig,
    store: Arc<dyn EntryStore>,
    sampler: LogSampler,
    noise: NoiseGenerator,
    random: Arc<dyn RandomSource>,
    encrypter: Arc<dyn Encrypter>,
    transport: Arc<dyn Transport>,
    oplog: Arc<OperationLogger>,
    state: Mutex<CycleState>,
    last_outcome: Mutex<Option<CycleOutcome>>,
}

impl std::fmt::Debug for UploadCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadCoordinator")
            .field("state", &self.state())
            .field("last_outcome", &self.last_outcome())
            .finish_non_exhaustive()
    }
}

impl UploadCoordinator {
    /// 코디네이터 조립.
    ///
    /// 설정/레지스트리 검증이 여기서 일어난다 — 잘못된 샘플링 비율이나
    /// 레지스트리 정의는 사이클을 돌기 전에 실패한다.
    pub fn new(
        project: Project,
        config: ReporterConfig,
        store: Arc<dyn EntryStore>,
        encrypter: Arc<dyn Encrypter>,
        transport: Arc<dyn Transport>,
        random: Arc<dyn RandomSource>,
        oplog: Arc<OperationLogger>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        project.validate()?;
        let sampler = LogSampler::from_config(&config, Arc::clone(&random))?;
        let noise = NoiseGenerator::new(Arc::clone(&random));

        Ok(Self {
            project,
            config,
            store,
            sampler,
            noise,
            random,
            encrypter,
            transport,
            oplog,
            state: Mutex::new(CycleState::Idle),
            last_outcome: Mutex::new(None),
        })
    }

    /// 현재 사이클 상태
    pub fn state(&self) -> CycleState {
        *self.state.lock()
    }

    /// 직전 사이클의 최종 결과 (아직 사이클이 없었다면 None)
    pub fn last_outcome(&self) -> Option<CycleOutcome> {
        *self.last_outcome.lock()
    }

    /// 업로드 사이클 한 번 실행.
    ///
    /// Idle이 아닐 때의 호출은 `CycleInFlight`로 거부된다. 어떤 에러가 나도
    /// 사이클은 Failed를 거쳐 반드시 Idle로 복귀한다 — 비유휴 상태에 갇히지
    /// 않는다.
    pub async fn run_cycle(&self) -> Result<CycleReport, CoreError> {
        {
            let mut state = self.state.lock();
            if *state != CycleState::Idle {
                return Err(CoreError::CycleInFlight);
            }
            *state = CycleState::Draining;
        }

        let mut report = CycleReport::new();

        if !self.config.enabled {
            debug!("리포터 비활성화 — 사이클 {} 건너뜀", report.cycle_id);
            report.skipped = true;
            self.set_state(CycleState::Idle);
            return Ok(report);
        }

        let result = self.execute(&mut report).await;
        match &result {
            Ok(()) => {
                self.set_state(CycleState::Succeeded);
                *self.last_outcome.lock() = Some(CycleOutcome::Succeeded);
                self.oplog.log_upload_success();
                info!(
                    "업로드 사이클 {} 성공: 관측 {}개, 전송 {}",
                    report.cycle_id, report.observations, report.uploaded
                );
            }
            Err(e) => {
                self.set_state(CycleState::Failed);
                *self.last_outcome.lock() = Some(CycleOutcome::Failed);
                self.oplog.log_upload_failure();
                warn!("업로드 사이클 {} 실패: {e}", report.cycle_id);
            }
        }
        self.set_state(CycleState::Idle);

        result.map(|()| report)
    }

    async fn execute(&self, report: &mut CycleReport) -> Result<(), CoreError> {
        // Draining — 키별 원자적 take. 제외 리포트와 레지스트리에 없는
        // 리포트도 드레인해서 버린다 (버퍼가 무한히 커지지 않도록).
        let mut drained: Vec<(ReportKey, Vec<BufferedEntry>)> = Vec::new();
        for key in self.store.occupied_keys().await? {
            if self.config.ignored_reports.contains(&key) {
                let discarded = self.store.drain(&key).await?;
                debug!("제외 리포트 {key}: 엔트리 {}개 버림", discarded.len());
                continue;
            }
            if self.project.report(&key).is_none() {
                let discarded = self.store.drain(&key).await?;
                warn!("레지스트리에 없는 리포트 {key}: 엔트리 {}개 버림", discarded.len());
                continue;
            }
            let entries = self.store.drain(&key).await?;
            report.drained_entries += entries.len();
            if !entries.is_empty() {
                drained.push((key, entries));
            }
        }

        // Sampling — 로그 샘플링으로 엔트리를 선별하고, 셔플 DP 리포트의
        // 소량 버킷에는 조작 관측 추첨을 돌린다. 노이즈 추첨은 샘플링과
        // 무관하게 드레인된 실제 카운트를 기준으로 한다.
        self.set_state(CycleState::Sampling);
        let mut surviving: Vec<Vec<BufferedEntry>> = Vec::new();
        let mut fabricated: Vec<EventVector> = Vec::new();
        for (key, entries) in drained {
            let mechanism = self
                .project
                .report(&key)
                .map(|r| r.privacy_mechanism.clone());
            let mut kept = Vec::new();
            for entry in entries {
                if let Some(PrivacyMechanism::ShuffledDp { poisson_mean }) = &mechanism {
                    if entry.count < self.config.privacy.low_count_threshold {
                        for _ in 0..self.noise.fabricated_count(*poisson_mean) {
                            fabricated.push(entry.event_vector.clone());
                        }
                    }
                }
                if self.sampler.should_log(key.metric_id) {
                    kept.push(entry);
                } else {
                    report.sampled_out += 1;
                }
            }
            if !kept.is_empty() {
                surviving.push(kept);
            }
        }
        report.fabricated = fabricated.len();

        // Encoding — 리포트 단위로 두 엔트리씩 관측 하나에 패킹한다.
        // 기여 ID는 실제 관측에만 붙는다.
        self.set_state(CycleState::Encoding);
        let mut to_encrypt: Vec<ObservationToEncrypt> = Vec::new();
        for entries in &surviving {
            for chunk in entries.chunks(2) {
                let observation = match chunk {
                    [first, second] => integer_observation_pair(
                        (&first.event_vector, clamped(first.count)),
                        (&second.event_vector, clamped(second.count)),
                        new_random_id(self.random.as_ref()),
                    ),
                    [only] => integer_observation(
                        &only.event_vector,
                        clamped(only.count),
                        new_random_id(self.random.as_ref()),
                    ),
                    _ => unreachable!("chunks(2)는 1~2개 슬라이스만 낸다"),
                };
                to_encrypt.push(ObservationToEncrypt {
                    observation: Some(observation),
                    contribution_id: new_random_id(self.random.as_ref()),
                });
            }
        }
        for event_vector in &fabricated {
            let observation =
                integer_observation(event_vector, 0, new_random_id(self.random.as_ref()));
            to_encrypt.push(ObservationToEncrypt {
                observation: Some(observation),
                contribution_id: Vec::new(),
            });
        }
        report.observations = to_encrypt.len();

        // Encrypting — 관측 하나의 실패는 그 관측만 제외한다
        self.set_state(CycleState::Encrypting);
        let mut messages: Vec<EncryptedMessage> = Vec::new();
        for item in &to_encrypt {
            match self.encrypter.encrypt_observation(item) {
                Ok(Some(message)) => messages.push(message),
                Ok(None) => debug!("빈 관측 — 암호화 출력 없음"),
                Err(e) => {
                    report.encrypt_failures += 1;
                    warn!("관측 암호화 실패, 해당 관측 제외: {e}");
                }
            }
        }

        // Batching — 봉투 암호화 실패는 사이클 전체 실패다 (`?` 전파)
        self.set_state(CycleState::Batching);
        if messages.is_empty() {
            debug!("전송할 관측 없음 — 업로드 생략");
            return Ok(());
        }
        let envelope = assemble_envelope(
            self.config.api_key.as_bytes(),
            self.config.environment,
            self.config.key_index,
            messages,
        );
        let Some(sealed) = self.encrypter.encrypt_envelope(&envelope)? else {
            debug!("빈 봉투 — 업로드 생략");
            return Ok(());
        };

        // Uploading — 타임아웃은 전송 실패와 동일하게 취급
        self.set_state(CycleState::Uploading);
        match timeout(
            self.config.request_timeout(),
            self.transport.send(&sealed.ciphertext),
        )
        .await
        {
            Ok(Ok(())) => {
                report.uploaded = true;
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(CoreError::UploadTimeout {
                timeout_ms: self.config.request_timeout_ms,
            }),
        }
    }

    fn set_state(&self, next: CycleState) {
        *self.state.lock() = next;
    }
}

/// u64 카운트를 i64 와이어 값으로 (넘치면 i64::MAX에서 포화)
fn clamped(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
