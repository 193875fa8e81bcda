//! 로그 컬렉터.
//!
//! 수집(`log`), 만료 정리(`clean_expired_logs`), 내보내기(`export_logs`),
//! 내보내기 트리거, 라이프사이클(`destroy`)을 담당한다.
//! 모든 공개 연산은 best-effort — 실패는 tracing으로만 보고하고
//! 호출자에게 에러를 돌려주지 않는다.

use chrono::{Local, Utc};
use logkeep_core::config::{CollectorConfig, DEFAULT_EXPORT_FILE_NAME};
use logkeep_core::error::CoreError;
use logkeep_core::models::filter::LogFilter;
use logkeep_core::models::log_record::{LogLevel, LogRecord};
use logkeep_core::models::message::LogMessage;
use logkeep_core::models::report::{ExportReport, SweepReport};
use logkeep_core::ports::export_sink::ExportSink;
use logkeep_core::ports::storage::LogStore;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::codec;
use crate::format::{self, FormattedLine};
use crate::hotkey::{ExportHotkey, Platform};
use crate::scheduler;
use crate::trigger::ExportTrigger;

/// 정리 배치 크기 — 이만큼 삭제할 때마다 휴식
pub const SWEEP_BATCH_SIZE: usize = 100;

/// 배치 사이 휴식 시간
pub const SWEEP_BATCH_PAUSE: Duration = Duration::from_millis(100);

/// 로그 컬렉터
pub struct LogCollector {
    config: CollectorConfig,
    store: Arc<dyn LogStore>,
    sink: Arc<dyn ExportSink>,
    export_file_name: String,
    trigger: ExportTrigger,
    hotkey: Option<ExportHotkey>,
    shutdown_tx: watch::Sender<bool>,
    clean_task: Mutex<Option<JoinHandle<()>>>,
}

impl LogCollector {
    /// 컬렉터 생성 및 자동 정리 시작
    ///
    /// tokio 런타임 안에서 호출하면 `clean_interval`마다 정리 태스크가 돈다.
    /// `enable_default_hotkey`가 켜져 있으면 기본 단축키를 만든다.
    pub fn new(
        config: CollectorConfig,
        store: Arc<dyn LogStore>,
        sink: Arc<dyn ExportSink>,
    ) -> Arc<Self> {
        Self::with_file_name(config, store, sink, DEFAULT_EXPORT_FILE_NAME)
    }

    /// 내보내기 파일 이름을 지정해 생성
    pub fn with_file_name(
        config: CollectorConfig,
        store: Arc<dyn LogStore>,
        sink: Arc<dyn ExportSink>,
        export_file_name: impl Into<String>,
    ) -> Arc<Self> {
        let trigger = ExportTrigger::new();
        let hotkey = config
            .enable_default_hotkey
            .then(|| ExportHotkey::new(Platform::current(), trigger.clone()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let period = config.clean_interval().max(Duration::from_millis(1));

        let collector = Arc::new(Self {
            config,
            store,
            sink,
            export_file_name: export_file_name.into(),
            trigger,
            hotkey,
            shutdown_tx,
            clean_task: Mutex::new(None),
        });

        let task = scheduler::spawn_auto_clean(Arc::downgrade(&collector), period, shutdown_rx);
        *collector.clean_task.lock() = task;

        info!(
            "로그 컬렉터 시작: 보존={}ms, 단축키={}",
            collector.config.log_expiration_ms,
            collector.hotkey.is_some()
        );
        collector
    }

    // ============================================================
    // 수집
    // ============================================================

    /// 메시지 기록 — 저장된 레코드 ID 반환 (실패 시 None)
    pub async fn log(&self, message: impl Into<LogMessage>, level: LogLevel) -> Option<i64> {
        let formatted = format::format_message(&Local::now(), level, &message.into());
        self.persist(formatted).await
    }

    /// 임의의 `Serialize` 값 기록
    ///
    /// 직렬화에 실패하면 실패 내용을 담은 ERROR 레코드 하나를 대신 저장한다.
    pub async fn log_value<T>(&self, value: &T, level: LogLevel) -> Option<i64>
    where
        T: Serialize + ?Sized,
    {
        let formatted = format::format_value(&Local::now(), level, value);
        self.persist(formatted).await
    }

    pub async fn info(&self, message: impl Into<LogMessage>) -> Option<i64> {
        self.log(message, LogLevel::Info).await
    }

    pub async fn warn(&self, message: impl Into<LogMessage>) -> Option<i64> {
        self.log(message, LogLevel::Warn).await
    }

    pub async fn error(&self, message: impl Into<LogMessage>) -> Option<i64> {
        self.log(message, LogLevel::Error).await
    }

    async fn persist(&self, formatted: FormattedLine) -> Option<i64> {
        let encoded = match codec::encode_line(&formatted.line) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("로그 인코딩 실패: {e}");
                return None;
            }
        };

        let record = LogRecord::new(
            encoded.bytes,
            encoded.encoding,
            Utc::now().timestamp_millis(),
            formatted.level,
        );

        match self.store.insert(&record).await {
            Ok(id) => Some(id),
            Err(e) => {
                error!("로그 저장 실패: {e}");
                None
            }
        }
    }

    // ============================================================
    // 만료 정리
    // ============================================================

    /// 보존 기간이 지난 레코드 삭제
    ///
    /// `SWEEP_BATCH_SIZE`건마다 `SWEEP_BATCH_PAUSE`만큼 쉰다.
    /// 중간에 실패하면 이미 삭제한 것은 그대로 두고 이번 정리를 끝낸다.
    pub async fn clean_expired_logs(&self) -> SweepReport {
        let retention = self.config.log_expiration();
        let expiration = i64::try_from(retention.as_millis()).unwrap_or(i64::MAX);
        let cutoff = Utc::now().timestamp_millis().saturating_sub(expiration);
        let mut report = SweepReport {
            cutoff,
            ..SweepReport::default()
        };

        let expired = match self.store.find_before(cutoff).await {
            Ok(expired) => expired,
            Err(e) => {
                error!("만료 로그 정리 실패: {e}");
                return report;
            }
        };

        for record in expired {
            let Some(id) = record.id else {
                report.skipped += 1;
                continue;
            };

            if let Err(e) = self.store.delete_by_id(id).await {
                error!("만료 로그 정리 실패 (id={id}, 삭제 {}건 후): {e}", report.deleted);
                return report;
            }
            report.deleted += 1;

            if report.deleted % SWEEP_BATCH_SIZE == 0 {
                tokio::time::sleep(SWEEP_BATCH_PAUSE).await;
                report.pauses += 1;
            }
        }

        report.completed = true;
        if report.deleted > 0 {
            info!("만료 로그 정리: {}건 삭제 (cutoff={cutoff})", report.deleted);
        }
        report
    }

    // ============================================================
    // 내보내기
    // ============================================================

    /// 조건에 맞는 레코드를 한 파일로 내보내기
    ///
    /// 실패하면 파일을 만들지 않고 None 반환.
    pub async fn export_logs(&self, filter: &LogFilter) -> Option<ExportReport> {
        match self.try_export(filter).await {
            Ok(report) => Some(report),
            Err(e) => {
                error!("로그 내보내기 실패: {e}");
                None
            }
        }
    }

    async fn try_export(&self, filter: &LogFilter) -> Result<ExportReport, CoreError> {
        let records = self
            .store
            .find_between(filter.start_time, filter.end_time)
            .await?;

        let lines = records
            .iter()
            .filter(|record| filter.matches(record))
            .map(|record| codec::decode_payload(&record.payload, record.encoding))
            .collect::<Result<Vec<String>, CoreError>>()?;

        let content = lines.join("\n");
        let location = self.sink.deliver(&self.export_file_name, &content).await?;
        debug!("내보내기: {}건, {}바이트", lines.len(), content.len());

        Ok(ExportReport {
            location,
            records: lines.len(),
            bytes: content.len(),
        })
    }

    // ============================================================
    // 내보내기 트리거
    // ============================================================

    /// 내보내기 요청 콜백 등록 (기존 콜백 교체)
    pub fn on_export_trigger<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.trigger.set(callback);
    }

    /// 등록된 콜백 호출 — 없으면 아무것도 하지 않음
    pub fn trigger_export(&self) {
        self.trigger.fire();
    }

    /// 기본 단축키 (비활성화 시 None)
    pub fn hotkey(&self) -> Option<&ExportHotkey> {
        self.hotkey.as_ref()
    }

    // ============================================================
    // 라이프사이클
    // ============================================================

    /// 자동 정리 중지
    ///
    /// 저장소는 닫지 않으며 단축키도 그대로 남는다.
    /// 진행 중인 정리는 끝까지 실행된다.
    pub fn destroy(&self) {
        if self.clean_task.lock().take().is_some() {
            let _ = self.shutdown_tx.send(true);
            info!("로그 컬렉터 자동 정리 중지");
        }
    }

    /// 자동 정리 태스크가 살아 있는지
    pub fn is_auto_clean_running(&self) -> bool {
        self.clean_task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}
