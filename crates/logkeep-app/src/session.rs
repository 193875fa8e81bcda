//! `run` 모드 세션.
//!
//! 입력 스트림의 각 줄을 로그로 기록한다. `:export` 줄은 내보내기 트리거를
//! 발동하고, 트리거 콜백은 채널로 같은 루프에 내보내기를 요청한다.

use logkeep_collector::LogCollector;
use logkeep_core::models::filter::LogFilter;
use logkeep_core::models::log_record::LogLevel;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// 내보내기 트리거 명령
pub const EXPORT_COMMAND: &str = ":export";

/// 세션 종료 시 요약
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// 기록된 줄 수
    pub logged: usize,
    /// 파일이 전달된 내보내기 횟수
    pub exports: usize,
}

/// 세션 설정
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// 입력 줄에 붙일 레벨
    pub level: LogLevel,
    /// 트리거로 내보낼 때 쓰는 필터
    pub filter: LogFilter,
}

/// 입력이 끝나거나 종료 신호가 올 때까지 세션 실행
///
/// 끝나기 전에 대기 중인 내보내기 요청을 모두 처리하고 `destroy()`를 호출한다.
pub async fn run_session<R>(
    collector: Arc<LogCollector>,
    input: R,
    options: SessionOptions,
    mut shutdown_rx: watch::Receiver<bool>,
) -> SessionSummary
where
    R: AsyncBufRead + Unpin,
{
    let (export_tx, mut export_rx) = mpsc::unbounded_channel::<()>();
    collector.on_export_trigger(move || {
        let _ = export_tx.send(());
    });

    let mut summary = SessionSummary::default();
    let mut lines = input.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => handle_line(&collector, &line, options.level, &mut summary).await,
                Ok(None) => {
                    debug!("입력 종료");
                    break;
                }
                Err(e) => {
                    warn!("입력 읽기 실패: {e}");
                    break;
                }
            },
            Some(()) = export_rx.recv() => {
                export(&collector, &options.filter, &mut summary).await;
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    while export_rx.try_recv().is_ok() {
        export(&collector, &options.filter, &mut summary).await;
    }

    collector.destroy();
    info!(
        "세션 종료: {}줄 기록, 내보내기 {}회",
        summary.logged, summary.exports
    );
    summary
}

async fn handle_line(
    collector: &LogCollector,
    line: &str,
    level: LogLevel,
    summary: &mut SessionSummary,
) {
    let line = line.trim_end();
    if line.is_empty() {
        return;
    }
    if line == EXPORT_COMMAND {
        collector.trigger_export();
        return;
    }
    if collector.log(line, level).await.is_some() {
        summary.logged += 1;
    }
}

async fn export(collector: &LogCollector, filter: &LogFilter, summary: &mut SessionSummary) {
    if let Some(report) = collector.export_logs(filter).await {
        info!(
            "내보내기 완료: {} ({}건)",
            report.location.display(),
            report.records
        );
        summary.exports += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logkeep_collector::sink::FileExportSink;
    use logkeep_core::config::CollectorConfig;
    use logkeep_core::ports::storage::LogStore;
    use logkeep_storage::memory::MemoryLogStore;
    use tempfile::TempDir;

    fn options() -> SessionOptions {
        SessionOptions {
            level: LogLevel::Info,
            filter: LogFilter::all(),
        }
    }

    fn setup() -> (Arc<LogCollector>, Arc<MemoryLogStore>, TempDir) {
        let store = Arc::new(MemoryLogStore::new());
        let out = TempDir::new().unwrap();
        let sink = Arc::new(FileExportSink::new(out.path()));
        let collector = LogCollector::new(CollectorConfig::default(), store.clone(), sink);
        (collector, store, out)
    }

    #[tokio::test]
    async fn lines_are_logged_and_export_command_exports() {
        let (collector, store, out) = setup();
        let (_tx, rx) = watch::channel(false);
        let input: &[u8] = b"first\n\nsecond\n:export\n";

        let summary = run_session(collector.clone(), input, options(), rx).await;

        assert_eq!(summary, SessionSummary { logged: 2, exports: 1 });
        assert_eq!(store.count().await.unwrap(), 2);
        let content = std::fs::read_to_string(out.path().join("logs.txt")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[INFO] - first"));
        assert!(lines[1].ends_with("[INFO] - second"));
        assert!(!collector.is_auto_clean_running());
    }

    #[tokio::test]
    async fn session_level_applies_to_every_line() {
        let (collector, store, _out) = setup();
        let (_tx, rx) = watch::channel(false);
        let input: &[u8] = b"disk almost full\n";
        let options = SessionOptions {
            level: LogLevel::Warn,
            ..options()
        };

        run_session(collector, input, options, rx).await;

        let records = store.all().await.unwrap();
        assert_eq!(records[0].level, LogLevel::Warn);
    }

    #[tokio::test]
    async fn shutdown_signal_ends_session() {
        let (collector, store, _out) = setup();
        let (client, server) = tokio::io::duplex(64);
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(run_session(
            collector,
            tokio::io::BufReader::new(server),
            options(),
            rx,
        ));
        tx.send(true).unwrap();

        let summary = handle.await.unwrap();
        assert_eq!(summary, SessionSummary::default());
        assert_eq!(store.count().await.unwrap(), 0);
        drop(client);
    }
}
