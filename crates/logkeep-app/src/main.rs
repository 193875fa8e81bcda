//! # logkeep
//!
//! 로그 수집 CLI 진입점.
//! 설정 로드, 저장소/싱크 조립, 서브커맨드 실행.

mod lifecycle;
mod session;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use logkeep_collector::sink::FileExportSink;
use logkeep_collector::LogCollector;
use logkeep_core::config::AppConfig;
use logkeep_core::config_manager::ConfigManager;
use logkeep_core::models::filter::LogFilter;
use logkeep_core::models::log_record::LogLevel;
use logkeep_core::models::message::LogMessage;
use logkeep_storage::sqlite::SqliteLogStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;
use crate::session::{run_session, SessionOptions};

/// DB 파일 이름
const DB_FILE_NAME: &str = "logkeep.db";

/// 로컬 로그 수집기
///
/// 로그를 SQLite에 보관하고, 보존 기간이 지나면 정리하며, 필터로 골라 파일로 내보낸다.
#[derive(Parser, Debug)]
#[command(name = "logkeep")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 데이터 저장 경로 (설정의 db_path보다 우선)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 메시지 한 건 기록
    Log {
        message: String,

        #[arg(long, default_value = "info")]
        level: LogLevel,

        /// 메시지를 JSON으로 해석
        #[arg(long)]
        json: bool,
    },

    /// 조건에 맞는 로그를 파일로 내보내기
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// 출력 디렉토리 (설정의 output_dir보다 우선)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// 만료 정리 1회 실행
    Clean,

    /// 표준 입력의 각 줄을 기록 (`:export` 줄은 전체 내보내기)
    Run {
        #[arg(long, default_value = "info")]
        level: LogLevel,
    },
}

/// 내보내기 필터 인자
#[derive(ClapArgs, Debug, Default)]
struct FilterArgs {
    /// 이 레벨만 포함
    #[arg(long)]
    level: Option<LogLevel>,

    /// 시작 시각 (epoch ms, 포함)
    #[arg(long)]
    from: Option<i64>,

    /// 종료 시각 (epoch ms, 포함)
    #[arg(long)]
    to: Option<i64>,
}

impl FilterArgs {
    fn to_filter(&self) -> LogFilter {
        LogFilter {
            level: self.level,
            start_time: self.from,
            end_time: self.to,
        }
    }
}

/// 데이터베이스 경로 결정 (CLI 인자 → 설정 → 플랫폼 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/dev.logkeep.logkeep/logkeep.db`
/// - Windows: `%APPDATA%\logkeep\logkeep\data\logkeep.db`
/// - Linux: `~/.local/share/logkeep/logkeep.db`
fn resolve_db_path(config: &AppConfig, data_dir: Option<&Path>) -> PathBuf {
    data_dir
        .map(|d| d.join(DB_FILE_NAME))
        .or_else(|| config.storage.db_path.clone())
        .or_else(|| {
            ConfigManager::data_dir()
                .map(|d| d.join(DB_FILE_NAME))
                .map_err(|e| warn!("데이터 디렉토리 확인 실패, 현재 디렉토리 사용: {e}"))
                .ok()
        })
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}

/// 내보내기 디렉토리 결정 (CLI 인자 → 설정 → 현재 디렉토리)
fn resolve_export_dir(config: &AppConfig, out_dir: Option<&Path>) -> PathBuf {
    out_dir
        .map(Path::to_path_buf)
        .or_else(|| config.export.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn log_filter_directive(level: &str) -> String {
    ["logkeep", "logkeep_app", "logkeep_core", "logkeep_storage", "logkeep_collector"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn load_config(path: Option<&Path>) -> Result<ConfigManager> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path.to_path_buf()),
        None => ConfigManager::new(),
    };
    manager.context("설정 로드 실패")
}

fn build_collector(
    config: &AppConfig,
    db_path: &Path,
    export_dir: PathBuf,
) -> Result<Arc<LogCollector>> {
    let store = SqliteLogStore::open(db_path)
        .with_context(|| format!("저장소 열기 실패: {}", db_path.display()))?;
    Ok(LogCollector::with_file_name(
        config.collector.clone(),
        Arc::new(store),
        Arc::new(FileExportSink::new(export_dir)),
        config.export.file_name.clone(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter_directive(&args.log_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_manager = load_config(args.config.as_deref())?;
    info!("설정 파일: {}", config_manager.config_path().display());
    let config = config_manager.get();
    let db_path = resolve_db_path(&config, args.data_dir.as_deref());
    info!("DB 경로: {}", db_path.display());

    match args.command {
        Command::Log {
            message,
            level,
            json,
        } => {
            let message = if json {
                LogMessage::from(
                    serde_json::from_str::<serde_json::Value>(&message)
                        .context("JSON 메시지 해석 실패")?,
                )
            } else {
                LogMessage::from(message)
            };
            let collector = build_collector(&config, &db_path, resolve_export_dir(&config, None))?;
            let id = collector.log(message, level).await;
            collector.destroy();
            let id = id.context("로그 저장 실패")?;
            println!("{id}");
        }
        Command::Export { filter, out_dir } => {
            let export_dir = resolve_export_dir(&config, out_dir.as_deref());
            let collector = build_collector(&config, &db_path, export_dir)?;
            let report = collector.export_logs(&filter.to_filter()).await;
            collector.destroy();
            let report = report.context("로그 내보내기 실패")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Clean => {
            let collector = build_collector(&config, &db_path, resolve_export_dir(&config, None))?;
            let report = collector.clean_expired_logs().await;
            collector.destroy();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Run { level } => {
            let collector = build_collector(&config, &db_path, resolve_export_dir(&config, None))?;
            let lifecycle = Arc::new(LifecycleManager::new());
            let signal_task = {
                let lifecycle = lifecycle.clone();
                tokio::spawn(async move { lifecycle.wait_for_signal().await })
            };

            let options = SessionOptions {
                level,
                filter: LogFilter::all(),
            };
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let summary = run_session(collector, stdin, options, lifecycle.subscribe()).await;
            signal_task.abort();

            info!("logkeep 종료 ({}줄 기록)", summary.logged);
        }
    }

    Ok(())
}
