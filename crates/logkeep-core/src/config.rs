//! 애플리케이션 설정 구조체.
//!
//! 보존 기간, 정리 주기, 단축키 활성화, 저장소/내보내기 경로를 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 기본 내보내기 파일 이름
pub const DEFAULT_EXPORT_FILE_NAME: &str = "logs.txt";

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 로그 컬렉터 설정
    #[serde(default)]
    pub collector: CollectorConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 내보내기 설정
    #[serde(default)]
    pub export: ExportConfig,
}

// ============================================================
// 컬렉터/저장소/내보내기 설정
// ============================================================

/// 로그 컬렉터 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// 보존 기간 (밀리초) — 이보다 오래된 레코드는 정리 대상
    #[serde(default = "default_log_expiration_ms")]
    pub log_expiration_ms: u64,
    /// 기본 내보내기 단축키 (Cmd/Ctrl+Shift+1) 사용 여부
    #[serde(default = "default_true")]
    pub enable_default_hotkey: bool,
    /// 자동 정리 주기 (밀리초)
    #[serde(default = "default_clean_interval_ms")]
    pub clean_interval_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            log_expiration_ms: default_log_expiration_ms(),
            enable_default_hotkey: true,
            clean_interval_ms: default_clean_interval_ms(),
        }
    }
}

impl CollectorConfig {
    /// 보존 기간을 지정한 설정
    pub fn with_expiration_ms(log_expiration_ms: u64) -> Self {
        Self {
            log_expiration_ms,
            ..Self::default()
        }
    }

    pub fn log_expiration(&self) -> Duration {
        Duration::from_millis(self.log_expiration_ms)
    }

    pub fn clean_interval(&self) -> Duration {
        Duration::from_millis(self.clean_interval_ms)
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.clean_interval_ms == 0 {
            return Err(CoreError::Validation {
                field: "collector.clean_interval_ms".to_string(),
                message: "0보다 커야 합니다".to_string(),
            });
        }
        if i64::try_from(self.log_expiration_ms).is_err() {
            return Err(CoreError::Validation {
                field: "collector.log_expiration_ms".to_string(),
                message: format!("{}ms는 표현 가능한 범위를 넘습니다", self.log_expiration_ms),
            });
        }
        Ok(())
    }
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite DB 파일 경로 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// 내보내기 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// 내보내기 파일을 둘 디렉토리 (None이면 현재 디렉토리)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// 내보내기 파일 이름
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_name: default_export_file_name(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            collector: CollectorConfig::default(),
            storage: StorageConfig::default(),
            export: ExportConfig::default(),
        }
    }

    /// 전체 설정 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        self.collector.validate()?;
        if self.export.file_name.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "export.file_name".to_string(),
                message: "비어 있을 수 없습니다".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_log_expiration_ms() -> u64 {
    3_600_000 // 1시간
}

fn default_clean_interval_ms() -> u64 {
    15 * 60 * 1000 // 15분
}

fn default_export_file_name() -> String {
    DEFAULT_EXPORT_FILE_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default_config());

        let config: AppConfig =
            serde_json::from_str(r#"{"collector": {"log_expiration_ms": 1000}}"#).unwrap();
        assert_eq!(config.collector.log_expiration_ms, 1000);
        assert!(config.collector.enable_default_hotkey);
        assert_eq!(config.collector.clean_interval(), Duration::from_secs(900));
    }

    #[test]
    fn zero_clean_interval_rejected() {
        let mut config = AppConfig::default_config();
        config.collector.clean_interval_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn empty_export_file_name_rejected() {
        let mut config = AppConfig::default_config();
        config.export.file_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn expiration_helper() {
        let config = CollectorConfig::with_expiration_ms(1000);
        assert_eq!(config.log_expiration(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }
}
