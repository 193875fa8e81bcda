//! 로그 레코드 모델.
//!
//! 저장소에 기록되는 단위. 한 번 기록된 레코드는 변경되지 않으며
//! 만료 정리에 의한 전체 삭제만 허용된다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 로그 레벨
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// 저장/출력용 문자열 (`INFO`, `WARN`, `ERROR`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            other => Err(CoreError::Validation {
                field: "level".to_string(),
                message: format!("알 수 없는 로그 레벨: {other}"),
            }),
        }
    }
}

/// 페이로드 인코딩 태그
///
/// 압축 여부를 레코드마다 명시적으로 기록한다.
/// 해제 시 바이트 내용으로 형식을 추측하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// 압축 없는 UTF-8
    Raw,
    /// DEFLATE (zlib 컨테이너)
    Deflate,
}

impl PayloadEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Deflate => "deflate",
        }
    }
}

impl FromStr for PayloadEncoding {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "deflate" => Ok(Self::Deflate),
            other => Err(CoreError::Codec(format!("알 수 없는 페이로드 인코딩: {other}"))),
        }
    }
}

/// 저장된 로그 한 건
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// 저장소가 부여하는 ID (저장 전에는 None)
    pub id: Option<i64>,
    /// 포맷된 로그 한 줄의 바이트 (압축 또는 원본)
    pub payload: Vec<u8>,
    /// 페이로드 인코딩
    pub encoding: PayloadEncoding,
    /// 기록 시각 (epoch 밀리초)
    pub timestamp: i64,
    /// 로그 레벨
    pub level: LogLevel,
}

impl LogRecord {
    /// 저장 전 레코드 생성
    pub fn new(
        payload: Vec<u8>,
        encoding: PayloadEncoding,
        timestamp: i64,
        level: LogLevel,
    ) -> Self {
        Self {
            id: None,
            payload,
            encoding,
            timestamp,
            level,
        }
    }

    /// 저장소가 부여한 ID를 붙인 사본
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
