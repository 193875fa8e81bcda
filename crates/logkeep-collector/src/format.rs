//! 로그 한 줄 포맷.
//!
//! `[MMDD HH:mm:ss] [LEVEL] - message`

use chrono::{DateTime, TimeZone};
use logkeep_core::models::log_record::LogLevel;
use logkeep_core::models::message::LogMessage;
use serde::Serialize;
use std::fmt::Display;

/// 줄 머리 시각 형식 (월일 시:분:초)
pub const LINE_TIME_FORMAT: &str = "%m%d %H:%M:%S";

/// 포맷된 한 줄과 실제 저장할 레벨
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub line: String,
    pub level: LogLevel,
}

/// 한 줄 조립
pub fn format_line<Tz>(at: &DateTime<Tz>, level: LogLevel, body: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("[{}] [{}] - {}", at.format(LINE_TIME_FORMAT), level, body)
}

/// `LogMessage` 포맷 — 구조화 값은 JSON 문자열로
pub fn format_message<Tz>(at: &DateTime<Tz>, level: LogLevel, message: &LogMessage) -> FormattedLine
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let line = match message {
        LogMessage::Text(text) => format_line(at, level, text),
        LogMessage::Structured(value) => format_line(at, level, &value.to_string()),
    };
    FormattedLine { line, level }
}

/// 임의의 `Serialize` 값 포맷
///
/// 직렬화에 실패하면 같은 시각으로 ERROR 줄을 대신 만든다.
pub fn format_value<Tz, T>(at: &DateTime<Tz>, level: LogLevel, value: &T) -> FormattedLine
where
    Tz: TimeZone,
    Tz::Offset: Display,
    T: Serialize + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(json) => FormattedLine {
            line: format_line(at, level, &json),
            level,
        },
        Err(e) => FormattedLine {
            line: format_line(
                at,
                LogLevel::Error,
                &format!("Failed to stringify log message: {e}"),
            ),
            level: LogLevel::Error,
        },
    }
}
