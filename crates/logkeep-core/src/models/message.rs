//! 수집 입력 메시지.

use serde_json::Value;

/// `log()`에 전달되는 메시지 — 평문 또는 구조화 값
#[derive(Debug, Clone, PartialEq)]
pub enum LogMessage {
    /// 그대로 기록되는 문자열
    Text(String),
    /// JSON으로 직렬화되어 기록되는 값
    Structured(Value),
}

impl From<&str> for LogMessage {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for LogMessage {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Value> for LogMessage {
    fn from(v: Value) -> Self {
        Self::Structured(v)
    }
}
