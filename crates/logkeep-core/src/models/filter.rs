//! 내보내기 필터.

use serde::{Deserialize, Serialize};

use super::log_record::{LogLevel, LogRecord};

/// 내보내기 조건 — 지정된 조건은 모두 AND로 결합된다.
///
/// 시작/종료 시각은 모두 포함(inclusive) 경계다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    /// 레벨 일치 조건
    pub level: Option<LogLevel>,
    /// 시작 시각 (epoch 밀리초, 이상)
    pub start_time: Option<i64>,
    /// 종료 시각 (epoch 밀리초, 이하)
    pub end_time: Option<i64>,
}

impl LogFilter {
    /// 조건 없는 필터 (전체 내보내기)
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn since(mut self, start_time: i64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn until(mut self, end_time: i64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// 레코드가 모든 조건을 만족하는지 확인
    pub fn matches(&self, record: &LogRecord) -> bool {
        self.level.map_or(true, |level| record.level == level)
            && self.start_time.map_or(true, |start| record.timestamp >= start)
            && self.end_time.map_or(true, |end| record.timestamp <= end)
    }
}
