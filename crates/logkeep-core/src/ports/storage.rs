//! 로그 저장소 포트.
//!
//! 구현: `logkeep-storage` crate (rusqlite, 인메모리)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::log_record::LogRecord;

/// 자동 증가 ID와 timestamp/level 인덱스를 가진 로그 테이블
///
/// 범위 조회 결과는 항상 `(timestamp, id)` 오름차순이다.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// 레코드 저장 후 부여된 ID 반환 (입력 레코드의 `id`는 무시)
    async fn insert(&self, record: &LogRecord) -> Result<i64, CoreError>;

    /// `timestamp < cutoff` 레코드 조회
    async fn find_before(&self, cutoff: i64) -> Result<Vec<LogRecord>, CoreError>;

    /// `start <= timestamp <= end` 레코드 조회 (None은 경계 없음)
    async fn find_between(
        &self,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<LogRecord>, CoreError>;

    /// ID로 삭제 — 실제로 삭제되었으면 true
    async fn delete_by_id(&self, id: i64) -> Result<bool, CoreError>;

    /// 전체 레코드 조회
    async fn all(&self) -> Result<Vec<LogRecord>, CoreError> {
        self.find_between(None, None).await
    }

    /// 저장된 레코드 수
    async fn count(&self) -> Result<u64, CoreError>;
}
