//! 로그 테이블 (LogStore 포트 구현).

use async_trait::async_trait;
use logkeep_core::error::CoreError;
use logkeep_core::models::log_record::{LogLevel, LogRecord, PayloadEncoding};
use logkeep_core::ports::storage::LogStore;
use rusqlite::{params, Connection, Params, Row};
use tracing::debug;

use super::SqliteLogStore;

const SELECT_COLUMNS: &str = "SELECT id, timestamp, level, encoding, log FROM logs";

/// DB 행 (문자열 컬럼은 도메인 타입으로 변환 전)
struct LogRow {
    id: i64,
    timestamp: i64,
    level: String,
    encoding: String,
    log: Vec<u8>,
}

impl LogRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            level: row.get(2)?,
            encoding: row.get(3)?,
            log: row.get(4)?,
        })
    }

    fn into_record(self) -> Result<LogRecord, CoreError> {
        let level: LogLevel = self.level.parse()?;
        let encoding: PayloadEncoding = self.encoding.parse()?;
        Ok(LogRecord::new(self.log, encoding, self.timestamp, level).with_id(self.id))
    }
}

fn query_records<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<LogRecord>, CoreError> {
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| CoreError::Storage(format!("쿼리 준비 실패: {e}")))?;

    let rows = stmt
        .query_map(params, LogRow::from_row)
        .map_err(|e| CoreError::Storage(format!("쿼리 실행 실패: {e}")))?;

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|e| CoreError::Storage(format!("행 읽기 실패: {e}")))?;
        records.push(row.into_record()?);
    }
    Ok(records)
}

#[async_trait]
impl LogStore for SqliteLogStore {
    async fn insert(&self, record: &LogRecord) -> Result<i64, CoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO logs (timestamp, level, encoding, log) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.timestamp,
                record.level.as_str(),
                record.encoding.as_str(),
                record.payload
            ],
        )
        .map_err(|e| CoreError::Storage(format!("로그 저장 실패: {e}")))?;

        Ok(conn.last_insert_rowid())
    }

    async fn find_before(&self, cutoff: i64) -> Result<Vec<LogRecord>, CoreError> {
        let conn = self.lock()?;
        let sql = format!("{SELECT_COLUMNS} WHERE timestamp < ?1 ORDER BY timestamp, id");
        let records = query_records(&conn, &sql, params![cutoff])?;
        debug!("만료 대상 조회: cutoff={cutoff}, {}건", records.len());
        Ok(records)
    }

    async fn find_between(
        &self,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<LogRecord>, CoreError> {
        let conn = self.lock()?;
        let sql = format!(
            "{SELECT_COLUMNS}
             WHERE (?1 IS NULL OR timestamp >= ?1) AND (?2 IS NULL OR timestamp <= ?2)
             ORDER BY timestamp, id"
        );
        query_records(&conn, &sql, params![start, end])
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, CoreError> {
        let conn = self.lock()?;
        let deleted = conn
            .execute("DELETE FROM logs WHERE id = ?1", params![id])
            .map_err(|e| CoreError::Storage(format!("로그 삭제 실패: {e}")))?;
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<u64, CoreError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))
            .map_err(|e| CoreError::Storage(format!("로그 수 조회 실패: {e}")))?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: i64, level: LogLevel, text: &str) -> LogRecord {
        LogRecord::new(text.as_bytes().to_vec(), PayloadEncoding::Raw, timestamp, level)
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = SqliteLogStore::open_in_memory().unwrap();

        let first = store.insert(&record(10, LogLevel::Info, "a")).await.unwrap();
        let second = store.insert(&record(20, LogLevel::Warn, "b")).await.unwrap();
        assert!(second > first);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn insert_ignores_caller_id() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let id = store
            .insert(&record(10, LogLevel::Info, "a").with_id(999))
            .await
            .unwrap();
        assert_ne!(id, 999);
    }

    #[tokio::test]
    async fn stored_fields_roundtrip() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let original = LogRecord::new(
            vec![0x78, 0x9c, 0x01],
            PayloadEncoding::Deflate,
            42,
            LogLevel::Error,
        );
        let id = store.insert(&original).await.unwrap();

        let all = store.all().await.unwrap();
        assert_eq!(all, vec![original.with_id(id)]);
    }

    #[tokio::test]
    async fn find_before_is_exclusive_and_ordered() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        for ts in [300, 100, 200] {
            store.insert(&record(ts, LogLevel::Info, "x")).await.unwrap();
        }

        let expired = store.find_before(300).await.unwrap();
        let timestamps: Vec<i64> = expired.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![100, 200]);
    }

    #[tokio::test]
    async fn find_between_is_inclusive() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        for ts in [100, 200, 300, 400] {
            store.insert(&record(ts, LogLevel::Info, "x")).await.unwrap();
        }

        let ranged = store.find_between(Some(200), Some(300)).await.unwrap();
        let timestamps: Vec<i64> = ranged.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![200, 300]);

        let open_start = store.find_between(None, Some(100)).await.unwrap();
        assert_eq!(open_start.len(), 1);

        let open_end = store.find_between(Some(250), None).await.unwrap();
        assert_eq!(open_end.len(), 2);
    }

    #[tokio::test]
    async fn same_timestamp_ordered_by_id() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        store.insert(&record(5, LogLevel::Info, "first")).await.unwrap();
        store.insert(&record(5, LogLevel::Info, "second")).await.unwrap();

        let all = store.all().await.unwrap();
        assert_eq!(all[0].payload, b"first".to_vec());
        assert_eq!(all[1].payload, b"second".to_vec());
    }

    #[tokio::test]
    async fn delete_by_id_reports_presence() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        let id = store.insert(&record(1, LogLevel::Info, "x")).await.unwrap();

        assert!(store.delete_by_id(id).await.unwrap());
        assert!(!store.delete_by_id(id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_level_in_table_is_error() {
        let store = SqliteLogStore::open_in_memory().unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO logs (timestamp, level, encoding, log) VALUES (1, 'TRACE', 'raw', x'61')",
                [],
            )
            .unwrap();
        } // MutexGuard 해제 후 await 호출

        assert!(store.all().await.is_err());
    }

    #[tokio::test]
    async fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("logkeep.db");

        {
            let store = SqliteLogStore::open(&path).unwrap();
            store.insert(&record(1, LogLevel::Warn, "kept")).await.unwrap();
        }

        let reopened = SqliteLogStore::open(&path).unwrap();
        let all = reopened.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].level, LogLevel::Warn);
    }
}
