//! 인메모리 로그 저장소.
//!
//! SQLite 어댑터와 같은 의미론(자동 증가 ID, `(timestamp, id)` 오름차순)을
//! `BTreeMap`으로 구현한다. 테스트와 영속성이 필요 없는 세션용.

use async_trait::async_trait;
use logkeep_core::error::CoreError;
use logkeep_core::models::log_record::LogRecord;
use logkeep_core::ports::storage::LogStore;
use parking_lot::Mutex;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, LogRecord>,
    next_id: i64,
}

impl Table {
    fn select<F>(&self, predicate: F) -> Vec<LogRecord>
    where
        F: Fn(&LogRecord) -> bool,
    {
        let mut records: Vec<LogRecord> = self
            .rows
            .values()
            .filter(|record| predicate(*record))
            .cloned()
            .collect();
        // BTreeMap은 id 순서 — timestamp 기준으로 안정 정렬
        records.sort_by_key(|record| record.timestamp);
        records
    }
}

/// 인메모리 `LogStore` 구현
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    table: Mutex<Table>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn insert(&self, record: &LogRecord) -> Result<i64, CoreError> {
        let mut table = self.table.lock();
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, record.clone().with_id(id));
        Ok(id)
    }

    async fn find_before(&self, cutoff: i64) -> Result<Vec<LogRecord>, CoreError> {
        Ok(self.table.lock().select(|r| r.timestamp < cutoff))
    }

    async fn find_between(
        &self,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<LogRecord>, CoreError> {
        Ok(self.table.lock().select(|r| {
            start.map_or(true, |s| r.timestamp >= s) && end.map_or(true, |e| r.timestamp <= e)
        }))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, CoreError> {
        Ok(self.table.lock().rows.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.table.lock().rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logkeep_core::models::log_record::{LogLevel, PayloadEncoding};

    fn record(timestamp: i64, text: &str) -> LogRecord {
        LogRecord::new(
            text.as_bytes().to_vec(),
            PayloadEncoding::Raw,
            timestamp,
            LogLevel::Info,
        )
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = MemoryLogStore::new();
        let first = store.insert(&record(1, "a")).await.unwrap();
        store.delete_by_id(first).await.unwrap();
        let second = store.insert(&record(2, "b")).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn ranges_match_sqlite_semantics() {
        let store = MemoryLogStore::new();
        for ts in [30, 10, 20, 10] {
            store.insert(&record(ts, "x")).await.unwrap();
        }

        let before: Vec<i64> = store
            .find_before(20)
            .await
            .unwrap()
            .iter()
            .map(|r| r.timestamp)
            .collect();
        assert_eq!(before, vec![10, 10]);

        let between: Vec<i64> = store
            .find_between(Some(10), Some(20))
            .await
            .unwrap()
            .iter()
            .map(|r| r.timestamp)
            .collect();
        assert_eq!(between, vec![10, 10, 20]);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order() {
        let store = MemoryLogStore::new();
        store.insert(&record(5, "first")).await.unwrap();
        store.insert(&record(5, "second")).await.unwrap();

        let all = store.all().await.unwrap();
        assert_eq!(all[0].payload, b"first".to_vec());
        assert_eq!(all[1].payload, b"second".to_vec());
        assert!(all.iter().all(|r| r.id.is_some()));
    }

    #[tokio::test]
    async fn delete_and_count() {
        let store = MemoryLogStore::new();
        let id = store.insert(&record(1, "x")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.delete_by_id(id).await.unwrap());
        assert!(!store.delete_by_id(id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
