//! 파일 시스템 내보내기 대상.
//!
//! 브라우저 다운로드에 해당하는 부수효과: 지정 디렉토리에 파일을 만든다.
//! 호출마다 고유한 임시 파일에 쓴 뒤 rename하므로 실패해도 부분 파일이 남지 않고,
//! 동시에 내보내도 서로의 임시 파일을 건드리지 않는다.

use async_trait::async_trait;
use logkeep_core::error::CoreError;
use logkeep_core::ports::export_sink::ExportSink;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::{debug, info};

/// 같은 디렉토리의 고유 임시 파일에 쓰고 대상 이름으로 교체
fn write_atomically(dir: &Path, target: &Path, content: &[u8]) -> Result<(), CoreError> {
    let mut partial = Builder::new()
        .prefix(".logkeep-")
        .suffix(".partial")
        .tempfile_in(dir)
        .map_err(|e| CoreError::Export(format!("임시 파일 생성 실패: {}: {e}", dir.display())))?;

    partial.write_all(content).map_err(|e| {
        CoreError::Export(format!("파일 쓰기 실패: {}: {e}", partial.path().display()))
    })?;
    debug!("임시 파일 작성: {}", partial.path().display());

    // 실패하면 임시 파일은 drop 시 삭제된다
    partial.persist(target).map_err(|e| {
        CoreError::Export(format!("파일 이동 실패: {}: {}", target.display(), e.error))
    })?;
    Ok(())
}

/// 디렉토리에 파일을 떨어뜨리는 `ExportSink`
#[derive(Debug, Clone)]
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ExportSink for FileExportSink {
    async fn deliver(&self, file_name: &str, content: &str) -> Result<PathBuf, CoreError> {
        if file_name.is_empty() || Path::new(file_name).file_name() != Some(OsStr::new(file_name)) {
            return Err(CoreError::Export(format!(
                "파일 이름에 경로를 포함할 수 없습니다: {file_name}"
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            CoreError::Export(format!("디렉토리 생성 실패: {}: {e}", self.dir.display()))
        })?;

        let target = self.dir.join(file_name);
        let dir = self.dir.clone();
        let bytes = content.as_bytes().to_vec();
        let destination = target.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &destination, &bytes))
            .await
            .map_err(|e| CoreError::Internal(format!("내보내기 작업 실패: {e}")))??;

        info!(
            "로그 내보내기 파일 생성: {} ({}바이트)",
            target.display(),
            content.len()
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn writes_file_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileExportSink::new(dir.path().join("exports"));

        let path = sink.deliver("logs.txt", "a\nb").await.unwrap();
        assert_eq!(path, dir.path().join("exports").join("logs.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb");
        let entries = std::fs::read_dir(dir.path().join("exports")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn replaces_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileExportSink::new(dir.path());

        sink.deliver("logs.txt", "old").await.unwrap();
        let path = sink.deliver("logs.txt", "new").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
    }

    #[tokio::test]
    async fn rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileExportSink::new(dir.path());

        assert!(sink.deliver("../escape.txt", "x").await.is_err());
        assert!(sink.deliver("", "x").await.is_err());
    }

    #[tokio::test]
    async fn unwritable_target_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        // 대상 디렉토리 자리에 일반 파일을 둔다
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let sink = FileExportSink::new(&blocker);

        assert!(sink.deliver("logs.txt", "x").await.is_err());
        assert!(!blocker.join("logs.txt").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_deliveries_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(FileExportSink::new(dir.path()));
        let first = "a".repeat(4 * 1024 * 1024);
        let second = "b".repeat(4 * 1024 * 1024);

        for _ in 0..5 {
            let (s1, c1) = (sink.clone(), first.clone());
            let (s2, c2) = (sink.clone(), second.clone());
            let a = tokio::spawn(async move { s1.deliver("logs.txt", &c1).await });
            let b = tokio::spawn(async move { s2.deliver("logs.txt", &c2).await });

            assert!(a.await.unwrap().is_ok());
            assert!(b.await.unwrap().is_ok());

            let content = std::fs::read_to_string(dir.path().join("logs.txt")).unwrap();
            assert!(content == first || content == second);
        }
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
