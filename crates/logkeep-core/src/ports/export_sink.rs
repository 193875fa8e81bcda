//! 내보내기 파일 전달 포트.
//!
//! 구현: `logkeep-collector::sink` (파일 시스템)

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::CoreError;

/// 내보낸 텍스트를 "다운로드" 가능한 파일로 전달하는 대상
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// `content`를 `file_name`으로 전달하고 위치 반환
    ///
    /// 실패 시 부분 파일을 남기지 않아야 한다.
    async fn deliver(&self, file_name: &str, content: &str) -> Result<PathBuf, CoreError>;
}
