//! 정리/내보내기 결과 리포트.

use serde::Serialize;
use std::path::PathBuf;

/// 만료 정리 1회 실행 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// 기준 시각 (이 시각 미만 레코드가 대상)
    pub cutoff: i64,
    /// 삭제된 레코드 수
    pub deleted: usize,
    /// ID가 없어 건너뛴 레코드 수
    pub skipped: usize,
    /// 배치 사이 휴식 횟수
    pub pauses: usize,
    /// 중간 실패 없이 끝까지 진행했는지
    pub completed: bool,
}

/// 내보내기 결과 (파일이 전달된 경우에만 생성)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// 전달된 파일 위치
    pub location: PathBuf,
    /// 포함된 레코드 수
    pub records: usize,
    /// 파일 크기 (바이트)
    pub bytes: usize,
}
