//! logkeep 핵심 에러 타입.
//!
//! 어댑터 crate는 이 타입을 그대로 반환하고,
//! 컬렉터는 모든 에러를 진단 채널(tracing)로 흡수한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 저장소 읽기/쓰기/삭제 실패
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 페이로드 압축/해제 실패
    #[error("코덱 에러: {0}")]
    Codec(String),

    /// 내보내기 파일 전달 실패
    #[error("내보내기 에러: {0}")]
    Export(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
