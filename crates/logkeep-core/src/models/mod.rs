//! logkeep 도메인 모델.
//!
//! 저장 단위인 로그 레코드와 수집/내보내기/정리 과정에서 주고받는 값들을 정의한다.

pub mod filter;
pub mod log_record;
pub mod message;
pub mod report;
