//! # logkeep-collector
//!
//! 로그 컬렉터.
//! 메시지를 한 줄로 포맷해 압축 정책에 따라 저장하고,
//! 보존 기간이 지난 레코드를 배치 단위로 정리하며,
//! 조건에 맞는 레코드를 `logs.txt` 한 파일로 내보낸다.
//!
//! ## 모듈
//! - `collector`: `LogCollector` (수집/정리/내보내기/라이프사이클)
//! - `codec`: 페이로드 압축/해제 (flate2)
//! - `format`: 로그 한 줄 포맷
//! - `trigger`: 내보내기 요청 콜백
//! - `hotkey`: 플랫폼별 기본 내보내기 단축키
//! - `scheduler`: 자동 정리 루프
//! - `sink`: 파일 시스템 내보내기 대상

pub mod codec;
pub mod collector;
pub mod format;
pub mod hotkey;
mod scheduler;
pub mod sink;
pub mod trigger;

pub use collector::LogCollector;
