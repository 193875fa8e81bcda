//! # logkeep-storage
//!
//! 로컬 로그 저장소 어댑터.
//! `LogStore` 포트를 SQLite 파일(세션 간 유지)과 인메모리 맵으로 구현한다.
//!
//! ## 모듈
//! - `sqlite`: SQLite 로그 테이블 (WAL, 버전 마이그레이션)
//! - `memory`: 인메모리 로그 테이블 (테스트/임시 세션용)
//! - `migration`: 스키마 마이그레이션

pub mod memory;
pub mod migration;
pub mod sqlite;
