//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 어댑터 crate가 이 trait들을 구현하며,
//! 컬렉터는 `Arc<dyn T>`로 주입받는다.

pub mod export_sink;
pub mod storage;
