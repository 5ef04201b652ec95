//! # 서비스 계층
//!
//! 라우트 핸들러와 DB 계층 사이의 비즈니스 로직입니다.
//! - `context`: 출력 컨텍스트 이름에서 세션 ID 추출
//! - `fulfillment`: 주문 추가/삭제/완료/조회 워크플로우
//! - `session_store`: 세션별 주문 초안 저장소

pub mod context;
pub mod fulfillment;
pub mod session_store;

pub use context::*;
pub use fulfillment::OrderWorkflow;
pub use session_store::{InMemorySessionStore, RemovalOutcome, SessionStore};
