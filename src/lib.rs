//! # vcups: 대화형 음식 주문 에이전트의 웹훅 백엔드
//!
//! 플랫폼이 인텐트(인텐트 이름 + 슬롯 파라미터 + 세션 ID)를 보내면,
//! 세션별 주문 초안을 관리하고 완료 시 주문을 저장한 뒤 상태를 알려줍니다.
//!
//! 계층 구조:
//! ```text
//! routes (디스패처) → services (워크플로우, 세션 저장소) → db (게이트웨이, SQL)
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
