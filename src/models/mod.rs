//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `order`: 주문 초안(DraftOrder)과 주문 추적 상태(OrderStatus)
//! - `webhook`: 웹훅 요청/응답 본문과 인텐트 매핑
//!
//! `pub use X::*;`로 재공개하여 `crate::models::DraftOrder`처럼 짧게 접근합니다.

pub mod order;
pub mod webhook;

pub use order::*;
pub use webhook::*;
