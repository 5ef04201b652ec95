//! # 주문 처리 워크플로우 (Order Fulfillment Workflow)
//!
//! 세션별 주문 초안에 항목을 추가/삭제하고, 완료 시 초안을 DB의 주문과
//! 추적 레코드로 넘기는 과정을 담당합니다.
//!
//! ## 세션 상태 머신
//! ```text
//! NO_ORDER ──add──▶ DRAFTING ──add/remove──▶ DRAFTING
//!                      │
//!                   finalize
//!                      ▼
//!                 (FINALIZING) ──성공/실패 모두──▶ NO_ORDER
//! ```
//!
//! finalize는 가장 먼저 `take_and_clear()`로 초안을 꺼냅니다.
//! 따라서 저장이 실패하더라도 세션에는 초안이 남지 않고,
//! 같은 초안이 두 번 저장되는 일도 없습니다.
//!
//! 사용자 입력 문제(수량 불일치, 초안 없음)와 저장 실패는 에러가 아니라
//! 안내 문구로 돌려줍니다. `Err`는 주문 조회(track) 실패처럼 복구할 수 없는 경우만 씁니다.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::db::OrderGateway;
use crate::error::AppError;
use crate::models::{DraftOrder, OrderId, OrderStatus, Quantity};
use crate::services::session_store::SessionStore;

pub const CLARIFY_ITEMS: &str = "Please specify food items and quantities clearly.";
pub const NO_ORDER_TO_EDIT: &str = "No order found. Please place a new order.";
pub const ORDER_NOT_FOUND: &str =
    "I'm having trouble finding your order. Please place a new order.";
pub const BACKEND_ERROR: &str =
    "Sorry, I couldn't process your order due to a backend error. Please place a new order.";

/// 워크플로우. 세션 저장소와 게이트웨이를 주입받습니다.
pub struct OrderWorkflow {
    sessions: Arc<dyn SessionStore>,
    gateway: Arc<dyn OrderGateway>,
    gateway_timeout: Duration,
}

impl OrderWorkflow {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        gateway: Arc<dyn OrderGateway>,
        gateway_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            gateway,
            gateway_timeout,
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// `order.add`: 음식 항목과 수량을 초안에 병합합니다.
    ///
    /// `food_items`와 `quantities`는 같은 위치끼리 짝을 이룹니다.
    /// 개수가 다르거나, 항목이 하나도 없거나, 수량이 1 이상의 정수가 아니면
    /// 초안을 건드리지 않고 다시 말해달라는 안내를 돌려줍니다.
    pub async fn add(
        &self,
        session_id: &str,
        food_items: &[String],
        quantities: &[f64],
    ) -> Result<String, AppError> {
        let Some(items) = pair_items(food_items, quantities) else {
            tracing::debug!(
                "Unclear add request for session {}: items={:?} quantities={:?}",
                session_id,
                food_items,
                quantities
            );
            return Ok(CLARIFY_ITEMS.to_string());
        };

        let draft = self.sessions.merge_items(session_id, &items).await;
        tracing::debug!("Session {} draft is now: {}", session_id, draft);

        Ok(format!("Your current order: {}. Anything else?", draft))
    }

    /// `order.remove`: 초안에서 항목을 제거합니다.
    ///
    /// 제거한 항목, 초안에 없던 항목, 남은 초안(또는 비었다는 안내)을
    /// 순서대로 이어 붙여 응답합니다. 각 문구는 앞의 문구를 덮어쓰지 않습니다.
    pub async fn remove(&self, session_id: &str, food_items: &[String]) -> Result<String, AppError> {
        let outcome = self.sessions.remove_items(session_id, food_items).await;

        let Some(remaining) = outcome.remaining else {
            return Ok(NO_ORDER_TO_EDIT.to_string());
        };

        let mut parts = Vec::new();
        if !outcome.removed.is_empty() {
            parts.push(format!(
                "Removed {} from your order.",
                outcome.removed.join(", ")
            ));
        }
        if !outcome.not_found.is_empty() {
            parts.push(format!(
                "No such items {} in your current order.",
                outcome.not_found.join(", ")
            ));
        }
        if remaining.is_empty() {
            parts.push("Your order is empty!".to_string());
        } else {
            parts.push(format!("Your updated order: {}", remaining));
        }

        tracing::debug!(
            "Session {} removed={:?} not_found={:?}",
            session_id,
            outcome.removed,
            outcome.not_found
        );

        Ok(parts.join(" "))
    }

    /// `order.complete`: 초안을 주문으로 저장하고 추적을 시작합니다.
    ///
    /// 1. 초안을 꺼내면서 세션에서 삭제 (성공/실패와 관계없이 세션은 NO_ORDER로)
    /// 2. 한 트랜잭션 안에서 주문 ID 발급 → 항목 저장 → 추적 레코드(in_progress) 저장
    /// 3. 커밋 후 총 금액을 조회하여 확인 문구 작성
    ///
    /// 항목 하나라도 실패하거나 제한 시간을 넘기면 트랜잭션 전체가 롤백됩니다.
    pub async fn finalize(&self, session_id: &str) -> Result<String, AppError> {
        let draft = match self.sessions.take_and_clear(session_id).await {
            Some(draft) if !draft.is_empty() => draft,
            // 빈 초안은 "주문 없음"과 같으므로 저장하지 않습니다
            _ => return Ok(ORDER_NOT_FOUND.to_string()),
        };

        let order_id = match self
            .with_timeout("saving order", self.save_order(&draft))
            .await
        {
            Ok(order_id) => order_id,
            Err(err) => {
                tracing::error!("Failed to save order for session {}: {}", session_id, err);
                return Ok(BACKEND_ERROR.to_string());
            }
        };

        tracing::info!(
            "Placed order {} for session {}: {}",
            order_id,
            session_id,
            draft
        );

        // 주문은 이미 커밋되었으므로, 합계 조회가 실패해도 주문 ID는 알려줍니다.
        match self
            .with_timeout("order total lookup", self.gateway.get_total_price(order_id))
            .await
        {
            Ok(total) => Ok(format!(
                "Your order has been placed with order id: {}. Total amount payable is {:.2}. Thank you!",
                order_id, total
            )),
            Err(err) => {
                tracing::warn!("Could not compute total for order {}: {}", order_id, err);
                Ok(format!(
                    "Your order has been placed with order id: {}. Thank you!",
                    order_id
                ))
            }
        }
    }

    /// `track.order`: 주문 추적 상태를 조회합니다.
    pub async fn track(&self, order_id: OrderId) -> Result<String, AppError> {
        let status = self
            .with_timeout("order status lookup", self.gateway.get_order_status(order_id))
            .await?;

        Ok(match status {
            Some(status) => format!("The order status for order id {} is: {}", order_id, status),
            None => format!("No order found with order id {}", order_id),
        })
    }

    async fn save_order(&self, draft: &DraftOrder) -> Result<OrderId, AppError> {
        let mut tx = self.gateway.begin().await?;

        let order_id = tx.allocate_order_id().await?;
        for line in draft.iter() {
            tx.insert_order_item(&line.food_item, line.quantity, order_id)
                .await?;
        }
        tx.insert_order_tracking(order_id, &OrderStatus::InProgress)
            .await?;

        tx.commit().await?;
        Ok(order_id)
    }

    /// 게이트웨이 호출을 제한 시간으로 감쌉니다. 시간 초과는 `AppError::Timeout`.
    /// 시간이 초과되면 future가 drop되므로 열려 있던 트랜잭션도 롤백됩니다.
    async fn with_timeout<T>(
        &self,
        what: &str,
        call: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.gateway_timeout, call)
            .await
            .map_err(|_| AppError::Timeout(what.to_string()))?
    }
}

/// 음식 항목과 수량을 짝지어 검증합니다. 하나라도 문제가 있으면 None.
fn pair_items(food_items: &[String], quantities: &[f64]) -> Option<Vec<(String, Quantity)>> {
    if food_items.is_empty() || food_items.len() != quantities.len() {
        return None;
    }

    food_items
        .iter()
        .zip(quantities)
        .map(|(food_item, &quantity)| Some((food_item.clone(), to_quantity(quantity)?)))
        .collect()
}

/// 플랫폼은 수량을 2.0 같은 실수로 보냅니다. 1 이상의 정수만 받아들입니다.
fn to_quantity(value: f64) -> Option<Quantity> {
    let in_range = value.is_finite() && value >= 1.0 && value <= f64::from(Quantity::MAX);
    (in_range && value.fract() == 0.0).then(|| value as Quantity)
}
