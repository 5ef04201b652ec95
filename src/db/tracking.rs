//! # 주문 추적 DB 쿼리
//!
//! `order_tracking` 테이블: 주문 ID별 현재 상태 한 줄

use crate::error::AppError;
use crate::models::{OrderId, OrderStatus};
use sqlx::{SqliteConnection, SqlitePool};

pub async fn insert_order_tracking(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    status: &OrderStatus,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO order_tracking (order_id, status) VALUES (?, ?)")
        .bind(order_id)
        .bind(status.as_str())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// 추적 레코드가 없으면 None
pub async fn get_order_status(
    pool: &SqlitePool,
    order_id: OrderId,
) -> Result<Option<OrderStatus>, AppError> {
    let status: Option<String> =
        sqlx::query_scalar("SELECT status FROM order_tracking WHERE order_id = ?")
            .bind(order_id)
            .fetch_optional(pool)
            .await?;

    Ok(status.map(OrderStatus::from))
}
