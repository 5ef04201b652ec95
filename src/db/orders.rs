//! # 주문 데이터베이스 쿼리 모듈
//!
//! 주문 ID 발급, 주문 항목 저장, 합계 조회를 담당하는 SQL 쿼리 함수들입니다.
//!
//! 쓰기 함수들은 `SqlitePool`이 아니라 `&mut SqliteConnection`을 받습니다.
//! 호출하는 쪽이 트랜잭션을 열고 넘겨주면(`&mut *tx`), 한 주문의 모든 쓰기가
//! 같은 트랜잭션 안에서 실행되어 전부 커밋되거나 전부 롤백됩니다.

use crate::error::AppError;
use crate::models::{OrderId, PersistedOrderItem, Quantity};
use sqlx::{SqliteConnection, SqlitePool};

/// 새 주문 ID를 발급합니다.
///
/// `orders` 테이블은 AUTOINCREMENT이므로 한 번 커밋된 ID는 다시 나오지 않습니다.
/// 트랜잭션이 롤백되면 발급도 함께 취소되는데, 그 ID로 저장된 것이 없으므로 문제없습니다.
pub async fn allocate_order_id(conn: &mut SqliteConnection) -> Result<OrderId, AppError> {
    let result = sqlx::query("INSERT INTO orders DEFAULT VALUES")
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

/// 주문 항목 한 줄을 저장합니다.
///
/// 가격은 `food_items` 메뉴에서 가져와 `price * quantity`로 계산합니다.
/// 메뉴에 없는 항목이면 삽입된 행이 0개이므로 실패로 처리합니다.
pub async fn insert_order_item(
    conn: &mut SqliteConnection,
    food_item: &str,
    quantity: Quantity,
    order_id: OrderId,
) -> Result<(), AppError> {
    let quantity = i64::from(quantity);

    let result = sqlx::query(
        r#"
        INSERT INTO order_items (order_id, item_id, quantity, total_price)
        SELECT ?, item_id, ?, price * ?
        FROM food_items
        WHERE name = ?
        "#,
        // ↑ name 컬럼이 COLLATE NOCASE이므로 대소문자를 구분하지 않고 찾습니다.
    )
    .bind(order_id)
    .bind(quantity)
    .bind(quantity)
    .bind(food_item)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Internal(format!(
            "Food item not on the menu: {}",
            food_item
        )));
    }

    Ok(())
}

/// 주문의 총 금액을 계산합니다. 항목이 없으면 0.
pub async fn get_total_order_price(pool: &SqlitePool, order_id: OrderId) -> Result<f64, AppError> {
    let total: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_price), 0.0) FROM order_items WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// 저장된 주문의 항목들을 메뉴 이름과 함께 조회합니다.
pub async fn list_order_items(
    pool: &SqlitePool,
    order_id: OrderId,
) -> Result<Vec<PersistedOrderItem>, AppError> {
    let items = sqlx::query_as::<_, PersistedOrderItem>(
        r#"
        SELECT oi.order_id, f.name AS food_item, oi.quantity, oi.total_price
        FROM order_items oi
        JOIN food_items f ON f.item_id = oi.item_id
        WHERE oi.order_id = ?
        ORDER BY f.name
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}
