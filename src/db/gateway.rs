//! # 영속 게이트웨이 (Persistence Gateway)
//!
//! 주문 워크플로우가 저장소에 요구하는 좁은 계약입니다.
//! 워크플로우는 구체적인 DB를 모르고 `OrderGateway` 트레이트만 사용하므로,
//! 테스트에서는 가짜 구현을 주입할 수 있습니다.
//!
//! ## 트랜잭션 계약
//! ```text
//! begin() → allocate_order_id() → insert_order_item() × N → insert_order_tracking() → commit()
//! ```
//! `OrderTransaction`을 `commit()` 없이 버리면(drop) 그때까지의 쓰기가 모두 롤백됩니다.
//! 항목 하나라도 실패하면 주문 행, 항목 행, 추적 행이 하나도 남지 않습니다.

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::db;
use crate::error::AppError;
use crate::models::{OrderId, OrderStatus, Quantity};

/// 주문 한 건을 저장하는 동안 열려 있는 트랜잭션
#[async_trait]
pub trait OrderTransaction: Send {
    async fn allocate_order_id(&mut self) -> Result<OrderId, AppError>;

    async fn insert_order_item(
        &mut self,
        food_item: &str,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<(), AppError>;

    async fn insert_order_tracking(
        &mut self,
        order_id: OrderId,
        status: &OrderStatus,
    ) -> Result<(), AppError>;

    /// 모든 쓰기를 확정합니다. 호출하지 않고 버리면 롤백됩니다.
    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

/// 워크플로우가 사용하는 저장소 계약
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, AppError>;

    async fn get_order_status(&self, order_id: OrderId) -> Result<Option<OrderStatus>, AppError>;

    async fn get_total_price(&self, order_id: OrderId) -> Result<f64, AppError>;
}

/// SQLite 기반 게이트웨이
///
/// SqlitePool은 내부적으로 Arc이므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct SqliteGateway {
    pool: SqlitePool,
}

impl SqliteGateway {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderGateway for SqliteGateway {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteOrderTransaction { tx }))
    }

    async fn get_order_status(&self, order_id: OrderId) -> Result<Option<OrderStatus>, AppError> {
        db::get_order_status(&self.pool, order_id).await
    }

    async fn get_total_price(&self, order_id: OrderId) -> Result<f64, AppError> {
        db::get_total_order_price(&self.pool, order_id).await
    }
}

/// `sqlx::Transaction`은 Drop 시 자동으로 롤백됩니다.
struct SqliteOrderTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl OrderTransaction for SqliteOrderTransaction {
    async fn allocate_order_id(&mut self) -> Result<OrderId, AppError> {
        db::allocate_order_id(&mut *self.tx).await
    }

    async fn insert_order_item(
        &mut self,
        food_item: &str,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<(), AppError> {
        db::insert_order_item(&mut *self.tx, food_item, quantity, order_id).await
    }

    async fn insert_order_tracking(
        &mut self,
        order_id: OrderId,
        status: &OrderStatus,
    ) -> Result<(), AppError> {
        db::insert_order_tracking(&mut *self.tx, order_id, status).await
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
