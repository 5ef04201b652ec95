//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 워크플로우(services/)는 이 함수들을 직접 부르지 않고 `OrderGateway`를 통해 사용합니다.
//!
//! 각 하위 모듈:
//! - `gateway`: 워크플로우가 의존하는 저장소 계약과 SQLite 구현
//! - `orders`: 주문 ID 발급, 주문 항목 저장, 합계 조회
//! - `tracking`: 주문 추적 레코드 저장/조회

pub mod gateway;
pub mod orders;
pub mod tracking;

pub use gateway::*;
pub use orders::*;
pub use tracking::*;

/// 테스트용 인메모리 DB를 만들고 마이그레이션을 적용합니다.
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로 연결을 1개로 제한합니다.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}
