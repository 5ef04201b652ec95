//! # 주문 모델 정의
//!
//! 대화 세션 하나가 작성 중인 주문 초안(`DraftOrder`)과
//! 저장된 주문의 추적 상태(`OrderStatus`)를 정의합니다.
//!
//! ## 초안의 불변 조건
//! - 모든 수량은 1 이상입니다. 수량이 0이 되는 항목은 목록에서 제거됩니다.
//! - 항목은 처음 추가된 순서를 유지합니다. 응답 문구의 나열 순서가 곧 이 순서입니다.
//! - 같은 항목을 다시 추가하면 수량을 합치지 않고 새 값으로 바꿉니다 (last write wins).
//! - 항목 이름은 메뉴 테이블(`COLLATE NOCASE`)과 같이 ASCII 대소문자를 구분하지 않습니다.
//!   표기는 처음 추가된 것을 유지합니다.

use serde::Serialize;
use std::fmt;

/// 음식 항목 수량. 초안 안에서는 항상 1 이상입니다.
pub type Quantity = u32;

/// 저장된 주문의 ID (DB가 발급하는 정수)
pub type OrderId = i64;

/// 초안의 한 줄: 음식 이름과 수량
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub food_item: String,
    pub quantity: Quantity,
}

impl OrderLine {
    fn matches(&self, food_item: &str) -> bool {
        self.food_item.eq_ignore_ascii_case(food_item)
    }
}

/// 아직 저장되지 않은 주문 초안
///
/// 항목은 삽입 순서를 유지하며, 응답 문구의 나열 순서가 곧 이 순서입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DraftOrder {
    lines: Vec<OrderLine>,
}

impl DraftOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 항목 하나를 병합합니다.
    ///
    /// - 이미 있는 항목이면 제자리에서 수량을 교체합니다 (순서와 첫 표기 유지).
    /// - 없는 항목이면 맨 뒤에 추가합니다.
    /// - 수량이 0이면 항목을 제거합니다.
    pub fn merge(&mut self, food_item: &str, quantity: Quantity) {
        if quantity == 0 {
            self.remove(food_item);
            return;
        }

        match self.lines.iter_mut().find(|line| line.matches(food_item)) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(OrderLine {
                food_item: food_item.to_string(),
                quantity,
            }),
        }
    }

    /// 항목을 제거합니다. 실제로 제거했으면 true를 반환합니다.
    pub fn remove(&mut self, food_item: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(food_item));
        self.lines.len() != before
    }

    pub fn quantity_of(&self, food_item: &str) -> Option<Quantity> {
        self.lines
            .iter()
            .find(|line| line.matches(food_item))
            .map(|line| line.quantity)
    }

    pub fn contains(&self, food_item: &str) -> bool {
        self.quantity_of(food_item).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines.iter()
    }
}

/// "2 Pizza, 1 Coke" 형태로 초안을 나열합니다.
impl fmt::Display for DraftOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", line.quantity, line.food_item)?;
        }
        Ok(())
    }
}

/// DB의 `order_items` 테이블 한 행 (메뉴 이름을 JOIN한 형태)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PersistedOrderItem {
    pub order_id: OrderId,
    pub food_item: String,
    pub quantity: i64,
    pub total_price: f64,
}

/// 주문 추적 상태
///
/// 상태 집합은 열려 있습니다. 운영 프로세스가 DB에 다른 상태 문자열을 쓸 수 있으므로
/// 알려지지 않은 값은 `Other`로 그대로 보존합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum OrderStatus {
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "in_progress" => OrderStatus::InProgress,
            "completed" => OrderStatus::Completed,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(raw),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_replaces_quantity_in_place() {
        let mut draft = DraftOrder::new();
        draft.merge("pizza", 1);
        draft.merge("coke", 2);
        draft.merge("pizza", 3);

        assert_eq!(draft.len(), 2);
        assert_eq!(draft.quantity_of("pizza"), Some(3));
        // pizza가 먼저 추가되었으므로 여전히 첫 번째
        assert_eq!(draft.to_string(), "3 pizza, 2 coke");
    }

    #[test]
    fn test_names_ignore_ascii_case() {
        let mut draft = DraftOrder::new();
        draft.merge("Pizza", 1);
        draft.merge("coke", 1);
        draft.merge("pizza", 2);

        assert_eq!(draft.len(), 2);
        assert_eq!(draft.quantity_of("PIZZA"), Some(2));
        assert_eq!(draft.to_string(), "2 Pizza, 1 coke");

        assert!(draft.remove("COKE"));
        assert_eq!(draft.to_string(), "2 Pizza");
    }

    #[test]
    fn test_merge_zero_removes_item() {
        let mut draft = DraftOrder::new();
        draft.merge("fries", 2);
        draft.merge("fries", 0);

        assert!(draft.is_empty());
        assert!(!draft.contains("fries"));
    }

    #[test]
    fn test_remove_reports_whether_item_existed() {
        let mut draft = DraftOrder::new();
        draft.merge("samosa", 1);

        assert!(!draft.remove("burger"));
        assert_eq!(draft.len(), 1);
        assert!(draft.remove("samosa"));
        assert!(draft.is_empty());
        assert_eq!(draft.to_string(), "");
    }

    #[test]
    fn test_order_status_round_trips_unknown_values() {
        assert_eq!(OrderStatus::from("in_progress".to_string()), OrderStatus::InProgress);
        let custom = OrderStatus::from("out_for_delivery".to_string());
        assert_eq!(custom, OrderStatus::Other("out_for_delivery".to_string()));
        assert_eq!(custom.to_string(), "out_for_delivery");
    }
}
