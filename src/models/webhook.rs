//! # 웹훅 요청/응답 모델
//!
//! 대화형 에이전트 플랫폼이 `POST /`로 보내는 요청 본문과 돌려받는 응답 본문입니다.
//! 인텐트 분류와 슬롯 추출은 플랫폼에서 이미 끝난 상태로 들어옵니다.
//!
//! ```json
//! {
//!   "queryResult": {
//!     "intent": { "displayName": "order.add" },
//!     "parameters": { "food-item": ["Pizza", "Coke"], "number": [1, 2] },
//!     "outputContexts": [
//!       { "name": "projects/p/agent/sessions/abc123/contexts/ongoing-order" }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 웹훅 요청 본문
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub query_result: QueryResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub intent: IntentInfo,
    /// 슬롯 값은 리스트일 수도, 단일 값일 수도 있어 Value로 받습니다.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub output_contexts: Vec<OutputContext>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentInfo {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct OutputContext {
    pub name: String,
}

/// 웹훅 응답 본문: `{ "fulfillmentText": "..." }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
}

impl WebhookResponse {
    pub fn new(fulfillment_text: impl Into<String>) -> Self {
        Self {
            fulfillment_text: fulfillment_text.into(),
        }
    }
}

/// 이 백엔드가 처리하는 인텐트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    AddToOrder,
    RemoveFromOrder,
    CompleteOrder,
    TrackOrder,
}

/// 인텐트 표시 이름 → 인텐트 매핑 테이블
const INTENT_TABLE: [(&str, Intent); 4] = [
    ("order.add", Intent::AddToOrder),
    ("order.remove", Intent::RemoveFromOrder),
    ("order.complete", Intent::CompleteOrder),
    ("track.order", Intent::TrackOrder),
];

impl Intent {
    /// 표시 이름으로 인텐트를 찾습니다. 테이블에 없으면 None.
    pub fn from_display_name(name: &str) -> Option<Self> {
        INTENT_TABLE
            .iter()
            .find(|(display_name, _)| *display_name == name)
            .map(|(_, intent)| *intent)
    }
}

impl QueryResult {
    /// `food-item` 슬롯의 음식 이름 목록
    pub fn food_items(&self) -> Vec<String> {
        list_param(&self.parameters, "food-item")
            .into_iter()
            .filter_map(|value| match value {
                Value::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    /// `number` 슬롯의 수량 목록
    ///
    /// 숫자가 아닌 값은 NaN으로 남겨서 개수 짝맞춤이 깨지지 않게 하고,
    /// 유효성 검사는 워크플로우에 맡깁니다.
    pub fn quantities(&self) -> Vec<f64> {
        list_param(&self.parameters, "number")
            .into_iter()
            .map(|value| number_of(value).unwrap_or(f64::NAN))
            .collect()
    }

    /// `order_id` 슬롯. 없거나 숫자가 아니면 0 (어떤 주문과도 일치하지 않음)
    pub fn order_id(&self) -> i64 {
        self.parameters
            .get("order_id")
            .and_then(number_of)
            .filter(|n| n.is_finite())
            .map(|n| n.trunc() as i64)
            .unwrap_or(0)
    }

    /// 첫 번째 출력 컨텍스트의 이름. 세션 ID가 여기에 들어 있습니다.
    pub fn session_context_name(&self) -> Option<&str> {
        self.output_contexts.first().map(|ctx| ctx.name.as_str())
    }
}

/// 파라미터를 리스트로 읽습니다. 단일 값은 원소 하나짜리 리스트로, 없으면 빈 리스트로 취급합니다.
fn list_param<'a>(parameters: &'a Map<String, Value>, key: &str) -> Vec<&'a Value> {
    match parameters.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values.iter().collect(),
        Some(scalar) => vec![scalar],
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(parameters: Value) -> QueryResult {
        let body = json!({
            "queryResult": {
                "intent": { "displayName": "order.add" },
                "parameters": parameters,
                "outputContexts": [
                    { "name": "projects/p/agent/sessions/abc123/contexts/ongoing-order" }
                ]
            }
        });
        serde_json::from_value::<WebhookRequest>(body).unwrap().query_result
    }

    #[test]
    fn test_intent_table() {
        assert_eq!(Intent::from_display_name("order.add"), Some(Intent::AddToOrder));
        assert_eq!(Intent::from_display_name("track.order"), Some(Intent::TrackOrder));
        assert_eq!(Intent::from_display_name("order.cancel"), None);
    }

    #[test]
    fn test_list_and_scalar_parameters() {
        let q = query(json!({ "food-item": ["Pizza", "Coke"], "number": [1.0, 2] }));
        assert_eq!(q.food_items(), vec!["Pizza", "Coke"]);
        assert_eq!(q.quantities(), vec![1.0, 2.0]);

        let q = query(json!({ "food-item": "Samosa", "number": 3 }));
        assert_eq!(q.food_items(), vec!["Samosa"]);
        assert_eq!(q.quantities(), vec![3.0]);

        let q = query(json!({}));
        assert!(q.food_items().is_empty());
        assert!(q.quantities().is_empty());
    }

    #[test]
    fn test_non_numeric_quantity_keeps_its_slot() {
        let q = query(json!({ "food-item": ["Pizza"], "number": ["lots"] }));
        let quantities = q.quantities();
        assert_eq!(quantities.len(), 1);
        assert!(quantities[0].is_nan());
    }

    #[test]
    fn test_order_id_defaults_to_zero() {
        assert_eq!(query(json!({ "order_id": 42.0 })).order_id(), 42);
        assert_eq!(query(json!({ "order_id": "17" })).order_id(), 17);
        assert_eq!(query(json!({ "order_id": "abc" })).order_id(), 0);
        assert_eq!(query(json!({})).order_id(), 0);
    }

    #[test]
    fn test_response_uses_camel_case() {
        let body = serde_json::to_value(WebhookResponse::new("hi")).unwrap();
        assert_eq!(body, json!({ "fulfillmentText": "hi" }));
    }
}
