//! # 웹훅 디스패처 (Intent Dispatcher)
//!
//! 대화형 에이전트 플랫폼이 호출하는 단일 엔드포인트입니다.
//!
//! ## 엔드포인트
//! - `POST /` → 인텐트에 맞는 워크플로우 연산을 실행하고 `{ "fulfillmentText": ... }` 반환
//!
//! ## 인텐트 매핑
//! | 인텐트 | 워크플로우 연산 | 세션 ID 필요 |
//! |--------|----------------|-------------|
//! | `order.add` | `OrderWorkflow::add` | O |
//! | `order.remove` | `OrderWorkflow::remove` | O |
//! | `order.complete` | `OrderWorkflow::finalize` | O |
//! | `track.order` | `OrderWorkflow::track` | X |
//!
//! ## 응답 상태 코드
//! - 200: 정상 처리 (사용자 안내 문구 포함)
//! - 400: 알 수 없는 인텐트, JSON 형식 오류, 세션 컨텍스트 없음
//! - 500: 저장소 오류, 타임아웃, 핸들러 패닉 (`CatchPanicLayer`)

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    error::AppError,
    models::*,
    services::{extract_session_id, OrderWorkflow},
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// Axum의 State Extractor는 요청마다 clone하므로 Arc로 감쌉니다.
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<OrderWorkflow>,
}

/// `POST /`: 웹훅 이벤트 하나를 처리합니다.
///
/// JSON 파싱 실패(`JsonRejection`)는 `AppError::BadRequest`(400)로 변환됩니다.
pub async fn handle_webhook(
    State(state): State<AppState>,
    payload: Result<Json<WebhookRequest>, JsonRejection>,
) -> Result<Json<WebhookResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let query = request.query_result;

    let intent = Intent::from_display_name(&query.intent.display_name).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Intent not recognized: {}",
            query.intent.display_name
        ))
    })?;

    tracing::debug!("Dispatching intent {:?}", intent);

    let workflow = &state.workflow;
    let fulfillment_text = match intent {
        Intent::AddToOrder => {
            let session_id = session_id_of(&query)?;
            workflow
                .add(&session_id, &query.food_items(), &query.quantities())
                .await?
        }
        Intent::RemoveFromOrder => {
            let session_id = session_id_of(&query)?;
            workflow.remove(&session_id, &query.food_items()).await?
        }
        Intent::CompleteOrder => {
            let session_id = session_id_of(&query)?;
            workflow.finalize(&session_id).await?
        }
        Intent::TrackOrder => workflow.track(query.order_id()).await?,
    };

    Ok(Json(WebhookResponse::new(fulfillment_text)))
}

fn session_id_of(query: &QueryResult) -> Result<String, AppError> {
    query
        .session_context_name()
        .and_then(extract_session_id)
        .ok_or_else(|| AppError::BadRequest("Missing session context".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, SqliteGateway};
    use crate::routes::router;
    use crate::services::InMemorySessionStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    async fn build_test_app() -> Router {
        let pool = test_pool().await;
        let workflow = OrderWorkflow::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(SqliteGateway::new(pool)),
            Duration::from_secs(5),
        );
        router(AppState {
            workflow: Arc::new(workflow),
        })
    }

    fn event(intent: &str, session: &str, parameters: Value) -> Value {
        json!({
            "queryResult": {
                "intent": { "displayName": intent },
                "parameters": parameters,
                "outputContexts": [
                    { "name": format!("projects/vcups/agent/sessions/{}/contexts/ongoing-order", session) }
                ]
            }
        })
    }

    async fn post(app: &Router, body: String) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn send(app: &Router, body: Value) -> (StatusCode, String) {
        let (status, json) = post(app, body.to_string()).await;
        let text = json["fulfillmentText"].as_str().unwrap_or_default().to_string();
        (status, text)
    }

    #[tokio::test]
    async fn test_full_conversation() {
        let app = build_test_app().await;

        let (status, text) = send(
            &app,
            event("order.add", "abc", json!({ "food-item": ["Burger", "Fries"], "number": [2, 1] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Your current order: 2 Burger, 1 Fries. Anything else?");

        let (_, text) = send(&app, event("order.complete", "abc", json!({}))).await;
        assert_eq!(
            text,
            "Your order has been placed with order id: 1. Total amount payable is 16.00. Thank you!"
        );

        let (_, text) = send(&app, event("track.order", "other", json!({ "order_id": 1 }))).await;
        assert_eq!(text, "The order status for order id 1 is: in_progress");

        let (_, text) = send(&app, event("order.complete", "abc", json!({}))).await;
        assert_eq!(
            text,
            "I'm having trouble finding your order. Please place a new order."
        );
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let app = build_test_app().await;

        send(&app, event("order.add", "a", json!({ "food-item": ["Pizza"], "number": [1] }))).await;
        let (_, text) = send(&app, event("order.remove", "b", json!({ "food-item": ["Pizza"] }))).await;
        assert_eq!(text, "No order found. Please place a new order.");
    }

    #[tokio::test]
    async fn test_track_without_order_id() {
        let app = build_test_app().await;
        let (status, text) = send(&app, event("track.order", "abc", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "No order found with order id 0");
    }

    #[tokio::test]
    async fn test_unknown_intent_is_client_error() {
        let app = build_test_app().await;
        let (status, json) = post(&app, event("order.cancel", "abc", json!({})).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_malformed_event_is_client_error() {
        let app = build_test_app().await;

        let (status, _) = post(&app, "{ not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(&app, json!({ "queryResult": {} }).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing_context = json!({
            "queryResult": {
                "intent": { "displayName": "order.add" },
                "parameters": { "food-item": ["Pizza"], "number": [1] }
            }
        });
        let (status, _) = post(&app, missing_context.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = build_test_app().await;
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
