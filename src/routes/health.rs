//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /health` → `{ "status": "ok", "active_sessions": 3 }`
//!
//! 로드밸런서나 컨테이너 오케스트레이터가 서버 상태를 확인할 때 사용합니다.
//! `active_sessions`는 현재 초안을 작성 중인 대화 세션 수입니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::webhook::AppState;

/// `GET /health`: 서버 상태를 확인합니다. 이 핸들러는 실패하지 않습니다.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let active_sessions = state.workflow.sessions().len().await;

    Json(json!({
        "status": "ok",
        "active_sessions": active_sessions
    }))
}
