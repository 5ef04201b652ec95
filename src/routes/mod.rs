//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 구성을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `webhook`: 인텐트 이벤트를 워크플로우로 보내는 디스패처

pub mod health;
pub mod webhook;

pub use health::*;
pub use webhook::*;

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::error::AppError;

/// 애플리케이션 라우터를 구성합니다. `main`과 테스트가 같은 라우터를 사용합니다.
///
/// 레이어는 아래에서 위로 감싸므로, 요청은 Trace → CORS → CatchPanic → 핸들러 순으로 지나갑니다.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/", post(handle_webhook))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// 핸들러가 패닉하면 프로세스를 죽이지 않고 일반적인 500 응답을 돌려줍니다.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal(format!("Handler panicked: {}", detail)).into_response()
}
