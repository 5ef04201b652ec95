//! # 에러 처리 모듈
//!
//! 웹훅 처리 중 발생할 수 있는 모든 에러 타입을 정의합니다.
//! 각 계층(db → services → routes)은 `Result<T, AppError>`를 반환하고,
//! 최종적으로 라우트 경계에서 한 번만 로그를 남기고 HTTP 응답으로 변환됩니다.
//!
//! 에러 분류:
//! - 클라이언트 에러 (400): 알 수 없는 인텐트, 형식이 잘못된 이벤트
//! - 서버 에러 (500): DB 오류, 게이트웨이 타임아웃, 기타 내부 오류
//!
//! 사용자에게 보여줄 안내 문구("주문을 찾을 수 없습니다" 등)는 에러가 아니라
//! 정상 응답(`fulfillmentText`)으로 처리합니다. 이 모듈은 그 밖의 실패만 다룹니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 잘못된 요청 (HTTP 400)
    /// 인식할 수 없는 인텐트나 세션 컨텍스트가 없는 이벤트 등
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수의 에러에 `?`를 쓰면 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 영속 계층 호출이 설정된 시간 안에 끝나지 않음 (HTTP 500)
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl AppError {
    /// 클라이언트 잘못으로 생긴 에러인지 여부
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::BadRequest(_))
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 서버 에러(Internal, Database, Timeout)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        // 경계에서 한 번만 기록: 클라이언트 에러는 warn, 서버 에러는 error
        if self.is_client_error() {
            tracing::warn!("{}", self);
        } else {
            tracing::error!("{}", self);
        }

        let (status, code, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "A database error occurred".to_string(),
            ),
            AppError::Timeout(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "timeout",
                "The backend did not respond in time".to_string(),
            ),
        };

        // 결과: { "error": { "code": "bad_request", "message": "..." } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_maps_to_400() {
        let err = AppError::BadRequest("Intent not recognized".to_string());
        assert!(err.is_client_error());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_errors_map_to_500() {
        let internal = AppError::Internal("boom".to_string());
        assert!(!internal.is_client_error());
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let timeout = AppError::Timeout("commit order".to_string());
        assert_eq!(
            timeout.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let db = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(db.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
