use crate::application::booking::{BookingApplicationError, ErrorKind};
use crate::domain::PageError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
/// リクエストの形式不備（ヘッダー欠落、ページ指定の不正）はアプリケーション層に到達する前に弾く。
/// axumの抽出器の拒否も同じエラーボディで返す。
#[derive(Debug)]
pub enum ApiError {
    Application(BookingApplicationError),
    MissingUserHeader,
    InvalidUserHeader(String),
    InvalidPage(PageError),
    InvalidQuery(String),
    InvalidPath(String),
    InvalidBody(StatusCode, String),
}

impl From<BookingApplicationError> for ApiError {
    fn from(err: BookingApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        ApiError::InvalidPage(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidPath(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // 415（Content-Type不一致）や422（フィールド不足）は拒否のステータスをそのまま使う
        ApiError::InvalidBody(rejection.status(), rejection.body_text())
    }
}

/// アプリケーション層のエラーごとのエラーコード
fn error_code(err: &BookingApplicationError) -> &'static str {
    match err {
        BookingApplicationError::UserNotFound => "USER_NOT_FOUND",
        BookingApplicationError::ItemNotFound => "ITEM_NOT_FOUND",
        BookingApplicationError::BookingNotFound => "BOOKING_NOT_FOUND",
        BookingApplicationError::SelfBooking => "OWN_ITEM_NOT_BOOKABLE",
        BookingApplicationError::ItemNotAvailable => "ITEM_NOT_AVAILABLE",
        BookingApplicationError::InvalidBookingPeriod => "INVALID_BOOKING_PERIOD",
        BookingApplicationError::UnknownState(_) => "UNKNOWN_STATE",
        BookingApplicationError::AlreadyDecided => "ALREADY_DECIDED",
        BookingApplicationError::NotItemOwner => "NOT_ITEM_OWNER",
        BookingApplicationError::NotBookingParticipant => "NOT_BOOKING_PARTICIPANT",
        BookingApplicationError::NoCompletedBooking => "NO_COMPLETED_BOOKING",
        BookingApplicationError::LedgerError(_) => "BOOKING_LEDGER_ERROR",
        BookingApplicationError::UserServiceError(_) => "USER_SERVICE_ERROR",
        BookingApplicationError::ItemServiceError(_) => "ITEM_SERVICE_ERROR",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Application(err) => {
                let code = error_code(&err);
                match err.kind() {
                    // 404 Not Found - 参照先が存在しない
                    ErrorKind::NotFound => (StatusCode::NOT_FOUND, code, err.to_string()),
                    // 403 Forbidden - 呼び出し元に権限がない
                    ErrorKind::Forbidden => (StatusCode::FORBIDDEN, code, err.to_string()),
                    // 400 Bad Request - ドメインの前提条件違反
                    ErrorKind::InvalidState => (StatusCode::BAD_REQUEST, code, err.to_string()),
                    // 500 Internal Server Error - システム障害
                    // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                    ErrorKind::Internal => {
                        match std::error::Error::source(&err) {
                            Some(source) => tracing::error!("{}: {}", err, source),
                            None => tracing::error!("{}", err),
                        }
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            code,
                            "An unexpected error occurred".to_string(),
                        )
                    }
                }
            }
            ApiError::MissingUserHeader => (
                StatusCode::BAD_REQUEST,
                "MISSING_USER_HEADER",
                "X-Sharer-User-Id header is required".to_string(),
            ),
            ApiError::InvalidUserHeader(value) => (
                StatusCode::BAD_REQUEST,
                "INVALID_USER_HEADER",
                format!("X-Sharer-User-Id header is not a valid id: {}", value),
            ),
            ApiError::InvalidPage(err) => {
                (StatusCode::BAD_REQUEST, "INVALID_PAGE", err.to_string())
            }
            ApiError::InvalidQuery(message) => (StatusCode::BAD_REQUEST, "INVALID_QUERY", message),
            ApiError::InvalidPath(message) => (StatusCode::BAD_REQUEST, "INVALID_PATH", message),
            ApiError::InvalidBody(status, message) => (status, "INVALID_BODY", message),
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
