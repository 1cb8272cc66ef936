use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AvailabilitySummary, Booking, BookingStatus, Page, PageError};

/// 予約作成のリクエスト（POST /bookings）
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub item_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// 承認・却下のクエリパラメータ（PATCH /bookings/:id）
#[derive(Debug, Deserialize)]
pub struct DecideBookingQuery {
    pub approved: bool,
}

/// 予約一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    /// カテゴリ（省略時はALL）
    pub state: Option<String>,
    /// 先頭からのオフセット（省略時は0）
    pub from: Option<i64>,
    /// 1ページの件数（省略時は10）
    pub size: Option<i64>,
}

impl ListBookingsQuery {
    pub fn state(&self) -> String {
        self.state.clone().unwrap_or_else(|| "ALL".to_string())
    }

    /// ページ指定のバリデーション
    pub fn page(&self) -> Result<Page, PageError> {
        Page::new(
            self.from.unwrap_or(Page::DEFAULT_OFFSET as i64),
            self.size.unwrap_or(Page::DEFAULT_LIMIT as i64),
        )
    }
}

/// 予約レスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub booker_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.booking_id.value(),
            item_id: booking.item_id.value(),
            booker_id: booking.booker_id.value(),
            start: booking.start,
            end: booking.end,
            status: booking.status,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// 予約状況サマリーのレスポンス
///
/// 所有者以外が閲覧した場合は両方ともnull。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub item_id: Uuid,
    pub last_booking: Option<DateTime<Utc>>,
    pub next_booking: Option<DateTime<Utc>>,
}

impl AvailabilityResponse {
    pub fn new(item_id: Uuid, summary: Option<AvailabilitySummary>) -> Self {
        let summary = summary.unwrap_or_default();
        Self {
            item_id,
            last_booking: summary.last_booking_start,
            next_booking: summary.next_booking_start,
        }
    }
}

/// コメント投稿可否のレスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEligibilityResponse {
    pub item_id: Uuid,
    pub eligible: bool,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
