use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, ItemId, Page, UserId};

/// コマンド：アイテムを予約する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBooking {
    pub booker_id: UserId,
    pub item_id: ItemId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：予約を承認または却下する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecideBooking {
    pub caller_id: UserId,
    pub booking_id: BookingId,
    pub approved: bool,
    pub decided_at: DateTime<Utc>,
}

/// クエリ：予約一覧を取得する
///
/// `state`は未解釈の文字列のまま受け取る。
/// ユーザーの存在確認の後にカテゴリとして解釈される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBookings {
    pub caller_id: UserId,
    pub state: String,
    pub page: Page,
    pub evaluated_at: DateTime<Utc>,
}
