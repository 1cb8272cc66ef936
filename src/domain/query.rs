use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{Booking, BookingStatus, Page, UnknownCategory};

/// 予約一覧のカテゴリ
///
/// 評価時刻（now）に対する述語、またはステータスの一致で予約を絞り込む。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingCategory {
    /// 絞り込みなし
    All,
    /// start < now かつ end > now
    Current,
    /// end < now
    Past,
    /// start > now
    Future,
    /// ステータスがWaiting
    Waiting,
    /// ステータスがRejected
    Rejected,
}

impl BookingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingCategory::All => "ALL",
            BookingCategory::Current => "CURRENT",
            BookingCategory::Past => "PAST",
            BookingCategory::Future => "FUTURE",
            BookingCategory::Waiting => "WAITING",
            BookingCategory::Rejected => "REJECTED",
        }
    }

    /// 予約がこのカテゴリに属するか
    pub fn matches(&self, booking: &Booking, now: DateTime<Utc>) -> bool {
        match self {
            BookingCategory::All => true,
            BookingCategory::Current => booking.is_current_at(now),
            BookingCategory::Past => booking.is_past_at(now),
            BookingCategory::Future => booking.is_future_at(now),
            BookingCategory::Waiting => booking.status == BookingStatus::Waiting,
            BookingCategory::Rejected => booking.status == BookingStatus::Rejected,
        }
    }
}

impl std::str::FromStr for BookingCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingCategory::All),
            "CURRENT" => Ok(BookingCategory::Current),
            "PAST" => Ok(BookingCategory::Past),
            "FUTURE" => Ok(BookingCategory::Future),
            "WAITING" => Ok(BookingCategory::Waiting),
            "REJECTED" => Ok(BookingCategory::Rejected),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// 一覧表示の並び順：start降順、同一startはID降順
pub fn listing_order(a: &Booking, b: &Booking) -> Ordering {
    b.start
        .cmp(&a.start)
        .then_with(|| b.booking_id.cmp(&a.booking_id))
}

/// 純粋関数：予約の候補集合からカテゴリ一覧の1ページを選択する
///
/// 絞り込み → 整列 → ページ適用の順で処理する。
pub fn select_page<I>(
    candidates: I,
    category: BookingCategory,
    now: DateTime<Utc>,
    page: Page,
) -> Vec<Booking>
where
    I: IntoIterator<Item = Booking>,
{
    let mut selected: Vec<Booking> = candidates
        .into_iter()
        .filter(|b| category.matches(b, now))
        .collect();
    selected.sort_by(listing_order);
    page.apply(selected)
}
