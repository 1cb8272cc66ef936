use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Booking, BookingStatus};

/// アイテムの予約状況サマリー（派生ビュー）
///
/// 永続化しない。読み取りのたびに現在時刻から再計算する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailabilitySummary {
    pub last_booking_start: Option<DateTime<Utc>>,
    pub next_booking_start: Option<DateTime<Utc>>,
}

/// 純粋関数：直近の過去の承認済み予約
///
/// 承認済みかつ start < now の予約のうち、endが最も遅いもの。
pub fn last_approved<'a, I>(bookings: I, now: DateTime<Utc>) -> Option<&'a Booking>
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings
        .into_iter()
        .filter(|b| b.status == BookingStatus::Approved && b.start < now)
        .max_by_key(|b| (b.end, b.booking_id))
}

/// 純粋関数：次の承認済み予約
///
/// 承認済みかつ start > now の予約のうち、startが最も早いもの。
pub fn next_approved<'a, I>(bookings: I, now: DateTime<Utc>) -> Option<&'a Booking>
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings
        .into_iter()
        .filter(|b| b.status == BookingStatus::Approved && b.start > now)
        .min_by_key(|b| (b.start, b.booking_id))
}
