use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, DecideBookingError, ItemId, RequestBookingError, UserId};

/// 予約ステータス
///
/// 状態遷移：Waiting → Approved | Rejected
/// Approved, Rejectedは終端状態で、以降の遷移はない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// 承認待ち
    Waiting,
    /// 承認済み
    Approved,
    /// 却下
    Rejected,
}

impl BookingStatus {
    /// 永続化用の文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "waiting",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// 終端状態か
    pub fn is_terminal(&self) -> bool {
        match self {
            BookingStatus::Waiting => false,
            BookingStatus::Approved | BookingStatus::Rejected => true,
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(BookingStatus::Waiting),
            "approved" => Ok(BookingStatus::Approved),
            "rejected" => Ok(BookingStatus::Rejected),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// Booking集約 - 1つのアイテムに対する1回の予約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    // 識別子
    pub booking_id: BookingId,

    // 他の集約への参照（IDのみ）
    pub item_id: ItemId,
    pub booker_id: UserId,

    // 予約期間（end > start）
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// 指定時刻に進行中か（start < now < end）
    pub fn is_current_at(&self, now: DateTime<Utc>) -> bool {
        self.start < now && self.end > now
    }

    /// 指定時刻に終了済みか（end < now）
    pub fn is_past_at(&self, now: DateTime<Utc>) -> bool {
        self.end < now
    }

    /// 指定時刻にまだ始まっていないか（start > now）
    pub fn is_future_at(&self, now: DateTime<Utc>) -> bool {
        self.start > now
    }

    /// 承認済みで、指定時刻までに終了しているか
    ///
    /// コメント投稿の可否判定に使われる。
    pub fn is_completed_at(&self, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::Approved && self.is_past_at(now)
    }
}

/// 純粋関数：アイテムを予約する
///
/// ビジネスルール：
/// - 終了日時は開始日時より後であること
/// - 初期状態はWaiting
///
/// ユーザー・アイテムの存在確認、貸出可否、自己予約の拒否は
/// アプリケーション層の責務。
///
/// 日時はすべてマイクロ秒に切り捨てる（台帳に保存できる精度）。
pub fn request_booking(
    item_id: ItemId,
    booker_id: UserId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    requested_at: DateTime<Utc>,
) -> Result<Booking, RequestBookingError> {
    let start = to_stored_precision(start);
    let end = to_stored_precision(end);
    let requested_at = to_stored_precision(requested_at);

    if end <= start {
        return Err(RequestBookingError::EndNotAfterStart);
    }

    Ok(Booking {
        booking_id: BookingId::new(),
        item_id,
        booker_id,
        start,
        end,
        status: BookingStatus::Waiting,
        created_at: requested_at,
        updated_at: requested_at,
    })
}

/// 台帳のタイムスタンプ精度（マイクロ秒）
pub const STORED_SUBSEC_DIGITS: u16 = 6;

fn to_stored_precision(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(STORED_SUBSEC_DIGITS)
}

/// 純粋関数：予約を承認または却下する
///
/// ビジネスルール：
/// - Waiting状態の予約のみ判定できる
/// - approved = true → Approved、false → Rejected
///
/// 副作用なし。遷移後の新しいBookingを返す。
pub fn decide_booking(
    booking: &Booking,
    approved: bool,
    decided_at: DateTime<Utc>,
) -> Result<Booking, DecideBookingError> {
    if booking.status.is_terminal() {
        return Err(DecideBookingError::AlreadyDecided);
    }

    let status = if approved {
        BookingStatus::Approved
    } else {
        BookingStatus::Rejected
    };

    Ok(Booking {
        status,
        updated_at: to_stored_precision(decided_at),
        ..booking.clone()
    })
}
