use crate::domain::{DecideBookingError, RequestBookingError, UnknownCategory};
use thiserror::Error;

/// エラーの分類
///
/// API層はこの分類だけを見てステータスコードを決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 参照先が存在しない
    NotFound,
    /// 呼び出し元に必要な関係がない
    Forbidden,
    /// ドメインの前提条件違反
    InvalidState,
    /// 下位層の障害
    Internal,
}

/// 予約管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum BookingApplicationError {
    /// ユーザーが存在しない
    #[error("User not found")]
    UserNotFound,

    /// アイテムが存在しない
    #[error("Item not found")]
    ItemNotFound,

    /// 予約が存在しない
    #[error("Booking not found")]
    BookingNotFound,

    /// 自分のアイテムは予約できない
    ///
    /// 既存クライアントとの互換のためNotFoundとして扱う。
    #[error("Owner cannot book own item")]
    SelfBooking,

    /// アイテムが貸出不可
    #[error("Item is not available for booking")]
    ItemNotAvailable,

    /// 予約期間が不正（end <= start）
    #[error("Booking end must be after start")]
    InvalidBookingPeriod,

    /// 未知のカテゴリ指定
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// 既に承認または却下済み
    #[error("Booking has already been decided")]
    AlreadyDecided,

    /// アイテムの所有者ではない
    #[error("Only the item owner can decide on a booking")]
    NotItemOwner,

    /// 予約者でも所有者でもない
    #[error("Only the booker or the item owner can view a booking")]
    NotBookingParticipant,

    /// 完了した予約がない
    #[error("User has no completed booking of this item")]
    NoCompletedBooking,

    /// BookingLedgerのエラー
    #[error("Booking ledger error")]
    LedgerError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// UserServiceのエラー
    #[error("User service error")]
    UserServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ItemServiceのエラー
    #[error("Item service error")]
    ItemServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingApplicationError::UserNotFound
            | BookingApplicationError::ItemNotFound
            | BookingApplicationError::BookingNotFound
            | BookingApplicationError::SelfBooking => ErrorKind::NotFound,

            BookingApplicationError::NotItemOwner
            | BookingApplicationError::NotBookingParticipant => ErrorKind::Forbidden,

            BookingApplicationError::ItemNotAvailable
            | BookingApplicationError::InvalidBookingPeriod
            | BookingApplicationError::UnknownState(_)
            | BookingApplicationError::AlreadyDecided
            | BookingApplicationError::NoCompletedBooking => ErrorKind::InvalidState,

            BookingApplicationError::LedgerError(_)
            | BookingApplicationError::UserServiceError(_)
            | BookingApplicationError::ItemServiceError(_) => ErrorKind::Internal,
        }
    }
}

impl From<RequestBookingError> for BookingApplicationError {
    fn from(err: RequestBookingError) -> Self {
        match err {
            RequestBookingError::EndNotAfterStart => BookingApplicationError::InvalidBookingPeriod,
        }
    }
}

impl From<DecideBookingError> for BookingApplicationError {
    fn from(err: DecideBookingError) -> Self {
        match err {
            DecideBookingError::AlreadyDecided => BookingApplicationError::AlreadyDecided,
        }
    }
}

impl From<UnknownCategory> for BookingApplicationError {
    fn from(err: UnknownCategory) -> Self {
        BookingApplicationError::UnknownState(err.0)
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookingApplicationError>;
