use crate::domain::{
    Booking, BookingCategory, BookingStatus,
    value_objects::{BookingId, ItemId, Page, UserId},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 予約台帳ポート
///
/// 予約レコードの永続化と、エンジンが必要とする範囲・状態クエリを抽象化する。
/// 予約は作成後に削除されず、変更はステータス遷移の1回のみ。
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// 新しい予約を保存し、保存された内容を返す
    ///
    /// 戻り値は以降の`get_by_id`と同じ値になる。
    async fn insert(&self, booking: Booking) -> Result<Booking>;

    /// IDで予約を取得する
    async fn get_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>>;

    /// Waiting状態の予約のステータスを原子的に更新する（compare-and-set）
    ///
    /// 現在のステータスがWaitingの場合のみ`new_status`に更新し、更新後の予約を返す。
    /// 予約が存在しない、または既に判定済みの場合は`None`を返す。
    async fn decide_if_waiting(
        &self,
        booking_id: BookingId,
        new_status: BookingStatus,
        decided_at: DateTime<Utc>,
    ) -> Result<Option<Booking>>;

    /// 予約者の予約をカテゴリで絞り込み、1ページ分を取得する
    ///
    /// 並び順はstart降順、同一startはID降順。
    async fn find_by_booker(
        &self,
        booker_id: UserId,
        category: BookingCategory,
        now: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Booking>>;

    /// 指定アイテム群の予約をカテゴリで絞り込み、1ページ分を取得する
    ///
    /// 所有者一覧で使用される。並び順は`find_by_booker`と同じ。
    async fn find_by_items(
        &self,
        item_ids: &[ItemId],
        category: BookingCategory,
        now: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Booking>>;

    /// 直近の承認済み予約（start < now、end降順の先頭）
    async fn find_last_approved(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>>;

    /// 次の承認済み予約（start > now、start昇順の先頭）
    async fn find_next_approved(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>>;

    /// 承認済みかつ終了済み（end < now）の予約が存在するか
    async fn has_completed_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<bool>;
}
