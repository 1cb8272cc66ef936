use crate::domain::{AvailabilitySummary, ItemId, UserId};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;

use super::booking_service::ServiceDependencies;
use super::errors::{BookingApplicationError, Result};

/// アイテムの予約状況サマリーを導出する
///
/// - last_booking_start: 承認済み・start < now の予約のうちend降順の先頭のstart
/// - next_booking_start: 承認済み・start > now の予約のうちstart昇順の先頭のstart
///
/// 読み取りのたびに台帳から再計算する。結果をキャッシュしないこと。
pub async fn summarize(
    deps: &ServiceDependencies,
    item_id: ItemId,
    now: DateTime<Utc>,
) -> Result<AvailabilitySummary> {
    let (last, next) = futures::try_join!(
        deps.booking_ledger.find_last_approved(item_id, now),
        deps.booking_ledger.find_next_approved(item_id, now),
    )
    .map_err(BookingApplicationError::LedgerError)?;

    Ok(AvailabilitySummary {
        last_booking_start: last.map(|b| b.start),
        next_booking_start: next.map(|b| b.start),
    })
}

/// 閲覧者に応じたサマリーを返す
///
/// 予約日時はアイテムの所有者にのみ見せる。所有者以外には`None`を返す。
pub async fn summary_for_viewer(
    deps: &ServiceDependencies,
    viewer_id: UserId,
    item_id: ItemId,
    now: DateTime<Utc>,
) -> Result<Option<AvailabilitySummary>> {
    let item = deps
        .item_service
        .get(item_id)
        .await
        .map_err(BookingApplicationError::ItemServiceError)?
        .ok_or(BookingApplicationError::ItemNotFound)?;

    if item.owner_id != viewer_id {
        return Ok(None);
    }

    summarize(deps, item_id, now).await.map(Some)
}

/// 所有者の全アイテムのサマリーを返す
///
/// 順序はItemServiceが返すアイテムの順序に従う。
pub async fn summaries_for_owner(
    deps: &ServiceDependencies,
    owner_id: UserId,
    now: DateTime<Utc>,
) -> Result<Vec<(ItemId, AvailabilitySummary)>> {
    let exists = deps
        .user_service
        .exists(owner_id)
        .await
        .map_err(BookingApplicationError::UserServiceError)?;

    if !exists {
        return Err(BookingApplicationError::UserNotFound);
    }

    let item_ids = deps
        .item_service
        .find_ids_by_owner(owner_id)
        .await
        .map_err(BookingApplicationError::ItemServiceError)?;

    try_join_all(item_ids.into_iter().map(|item_id| async move {
        summarize(deps, item_id, now)
            .await
            .map(|summary| (item_id, summary))
    }))
    .await
}

/// ユーザーがアイテムの予約を完了しているか
///
/// 承認済みかつ end < now の予約が1件でもあれば`true`。
/// 却下・承認待ちの予約は数えない。
pub async fn has_completed_booking(
    deps: &ServiceDependencies,
    user_id: UserId,
    item_id: ItemId,
    now: DateTime<Utc>,
) -> Result<bool> {
    deps.booking_ledger
        .has_completed_booking(user_id, item_id, now)
        .await
        .map_err(BookingApplicationError::LedgerError)
}

/// コメント投稿の可否を検査する
///
/// コメント機能側から呼ばれる。完了した予約がなければ`NoCompletedBooking`。
pub async fn ensure_can_comment(
    deps: &ServiceDependencies,
    user_id: UserId,
    item_id: ItemId,
    now: DateTime<Utc>,
) -> Result<()> {
    let user_exists = deps
        .user_service
        .exists(user_id)
        .await
        .map_err(BookingApplicationError::UserServiceError)?;
    if !user_exists {
        return Err(BookingApplicationError::UserNotFound);
    }

    let item_exists = deps
        .item_service
        .exists(item_id)
        .await
        .map_err(BookingApplicationError::ItemServiceError)?;
    if !item_exists {
        return Err(BookingApplicationError::ItemNotFound);
    }

    if !has_completed_booking(deps, user_id, item_id, now).await? {
        tracing::warn!(
            user_id = %user_id.value(),
            item_id = %item_id.value(),
            "Comment rejected: no completed booking"
        );
        return Err(BookingApplicationError::NoCompletedBooking);
    }
    Ok(())
}
