use crate::domain::{Booking, BookingCategory, commands::ListBookings, value_objects::UserId};

use super::booking_service::ServiceDependencies;
use super::errors::{BookingApplicationError, Result};

/// 呼び出し元ユーザーの存在確認
async fn ensure_user_exists(deps: &ServiceDependencies, user_id: UserId) -> Result<()> {
    let exists = deps
        .user_service
        .exists(user_id)
        .await
        .map_err(BookingApplicationError::UserServiceError)?;

    if !exists {
        return Err(BookingApplicationError::UserNotFound);
    }
    Ok(())
}

/// 予約者として行った予約の一覧を取得する
///
/// ユーザーの存在確認の後にカテゴリを解釈する。
/// 結果はstart降順（同一startはID降順）で、ページ指定を適用済み。
pub async fn list_bookings_by_booker(
    deps: &ServiceDependencies,
    query: ListBookings,
) -> Result<Vec<Booking>> {
    ensure_user_exists(deps, query.caller_id).await?;
    let category: BookingCategory = query.state.parse()?;

    tracing::debug!(
        booker_id = %query.caller_id.value(),
        category = category.as_str(),
        offset = query.page.offset(),
        limit = query.page.limit(),
        "Listing bookings by booker"
    );

    deps.booking_ledger
        .find_by_booker(query.caller_id, category, query.evaluated_at, query.page)
        .await
        .map_err(BookingApplicationError::LedgerError)
}

/// 所有するアイテムに対する予約の一覧を取得する
///
/// アイテムを1つも所有していない場合は空の一覧を返す（エラーではない）。
pub async fn list_bookings_by_owner(
    deps: &ServiceDependencies,
    query: ListBookings,
) -> Result<Vec<Booking>> {
    ensure_user_exists(deps, query.caller_id).await?;
    let category: BookingCategory = query.state.parse()?;

    let item_ids = deps
        .item_service
        .find_ids_by_owner(query.caller_id)
        .await
        .map_err(BookingApplicationError::ItemServiceError)?;

    if item_ids.is_empty() {
        return Ok(Vec::new());
    }

    tracing::debug!(
        owner_id = %query.caller_id.value(),
        items = item_ids.len(),
        category = category.as_str(),
        offset = query.page.offset(),
        limit = query.page.limit(),
        "Listing bookings by owner"
    );

    deps.booking_ledger
        .find_by_items(&item_ids, category, query.evaluated_at, query.page)
        .await
        .map_err(BookingApplicationError::LedgerError)
}
