use crate::domain::{self, Booking, commands::*, value_objects::*};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{BookingApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub booking_ledger: Arc<dyn BookingLedger>,
    pub user_service: Arc<dyn UserService>,
    pub item_service: Arc<dyn ItemService>,
}

/// 予約を読み込むヘルパー関数
///
/// decide_booking, get_bookingで共通利用される。
async fn load_booking(
    booking_ledger: &Arc<dyn BookingLedger>,
    booking_id: BookingId,
) -> Result<Booking> {
    booking_ledger
        .get_by_id(booking_id)
        .await
        .map_err(BookingApplicationError::LedgerError)?
        .ok_or(BookingApplicationError::BookingNotFound)
}

/// アイテムを予約する
///
/// ビジネスルール（この順で検査し、最初の違反を返す）：
/// 1. 予約者が存在すること
/// 2. アイテムが存在すること
/// 3. アイテムが貸出可能であること
/// 4. 自分のアイテムではないこと
/// 5. 終了日時が開始日時より後であること
///
/// 同一アイテムの期間重複は検査しない。
///
/// # 戻り値
/// Waiting状態で保存された予約
pub async fn create_booking(deps: &ServiceDependencies, cmd: RequestBooking) -> Result<Booking> {
    // 1. 予約者の存在確認
    let booker = deps
        .user_service
        .get(cmd.booker_id)
        .await
        .map_err(BookingApplicationError::UserServiceError)?
        .ok_or(BookingApplicationError::UserNotFound)?;

    // 2. アイテムの存在確認（所有者・貸出可否は毎回取得し直す）
    let item = deps
        .item_service
        .get(cmd.item_id)
        .await
        .map_err(BookingApplicationError::ItemServiceError)?
        .ok_or(BookingApplicationError::ItemNotFound)?;

    // 3. 貸出可否
    if !item.available {
        return Err(BookingApplicationError::ItemNotAvailable);
    }

    // 4. 自己予約の拒否
    if item.owner_id == booker.user_id {
        tracing::warn!(
            item_id = %cmd.item_id.value(),
            booker_id = %cmd.booker_id.value(),
            "Rejected attempt to book own item"
        );
        return Err(BookingApplicationError::SelfBooking);
    }

    // 5. ドメイン層の純粋関数を呼び出し
    let booking = domain::booking::request_booking(
        cmd.item_id,
        cmd.booker_id,
        cmd.start,
        cmd.end,
        cmd.requested_at,
    )?;

    // 6. 台帳に保存（保存された内容を返す）
    let booking = deps
        .booking_ledger
        .insert(booking)
        .await
        .map_err(BookingApplicationError::LedgerError)?;

    tracing::info!(
        booking_id = %booking.booking_id.value(),
        item_id = %booking.item_id.value(),
        booker_id = %booking.booker_id.value(),
        "Booking requested"
    );

    Ok(booking)
}

/// 予約を承認または却下する
///
/// ビジネスルール：
/// - 予約が存在すること
/// - 呼び出し元がアイテムの所有者であること
/// - 予約がWaiting状態であること
///
/// # 一貫性保証
///
/// ステータス更新は台帳上のcompare-and-setで行う。
/// 同時に判定された場合、後から到着した側は`AlreadyDecided`になる（再試行しない）。
pub async fn decide_booking(deps: &ServiceDependencies, cmd: DecideBooking) -> Result<Booking> {
    // 1. 予約を読み込む
    let booking = load_booking(&deps.booking_ledger, cmd.booking_id).await?;

    // 2. 所有者確認
    let is_owner = deps
        .item_service
        .is_owned_by(booking.item_id, cmd.caller_id)
        .await
        .map_err(BookingApplicationError::ItemServiceError)?;

    if !is_owner {
        return Err(BookingApplicationError::NotItemOwner);
    }

    // 3. ドメイン層の純粋関数で遷移先を決める
    let decided = domain::booking::decide_booking(&booking, cmd.approved, cmd.decided_at)?;

    // 4. 台帳上で原子的に遷移させる
    let updated = deps
        .booking_ledger
        .decide_if_waiting(cmd.booking_id, decided.status, decided.updated_at)
        .await
        .map_err(BookingApplicationError::LedgerError)?
        .ok_or(BookingApplicationError::AlreadyDecided)?;

    tracing::info!(
        booking_id = %updated.booking_id.value(),
        status = updated.status.as_str(),
        "Booking decided"
    );

    Ok(updated)
}

/// 予約を1件取得する
///
/// 予約者とアイテムの所有者のみが閲覧できる。
pub async fn get_booking(
    deps: &ServiceDependencies,
    caller_id: UserId,
    booking_id: BookingId,
) -> Result<Booking> {
    let booking = load_booking(&deps.booking_ledger, booking_id).await?;

    if booking.booker_id == caller_id {
        return Ok(booking);
    }

    let is_owner = deps
        .item_service
        .is_owned_by(booking.item_id, caller_id)
        .await
        .map_err(BookingApplicationError::ItemServiceError)?;

    if !is_owner {
        return Err(BookingApplicationError::NotBookingParticipant);
    }

    Ok(booking)
}
