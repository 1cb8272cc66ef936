use crate::application::booking::{
    ServiceDependencies, create_booking as execute_create_booking,
    decide_booking as execute_decide_booking, get_booking as execute_get_booking,
    has_completed_booking, list_bookings_by_booker, list_bookings_by_owner, summaries_for_owner,
    summary_for_viewer,
};
use crate::domain::commands::{DecideBooking, ListBookings, RequestBooking};
use crate::domain::value_objects::{BookingId, ItemId};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    extract::{CallerId, ValidJson, ValidPath, ValidQuery},
    types::{
        AvailabilityResponse, BookingResponse, CommentEligibilityResponse, CreateBookingRequest,
        DecideBookingQuery, ListBookingsQuery,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers
// ============================================================================

/// POST /bookings - 新しい予約を作成
///
/// 強制されるビジネスルール:
/// - 予約者とアイテムが存在すること
/// - アイテムが貸出可能であること
/// - 自分のアイテムではないこと
/// - 終了日時が開始日時より後であること
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
    ValidJson(req): ValidJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let cmd = RequestBooking {
        booker_id: caller_id,
        item_id: ItemId::from_uuid(req.item_id),
        start: req.start,
        end: req.end,
        requested_at: Utc::now(),
    };

    let booking = execute_create_booking(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// PATCH /bookings/:id?approved=true|false - 予約を承認または却下
///
/// アイテムの所有者のみが、Waiting状態の予約に対して1度だけ実行できる。
pub async fn decide_booking(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
    ValidPath(booking_id): ValidPath<Uuid>,
    ValidQuery(query): ValidQuery<DecideBookingQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = DecideBooking {
        caller_id,
        booking_id: BookingId::from_uuid(booking_id),
        approved: query.approved,
        decided_at: Utc::now(),
    };

    let booking = execute_decide_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /bookings/:id - 予約詳細をIDで取得
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
    ValidPath(booking_id): ValidPath<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking =
        execute_get_booking(&state.service_deps, caller_id, BookingId::from_uuid(booking_id))
            .await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// GET /bookings?state=&from=&size= - 予約者としての予約一覧
pub async fn list_booker_bookings(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
    ValidQuery(query): ValidQuery<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let list = ListBookings {
        caller_id,
        state: query.state(),
        page: query.page()?,
        evaluated_at: Utc::now(),
    };

    let bookings = list_bookings_by_booker(&state.service_deps, list).await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/owner?state=&from=&size= - 所有アイテムに対する予約一覧
pub async fn list_owner_bookings(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
    ValidQuery(query): ValidQuery<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let list = ListBookings {
        caller_id,
        state: query.state(),
        page: query.page()?,
        evaluated_at: Utc::now(),
    };

    let bookings = list_bookings_by_owner(&state.service_deps, list).await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /items/:id/availability - アイテムの直近・次回の予約
///
/// 所有者以外には日時をnullで返す。
pub async fn get_item_availability(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
    ValidPath(item_id): ValidPath<Uuid>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let summary = summary_for_viewer(
        &state.service_deps,
        caller_id,
        ItemId::from_uuid(item_id),
        Utc::now(),
    )
    .await?;

    Ok(Json(AvailabilityResponse::new(item_id, summary)))
}

/// GET /items/availability - 所有する全アイテムの直近・次回の予約
pub async fn list_owner_availability(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
) -> Result<Json<Vec<AvailabilityResponse>>, ApiError> {
    let summaries = summaries_for_owner(&state.service_deps, caller_id, Utc::now()).await?;

    Ok(Json(
        summaries
            .into_iter()
            .map(|(item_id, summary)| AvailabilityResponse::new(item_id.value(), Some(summary)))
            .collect(),
    ))
}

/// GET /items/:id/comment-eligibility - 呼び出し元がコメントできるか
pub async fn get_comment_eligibility(
    State(state): State<Arc<AppState>>,
    CallerId(caller_id): CallerId,
    ValidPath(item_id): ValidPath<Uuid>,
) -> Result<Json<CommentEligibilityResponse>, ApiError> {
    let eligible = has_completed_booking(
        &state.service_deps,
        caller_id,
        ItemId::from_uuid(item_id),
        Utc::now(),
    )
    .await?;

    Ok(Json(CommentEligibilityResponse { item_id, eligible }))
}
