mod common;

use chrono::{DateTime, Duration, Utc};
use item_lending::adapters::mock::{
    ItemService as MockItemService, UserService as MockUserService,
};
use item_lending::adapters::postgres::PostgresBookingLedger;
use item_lending::application::booking::{ServiceDependencies, create_booking, get_booking};
use item_lending::domain::commands::RequestBooking;
use item_lending::domain::booking::request_booking;
use item_lending::domain::value_objects::{BookingId, ItemId, Page, UserId};
use item_lending::domain::{Booking, BookingCategory, BookingStatus};
use item_lending::ports::BookingLedger;
use serial_test::serial;
use sqlx::PgPool;
use std::sync::Arc;

/// PostgreSQLの時刻精度（マイクロ秒）に合わせて丸める
///
/// PostgreSQL TIMESTAMPTZはマイクロ秒精度だが、DateTime<Utc>はナノ秒精度を持つ。
/// 比較前に統一するため、テストデータは作成時点で丸めておく。
fn truncate_to_micros(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(dt.timestamp_micros()).expect("Invalid timestamp")
}

async fn cleanup_database(pool: &PgPool) {
    sqlx::query("TRUNCATE TABLE bookings")
        .execute(pool)
        .await
        .expect("Failed to truncate bookings");
}

async fn setup() -> (PgPool, PostgresBookingLedger) {
    let pool = common::create_test_pool().await;
    cleanup_database(&pool).await;
    let ledger = PostgresBookingLedger::new(pool.clone());
    (pool, ledger)
}

fn now() -> DateTime<Utc> {
    truncate_to_micros(common::fixed_now())
}

/// nowを基準に日数で指定した期間の予約を作り、台帳に保存する
async fn insert(
    ledger: &PostgresBookingLedger,
    item_id: ItemId,
    booker_id: UserId,
    start_days: i64,
    end_days: i64,
) -> Booking {
    let booking = request_booking(
        item_id,
        booker_id,
        now() + Duration::days(start_days),
        now() + Duration::days(end_days),
        now() - Duration::days(30),
    )
    .unwrap();
    ledger.insert(booking).await.unwrap()
}

async fn approve(ledger: &PostgresBookingLedger, booking: &Booking) -> Booking {
    ledger
        .decide_if_waiting(booking.booking_id, BookingStatus::Approved, now())
        .await
        .unwrap()
        .unwrap()
}

fn ids(bookings: &[Booking]) -> Vec<BookingId> {
    bookings.iter().map(|b| b.booking_id).collect()
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_insert_and_get_by_id() {
    let (_pool, ledger) = setup().await;
    let booking = insert(&ledger, ItemId::new(), UserId::new(), 1, 2).await;

    let stored = ledger.get_by_id(booking.booking_id).await.unwrap();
    assert_eq!(stored, Some(booking));

    let missing = ledger.get_by_id(BookingId::new()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_insert_rejects_duplicate_id() {
    let (_pool, ledger) = setup().await;
    let booking = insert(&ledger, ItemId::new(), UserId::new(), 1, 2).await;

    let result = ledger.insert(booking).await;
    assert!(result.is_err());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_decide_if_waiting_transitions_once() {
    let (_pool, ledger) = setup().await;
    let booking = insert(&ledger, ItemId::new(), UserId::new(), 1, 2).await;

    let decided = ledger
        .decide_if_waiting(booking.booking_id, BookingStatus::Rejected, now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(decided.status, BookingStatus::Rejected);
    assert_eq!(decided.updated_at, now());
    assert_eq!(decided.created_at, booking.created_at);

    let second = ledger
        .decide_if_waiting(booking.booking_id, BookingStatus::Approved, now())
        .await
        .unwrap();
    assert!(second.is_none());

    let stored = ledger.get_by_id(booking.booking_id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Rejected);

    let unknown = ledger
        .decide_if_waiting(BookingId::new(), BookingStatus::Approved, now())
        .await
        .unwrap();
    assert!(unknown.is_none());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_find_by_booker_filters_orders_and_pages() {
    let (_pool, ledger) = setup().await;
    let item = ItemId::new();
    let booker = UserId::new();

    let past = insert(&ledger, item, booker, -10, -5).await;
    let current = insert(&ledger, item, booker, -1, 1).await;
    let future = insert(&ledger, item, booker, 5, 6).await;
    insert(&ledger, item, UserId::new(), 2, 3).await;
    approve(&ledger, &past).await;

    let all = ledger
        .find_by_booker(booker, BookingCategory::All, now(), Page::default())
        .await
        .unwrap();
    assert_eq!(
        ids(&all),
        vec![future.booking_id, current.booking_id, past.booking_id]
    );

    let current_list = ledger
        .find_by_booker(booker, BookingCategory::Current, now(), Page::default())
        .await
        .unwrap();
    assert_eq!(ids(&current_list), vec![current.booking_id]);

    let waiting = ledger
        .find_by_booker(booker, BookingCategory::Waiting, now(), Page::default())
        .await
        .unwrap();
    assert_eq!(ids(&waiting), vec![future.booking_id, current.booking_id]);

    let second_page = ledger
        .find_by_booker(booker, BookingCategory::All, now(), Page::new(1, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(ids(&second_page), vec![current.booking_id]);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_find_by_items_spans_all_given_items() {
    let (_pool, ledger) = setup().await;
    let first_item = ItemId::new();
    let second_item = ItemId::new();
    let booker = UserId::new();

    let on_first = insert(&ledger, first_item, booker, 1, 2).await;
    let on_second = insert(&ledger, second_item, booker, 3, 4).await;
    insert(&ledger, ItemId::new(), booker, 5, 6).await;

    let listed = ledger
        .find_by_items(
            &[first_item, second_item],
            BookingCategory::Future,
            now(),
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(ids(&listed), vec![on_second.booking_id, on_first.booking_id]);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_last_and_next_approved() {
    let (_pool, ledger) = setup().await;
    let item = ItemId::new();
    let booker = UserId::new();

    let long_past = insert(&ledger, item, booker, -20, -10).await;
    let recent = insert(&ledger, item, booker, -5, -3).await;
    let near = insert(&ledger, item, booker, 3, 4).await;
    let far = insert(&ledger, item, booker, 10, 12).await;
    // 承認待ちは対象外
    insert(&ledger, item, booker, 1, 2).await;
    for b in [&long_past, &recent, &near, &far] {
        approve(&ledger, b).await;
    }

    let last = ledger.find_last_approved(item, now()).await.unwrap().unwrap();
    assert_eq!(last.booking_id, recent.booking_id);

    let next = ledger.find_next_approved(item, now()).await.unwrap().unwrap();
    assert_eq!(next.booking_id, near.booking_id);

    let none = ledger.find_next_approved(ItemId::new(), now()).await.unwrap();
    assert!(none.is_none());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_has_completed_booking() {
    let (_pool, ledger) = setup().await;
    let item = ItemId::new();
    let booker = UserId::new();

    insert(&ledger, item, booker, -10, -9).await;
    assert!(!ledger.has_completed_booking(booker, item, now()).await.unwrap());

    let ended = insert(&ledger, item, booker, -6, -5).await;
    approve(&ledger, &ended).await;
    assert!(ledger.has_completed_booking(booker, item, now()).await.unwrap());
    assert!(!ledger
        .has_completed_booking(UserId::new(), item, now())
        .await
        .unwrap());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_created_booking_matches_stored_booking() {
    let (pool, _ledger) = setup().await;
    let users = Arc::new(MockUserService::new());
    let items = Arc::new(MockItemService::new());
    let owner = UserId::new();
    let booker = UserId::new();
    let item = ItemId::new();
    users.add_user(owner, "owner");
    users.add_user(booker, "booker");
    items.add_item(item, owner, true);

    let deps = ServiceDependencies {
        booking_ledger: Arc::new(PostgresBookingLedger::new(pool)),
        user_service: users,
        item_service: items,
    };

    // ナノ秒を含む日時で作成する
    let requested_at = Utc::now();
    let start = requested_at + Duration::days(1) + Duration::nanoseconds(123_456_789);
    let created = create_booking(
        &deps,
        RequestBooking {
            booker_id: booker,
            item_id: item,
            start,
            end: start + Duration::hours(3),
            requested_at,
        },
    )
    .await
    .unwrap();

    let fetched = get_booking(&deps, booker, created.booking_id).await.unwrap();
    assert_eq!(created, fetched);
    assert_eq!(created.start, truncate_to_micros(start));
    assert_eq!(created.created_at, truncate_to_micros(requested_at));
}
