use crate::domain::{
    Booking, BookingCategory, BookingStatus,
    value_objects::{BookingId, ItemId, Page, UserId},
};
use crate::ports::booking_ledger::{BookingLedger as BookingLedgerTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use std::str::FromStr;
use uuid::Uuid;

/// PostgreSQLの行データをBookingに変換する
///
/// statusは文字列から変換し、未知の値はInvalidDataエラーとする。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status_str: &str = row.get("status");
    let status = BookingStatus::from_str(status_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Booking {
        booking_id: BookingId::from_uuid(row.get("booking_id")),
        item_id: ItemId::from_uuid(row.get("item_id")),
        booker_id: UserId::from_uuid(row.get("booker_id")),
        start: row.get("start_at"),
        end: row.get("end_at"),
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// カテゴリに対応する絞り込み条件を追加する
fn push_category_filter(
    qb: &mut QueryBuilder<'_, Postgres>,
    category: BookingCategory,
    now: DateTime<Utc>,
) {
    match category {
        BookingCategory::All => {}
        BookingCategory::Current => {
            qb.push(" AND start_at < ");
            qb.push_bind(now);
            qb.push(" AND end_at > ");
            qb.push_bind(now);
        }
        BookingCategory::Past => {
            qb.push(" AND end_at < ");
            qb.push_bind(now);
        }
        BookingCategory::Future => {
            qb.push(" AND start_at > ");
            qb.push_bind(now);
        }
        BookingCategory::Waiting => {
            qb.push(" AND status = ");
            qb.push_bind(BookingStatus::Waiting.as_str());
        }
        BookingCategory::Rejected => {
            qb.push(" AND status = ");
            qb.push_bind(BookingStatus::Rejected.as_str());
        }
    }
}

/// 一覧の並び順とページ指定を追加する
fn push_listing_tail(qb: &mut QueryBuilder<'_, Postgres>, page: Page) {
    qb.push(" ORDER BY start_at DESC, booking_id DESC LIMIT ");
    qb.push_bind(page.limit() as i64);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset() as i64);
}

const SELECT_BOOKINGS: &str = r#"
    SELECT
        booking_id,
        item_id,
        booker_id,
        start_at,
        end_at,
        status,
        created_at,
        updated_at
    FROM bookings
    WHERE "#;

/// BookingLedgerのPostgreSQL実装
pub struct BookingLedger {
    pool: PgPool,
}

impl BookingLedger {
    /// PostgreSQLコネクションプールから新しいBookingLedgerを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingLedgerTrait for BookingLedger {
    /// 保存された行をRETURNINGで読み戻す
    async fn insert(&self, booking: Booking) -> Result<Booking> {
        let row = sqlx::query(
            r#"
            INSERT INTO bookings (
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            "#,
        )
        .bind(booking.booking_id.value())
        .bind(booking.item_id.value())
        .bind(booking.booker_id.value())
        .bind(booking.start)
        .bind(booking.end)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await?;

        map_row_to_booking(&row)
    }

    async fn get_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            FROM bookings
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    /// WHERE句でstatusを条件にした単一のUPDATEで遷移させる
    ///
    /// 同時に2件の判定が来ても、片方だけが行を更新する。
    async fn decide_if_waiting(
        &self,
        booking_id: BookingId,
        new_status: BookingStatus,
        decided_at: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = $3
            WHERE booking_id = $1 AND status = 'waiting'
            RETURNING
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            "#,
        )
        .bind(booking_id.value())
        .bind(new_status.as_str())
        .bind(decided_at)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn find_by_booker(
        &self,
        booker_id: UserId,
        category: BookingCategory,
        now: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Booking>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_BOOKINGS);
        qb.push("booker_id = ");
        qb.push_bind(booker_id.value());
        push_category_filter(&mut qb, category, now);
        push_listing_tail(&mut qb, page);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_row_to_booking).collect()
    }

    async fn find_by_items(
        &self,
        item_ids: &[ItemId],
        category: BookingCategory,
        now: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Booking>> {
        let ids: Vec<Uuid> = item_ids.iter().map(|id| id.value()).collect();

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_BOOKINGS);
        qb.push("item_id = ANY(");
        qb.push_bind(ids);
        qb.push(")");
        push_category_filter(&mut qb, category, now);
        push_listing_tail(&mut qb, page);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_row_to_booking).collect()
    }

    async fn find_last_approved(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            FROM bookings
            WHERE item_id = $1 AND status = 'approved' AND start_at < $2
            ORDER BY end_at DESC, booking_id DESC
            LIMIT 1
            "#,
        )
        .bind(item_id.value())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn find_next_approved(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            FROM bookings
            WHERE item_id = $1 AND status = 'approved' AND start_at > $2
            ORDER BY start_at ASC, booking_id ASC
            LIMIT 1
            "#,
        )
        .bind(item_id.value())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn has_completed_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM bookings
                WHERE booker_id = $1
                  AND item_id = $2
                  AND status = 'approved'
                  AND end_at < $3
            )
            "#,
        )
        .bind(booker_id.value())
        .bind(item_id.value())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
