use crate::domain::{
    Booking, BookingCategory, BookingStatus, availability, query,
    value_objects::{BookingId, ItemId, Page, UserId},
};
use crate::ports::booking_ledger::{BookingLedger as BookingLedgerTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory implementation of BookingLedger
///
/// Every port call takes the lock exactly once, so the status
/// compare-and-set is atomic with respect to other calls.
pub struct BookingLedger {
    bookings: Mutex<HashMap<BookingId, Booking>>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<BookingId, Booking>>> {
        self.bookings
            .lock()
            .map_err(|e| format!("booking ledger lock poisoned: {}", e).into())
    }
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingLedgerTrait for BookingLedger {
    async fn insert(&self, booking: Booking) -> Result<Booking> {
        let mut bookings = self.lock()?;
        if bookings.contains_key(&booking.booking_id) {
            return Err(format!(
                "booking {} already exists",
                booking.booking_id.value()
            )
            .into());
        }
        bookings.insert(booking.booking_id, booking.clone());
        Ok(booking)
    }

    async fn get_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        Ok(self.lock()?.get(&booking_id).cloned())
    }

    async fn decide_if_waiting(
        &self,
        booking_id: BookingId,
        new_status: BookingStatus,
        decided_at: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let mut bookings = self.lock()?;
        match bookings.get_mut(&booking_id) {
            Some(booking) if booking.status == BookingStatus::Waiting => {
                booking.status = new_status;
                booking.updated_at = decided_at;
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_by_booker(
        &self,
        booker_id: UserId,
        category: BookingCategory,
        now: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Booking>> {
        let bookings = self.lock()?;
        let candidates = bookings
            .values()
            .filter(|b| b.booker_id == booker_id)
            .cloned();
        Ok(query::select_page(candidates, category, now, page))
    }

    async fn find_by_items(
        &self,
        item_ids: &[ItemId],
        category: BookingCategory,
        now: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Booking>> {
        let bookings = self.lock()?;
        let candidates = bookings
            .values()
            .filter(|b| item_ids.contains(&b.item_id))
            .cloned();
        Ok(query::select_page(candidates, category, now, page))
    }

    async fn find_last_approved(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let bookings = self.lock()?;
        let of_item = bookings.values().filter(|b| b.item_id == item_id);
        Ok(availability::last_approved(of_item, now).cloned())
    }

    async fn find_next_approved(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let bookings = self.lock()?;
        let of_item = bookings.values().filter(|b| b.item_id == item_id);
        Ok(availability::next_approved(of_item, now).cloned())
    }

    async fn has_completed_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let bookings = self.lock()?;
        Ok(bookings.values().any(|b| {
            b.booker_id == booker_id && b.item_id == item_id && b.is_completed_at(now)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{decide_booking, request_booking};
    use chrono::Duration;

    fn waiting(item_id: ItemId, booker_id: UserId, now: DateTime<Utc>, start_h: i64) -> Booking {
        request_booking(
            item_id,
            booker_id,
            now + Duration::hours(start_h),
            now + Duration::hours(start_h + 1),
            now,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_by_id() {
        let ledger = BookingLedger::new();
        let now = Utc::now();
        let booking = waiting(ItemId::new(), UserId::new(), now, 1);

        ledger.insert(booking.clone()).await.unwrap();

        let loaded = ledger.get_by_id(booking.booking_id).await.unwrap();
        assert_eq!(loaded, Some(booking));
        assert!(ledger.get_by_id(BookingId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let ledger = BookingLedger::new();
        let booking = waiting(ItemId::new(), UserId::new(), Utc::now(), 1);

        ledger.insert(booking.clone()).await.unwrap();
        assert!(ledger.insert(booking).await.is_err());
    }

    #[tokio::test]
    async fn test_decide_if_waiting_is_single_shot() {
        let ledger = BookingLedger::new();
        let now = Utc::now();
        let booking = waiting(ItemId::new(), UserId::new(), now, 1);
        ledger.insert(booking.clone()).await.unwrap();

        let first = ledger
            .decide_if_waiting(booking.booking_id, BookingStatus::Approved, now)
            .await
            .unwrap();
        assert_eq!(first.unwrap().status, BookingStatus::Approved);

        let second = ledger
            .decide_if_waiting(booking.booking_id, BookingStatus::Rejected, now)
            .await
            .unwrap();
        assert!(second.is_none());

        let stored = ledger.get_by_id(booking.booking_id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Approved);
    }

    #[tokio::test]
    async fn test_decide_if_waiting_unknown_booking() {
        let ledger = BookingLedger::new();
        let result = ledger
            .decide_if_waiting(BookingId::new(), BookingStatus::Approved, Utc::now())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_by_booker_filters_by_booker() {
        let ledger = BookingLedger::new();
        let now = Utc::now();
        let booker = UserId::new();
        let item = ItemId::new();

        ledger.insert(waiting(item, booker, now, 1)).await.unwrap();
        ledger.insert(waiting(item, booker, now, 5)).await.unwrap();
        ledger.insert(waiting(item, UserId::new(), now, 3)).await.unwrap();

        let result = ledger
            .find_by_booker(booker, BookingCategory::All, now, Page::default())
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|b| b.booker_id == booker));
        assert!(result[0].start > result[1].start);
    }

    #[tokio::test]
    async fn test_find_by_items_restricts_to_item_set() {
        let ledger = BookingLedger::new();
        let now = Utc::now();
        let mine = ItemId::new();
        let other = ItemId::new();

        ledger.insert(waiting(mine, UserId::new(), now, 1)).await.unwrap();
        ledger.insert(waiting(other, UserId::new(), now, 1)).await.unwrap();

        let result = ledger
            .find_by_items(&[mine], BookingCategory::Waiting, now, Page::default())
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item_id, mine);
    }

    #[tokio::test]
    async fn test_last_next_and_completed() {
        let ledger = BookingLedger::new();
        let now = Utc::now();
        let item = ItemId::new();
        let booker = UserId::new();

        let past = decide_booking(&waiting(item, booker, now, -48), true, now).unwrap();
        let future = decide_booking(&waiting(item, booker, now, 24), true, now).unwrap();
        ledger.insert(past.clone()).await.unwrap();
        ledger.insert(future.clone()).await.unwrap();

        let last = ledger.find_last_approved(item, now).await.unwrap();
        assert_eq!(last.map(|b| b.booking_id), Some(past.booking_id));

        let next = ledger.find_next_approved(item, now).await.unwrap();
        assert_eq!(next.map(|b| b.booking_id), Some(future.booking_id));

        assert!(ledger.has_completed_booking(booker, item, now).await.unwrap());
        assert!(
            !ledger
                .has_completed_booking(UserId::new(), item, now)
                .await
                .unwrap()
        );
    }
}
