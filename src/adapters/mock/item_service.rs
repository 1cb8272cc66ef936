use crate::domain::value_objects::{ItemId, UserId};
use crate::ports::item_service::{ItemService as ItemServiceTrait, ItemSnapshot, Result};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// ItemServiceのモック実装
///
/// 登録順を保持する。所有者のアイテム一覧は登録順で返す。
pub struct ItemService {
    items: Mutex<Vec<ItemSnapshot>>,
}

impl ItemService {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// テスト用にアイテムを登録
    pub fn add_item(&self, item_id: ItemId, owner_id: UserId, available: bool) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ItemSnapshot {
                item_id,
                owner_id,
                available,
            });
    }

    /// テスト用に貸出可否を変更
    pub fn set_available(&self, item_id: ItemId, available: bool) {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(item) = items.iter_mut().find(|i| i.item_id == item_id) {
            item.available = available;
        }
    }

    /// テスト用に所有者を変更
    pub fn set_owner(&self, item_id: ItemId, owner_id: UserId) {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(item) = items.iter_mut().find(|i| i.item_id == item_id) {
            item.owner_id = owner_id;
        }
    }

    fn find(&self, item_id: ItemId) -> Option<ItemSnapshot> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|i| i.item_id == item_id)
            .cloned()
    }
}

impl Default for ItemService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemServiceTrait for ItemService {
    async fn exists(&self, item_id: ItemId) -> Result<bool> {
        Ok(self.find(item_id).is_some())
    }

    async fn get(&self, item_id: ItemId) -> Result<Option<ItemSnapshot>> {
        Ok(self.find(item_id))
    }

    async fn is_owned_by(&self, item_id: ItemId, user_id: UserId) -> Result<bool> {
        Ok(self
            .find(item_id)
            .is_some_and(|item| item.owner_id == user_id))
    }

    async fn find_ids_by_owner(&self, owner_id: UserId) -> Result<Vec<ItemId>> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items
            .iter()
            .filter(|i| i.owner_id == owner_id)
            .map(|i| i.item_id)
            .collect())
    }
}
