use crate::domain::value_objects::{ItemId, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アイテム情報（カタログコンテキストからの読み取り専用コピー）
///
/// 判定のたびに取得し直す。所有者や貸出可否をキャッシュしないこと。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub item_id: ItemId,
    pub owner_id: UserId,
    pub available: bool,
}

/// アイテムサービスポート
///
/// 予約コンテキストとカタログコンテキストの境界を維持する。
#[async_trait]
pub trait ItemService: Send + Sync {
    /// アイテムが存在するか確認する
    async fn exists(&self, item_id: ItemId) -> Result<bool>;

    /// アイテムを取得する
    async fn get(&self, item_id: ItemId) -> Result<Option<ItemSnapshot>>;

    /// アイテムが指定ユーザーの所有か確認する
    ///
    /// アイテムが存在しない場合は`false`。
    async fn is_owned_by(&self, item_id: ItemId, user_id: UserId) -> Result<bool>;

    /// ユーザーが所有するアイテムのIDを取得する
    ///
    /// 所有者向けの予約一覧とアイテム一覧で使用される。
    async fn find_ids_by_owner(&self, owner_id: UserId) -> Result<Vec<ItemId>>;
}
