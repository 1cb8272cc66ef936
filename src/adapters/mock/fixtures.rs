use crate::domain::value_objects::{ItemId, UserId};
use serde::Deserialize;
use uuid::Uuid;

use super::{ItemService, UserService};

/// 開発用の初期データ
///
/// ```json
/// {
///   "users": [{ "id": "…", "name": "alice" }],
///   "items": [{ "id": "…", "ownerId": "…", "available": true }]
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub users: Vec<UserFixture>,
    #[serde(default)]
    pub items: Vec<ItemFixture>,
}

#[derive(Debug, Deserialize)]
pub struct UserFixture {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFixture {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl Fixtures {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// モックのカタログに登録する（アイテムはファイル内の順序で登録）
    pub fn apply(&self, users: &UserService, items: &ItemService) {
        for user in &self.users {
            users.add_user(UserId::from_uuid(user.id), user.name.clone());
        }
        for item in &self.items {
            items.add_item(
                ItemId::from_uuid(item.id),
                UserId::from_uuid(item.owner_id),
                item.available,
            );
        }
    }
}
