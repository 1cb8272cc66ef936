use crate::domain::value_objects::UserId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザー情報（ユーザー管理コンテキストからの読み取り専用コピー）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    pub user_id: UserId,
    pub name: String,
}

/// ユーザーサービスポート
///
/// 予約コンテキストとユーザー管理コンテキストの境界を維持する。
/// 予約コンテキストはUserIDのみを知り、プロフィールの詳細は持たない。
#[async_trait]
pub trait UserService: Send + Sync {
    /// ユーザーが存在するか確認する
    async fn exists(&self, user_id: UserId) -> Result<bool>;

    /// ユーザーを取得する
    async fn get(&self, user_id: UserId) -> Result<Option<UserSnapshot>>;
}
