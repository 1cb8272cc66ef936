use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 予約ID - 予約管理コンテキストの集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

/// アイテムID - カタログコンテキストへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// ユーザーID - ユーザー管理コンテキストへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// ページ指定エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// offsetが負の値
    NegativeOffset(i64),
    /// limitが1未満
    NonPositiveLimit(i64),
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::NegativeOffset(v) => write!(f, "from must be zero or positive, got {}", v),
            PageError::NonPositiveLimit(v) => write!(f, "size must be positive, got {}", v),
        }
    }
}

/// ページ指定
///
/// 不変条件：offset >= 0、limit >= 1
/// 不正な値はAPI層で弾かれ、アプリケーション層には到達しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    offset: usize,
    limit: usize,
}

impl Page {
    pub const DEFAULT_OFFSET: usize = 0;
    pub const DEFAULT_LIMIT: usize = 10;

    /// 生の整数値からページ指定を作成する
    ///
    /// # エラー
    /// offsetが負、またはlimitが1未満の場合は`PageError`を返す
    pub fn new(offset: i64, limit: i64) -> Result<Self, PageError> {
        let offset = usize::try_from(offset).map_err(|_| PageError::NegativeOffset(offset))?;
        let limit = match usize::try_from(limit) {
            Ok(l) if l >= 1 => l,
            _ => return Err(PageError::NonPositiveLimit(limit)),
        };
        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// 整列・絞り込み済みの列にページを適用する
    ///
    /// offsetが列の長さを超える場合は空を返す。
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: Self::DEFAULT_OFFSET,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
