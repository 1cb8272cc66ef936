use crate::domain::UserId;
use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::error::ApiError;

/// 呼び出し元ユーザーを示すヘッダー
pub const USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// リクエストヘッダーから取り出した呼び出し元ユーザー
///
/// 認証は行わない。値はそのまま信頼し、認可判定だけに使う。
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(ApiError::MissingUserHeader)?;

        let text = value
            .to_str()
            .map_err(|_| ApiError::InvalidUserHeader("<non-ascii>".to_string()))?;

        let uuid = Uuid::parse_str(text.trim())
            .map_err(|_| ApiError::InvalidUserHeader(text.to_string()))?;

        Ok(CallerId(UserId::from_uuid(uuid)))
    }
}

/// `Query`の拒否をApiErrorのJSONで返すラッパー
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ValidQuery(value))
    }
}

/// `Path`の拒否をApiErrorのJSONで返すラッパー
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ValidPath(value))
    }
}

/// `Json`の拒否をApiErrorのJSONで返すラッパー
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ValidJson(value))
    }
}
