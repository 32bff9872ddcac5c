use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::ServerError, key::ObjectKey};

const KEY_PARAM: &str = "key";

#[async_trait]
impl<S> FromRequestParts<S> for ObjectKey
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .map_err(|e| ServerError::missing_key(e.to_string()))?;

        let mut values = pairs
            .into_iter()
            .filter(|(name, _)| name == KEY_PARAM)
            .map(|(_, value)| value);

        match (values.next(), values.next()) {
            (Some(value), None) => ObjectKey::parse(value),
            (None, _) => Err(ServerError::missing_key("the `key` parameter is absent")),
            (Some(_), Some(_)) => Err(ServerError::missing_key(
                "the `key` parameter was given more than once",
            )),
        }
    }
}
