//! Scheduler authentication extractor
//!
//! Guards the reminder sweep endpoint. When a cron secret is configured the
//! caller must present it as a bearer token; otherwise the endpoint is open.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::response::ApiError;
use crate::state::AppState;

/// Marker proving the request may trigger a reminder sweep
#[derive(Debug, Clone, Copy)]
pub struct CronAuth;

#[async_trait]
impl<S> FromRequestParts<S> for CronAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Some(secret) = app_state.cron_secret() else {
            return Ok(CronAuth);
        };

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        if !secrets_match(bearer.token(), secret) {
            tracing::warn!("Rejected reminder sweep with wrong cron secret");
            return Err(ApiError::InvalidAuthFormat);
        }

        Ok(CronAuth)
    }
}

/// Compare without short-circuiting on the first differing byte
fn secrets_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("s3cret", "s3cret"));
        assert!(!secrets_match("s3creT", "s3cret"));
        assert!(!secrets_match("s3cre", "s3cret"));
        assert!(!secrets_match("", "s3cret"));
    }
}
