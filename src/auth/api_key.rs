use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{errors::AppError, state::EmailsState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the caller presented the configured `x-api-key`.
#[derive(Debug)]
pub struct ApiKey;

impl FromRequestParts<EmailsState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &EmailsState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .ok_or(AppError::MissingApiKey)?
            .to_str()
            .map_err(|_| AppError::InvalidApiKey)?;

        if presented != state.config().api_key {
            return Err(AppError::InvalidApiKey);
        }
        Ok(Self)
    }
}
