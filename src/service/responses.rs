use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Json, Response},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};
use validator::Validate;

use crate::errors::AppError;

pub type AppResult<T> = std::result::Result<Json<T>, AppError>;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T> IntoResponse for AppJson<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// JSON body that has also passed its `validator` rules.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let AppJson(value) = AppJson::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

#[derive(Debug, Serialize, Deserialize, ToResponse, ToSchema)]
pub struct ErrorMessage {
    #[schema(example = "User already exists")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl ErrorMessage {
    pub fn new(message: String) -> Self {
        Self {
            message,
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Option<HashMap<String, Vec<String>>>) -> Self {
        self.errors = errors;
        self
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Message {
    #[schema(example = "Email sent successfully")]
    pub message: String,
}

impl Message {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}
