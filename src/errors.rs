use std::collections::HashMap;

use axum::{
    extract::rejection::JsonRejection,
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use validator::ValidationErrors;

use crate::service::ErrorMessage;

#[macro_export]
macro_rules! log_and_wrap_custom_internal {
    ($e:expr) => {{
        tracing::error!(
            file = file!(),
            line = line!(),
            error = %$e,
            "internal error"
        );
        $crate::errors::AppError::custom_internal(&$e.to_string())
    }};
}

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationErrors),
    JsonRejection(JsonRejection),
    UserAlreadyExists,
    DoesNotExist,
    AlreadyActivated,
    MissingCredentials,
    WrongPassword(argon2::password_hash::Error),
    InvalidActivationCode,
    ExpiredActivationCode,
    MissingApiKey,
    InvalidApiKey,
    EmailDelivery(String),
    Downstream(StatusCode, String),
    EmailServiceUnreachable(reqwest::Error),
    ErrorHashingPassword(argon2::password_hash::Error),
    Database(sqlx::Error),
    CustomInternal(String),
}

impl AppError {
    pub fn custom_internal(message: &str) -> Self {
        Self::CustomInternal(message.to_owned())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::JsonRejection(rejection) => rejection.status(),
            Self::UserAlreadyExists
            | Self::AlreadyActivated
            | Self::InvalidActivationCode
            | Self::ExpiredActivationCode => StatusCode::BAD_REQUEST,
            Self::DoesNotExist => StatusCode::NOT_FOUND,
            Self::MissingCredentials | Self::WrongPassword(_) => StatusCode::UNAUTHORIZED,
            Self::MissingApiKey | Self::InvalidApiKey => StatusCode::FORBIDDEN,
            Self::Downstream(status, _) => *status,
            Self::EmailDelivery(_)
            | Self::EmailServiceUnreachable(_)
            | Self::ErrorHashingPassword(_)
            | Self::Database(_)
            | Self::CustomInternal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(_) => "Validation failed".into(),
            Self::JsonRejection(rejection) => rejection.body_text(),
            Self::UserAlreadyExists => "User already exists".into(),
            Self::DoesNotExist => "User not found".into(),
            Self::AlreadyActivated => "User has already activated his account".into(),
            Self::MissingCredentials | Self::MissingApiKey => "Not authenticated".into(),
            Self::WrongPassword(_) => "Invalid credentials".into(),
            Self::InvalidActivationCode => "Invalid activation code".into(),
            Self::ExpiredActivationCode => "Activation code has expired".into(),
            Self::InvalidApiKey => "Forbidden, you can't send email".into(),
            Self::EmailDelivery(cause) => format!("Failed to send email: {}", cause),
            Self::Downstream(_, message) => message.clone(),
            Self::EmailServiceUnreachable(_) => "Email service unreachable".into(),
            Self::ErrorHashingPassword(_) | Self::Database(_) | Self::CustomInternal(_) => {
                "Sorry no sorry, something wrong happened".into()
            }
        }
    }

    fn field_errors(&self) -> Option<HashMap<String, Vec<String>>> {
        let Self::Validation(errors) = self else {
            return None;
        };
        Some(
            errors
                .field_errors()
                .into_iter()
                .map(|(field, errors)| {
                    let messages = errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    (field.to_string(), messages)
                })
                .collect(),
        )
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongPassword(e) | Self::ErrorHashingPassword(e) => {
                write!(f, "{}: {}", self.message(), e)
            }
            Self::EmailServiceUnreachable(e) => write!(f, "{}: {}", self.message(), e),
            Self::Database(e) => write!(f, "database error: {}", e),
            Self::CustomInternal(e) => write!(f, "{}", e),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::info!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = ErrorMessage::new(self.message()).with_errors(self.field_errors());
        let mut response = (status, Json(body)).into_response();

        if let Self::MissingCredentials | Self::WrongPassword(_) = self {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
        }
        response
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::JsonRejection(rejection)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        let is_unique_violation = error
            .as_database_error()
            .is_some_and(|e| e.is_unique_violation());
        if is_unique_violation {
            return Self::UserAlreadyExists;
        }
        Self::Database(error)
    }
}
