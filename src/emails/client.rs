use reqwest::StatusCode;

use crate::{
    auth::API_KEY_HEADER, config::UsersConfig, errors::AppError, http::HttpClient,
    service::ErrorMessage,
};

use super::dtos::SendEmail;

/// Talks to the emails service on behalf of the users service.
#[derive(Debug, Clone)]
pub struct EmailClient {
    http: HttpClient,
    endpoint: String,
    api_key: String,
}

impl EmailClient {
    pub fn new(http: HttpClient, config: &UsersConfig) -> Self {
        Self {
            http,
            endpoint: config.email_endpoint(),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn send_activation_code(&self, email: &str, code: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&SendEmail {
                email: email.to_owned(),
                code: code.to_owned(),
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint = %self.endpoint, error = %e, "email service unreachable");
                AppError::EmailServiceUnreachable(e)
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let message = match response.json::<ErrorMessage>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Email service error")
                .to_owned(),
        };
        tracing::error!(status = status.as_u16(), %message, "email service rejected the activation code");
        Err(AppError::Downstream(status, message))
    }
}
