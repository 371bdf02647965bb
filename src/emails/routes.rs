use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    auth::ApiKey,
    service::{AppResult, ErrorMessage, Message, ValidJson},
    state::EmailsState,
};

use super::{dtos::SendEmail, services};

#[derive(OpenApi)]
#[openapi(
    paths(send),
    components(schemas(SendEmail, Message, ErrorMessage)),
    tags((name = "emails", description = "Activation email delivery"))
)]
pub struct EmailsApi;

pub fn routes() -> Router<EmailsState> {
    Router::new()
        .route("/api/v1/emails/send", post(send))
        .route("/emails/openapi.json", get(openapi))
}

#[utoipa::path(
    post,
    path = "/api/v1/emails/send",
    tag = "emails",
    request_body = SendEmail,
    params(("x-api-key" = String, Header, description = "Shared API key")),
    responses(
        (status = 200, description = "Email sent", body = Message),
        (status = 403, description = "Missing or invalid API key", body = ErrorMessage),
        (status = 422, description = "Invalid email or code", body = ErrorMessage),
        (status = 500, description = "SMTP delivery failed", body = ErrorMessage),
    )
)]
async fn send(
    State(state): State<EmailsState>,
    _: ApiKey,
    ValidJson(input): ValidJson<SendEmail>,
) -> AppResult<Message> {
    services::send_activation_email(state.mailer(), input).await?;
    Ok(Json(Message::new("Email sent successfully")))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(EmailsApi::openapi())
}
