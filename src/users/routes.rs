use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    auth::BasicCredentials,
    service::{AppResult, ErrorMessage, ValidJson},
    state::UsersState,
};

use super::{
    dtos::{ActivateUser, RegisterUser},
    models::User,
    services,
};

#[derive(OpenApi)]
#[openapi(
    paths(register, activate),
    components(schemas(RegisterUser, ActivateUser, User, ErrorMessage)),
    tags((name = "users", description = "Registration and account activation"))
)]
pub struct UsersApi;

pub fn routes() -> Router<UsersState> {
    Router::new()
        .route("/api/v1/users/register", post(register))
        .route("/api/v1/users/activate", post(activate))
        .route("/users/openapi.json", get(openapi))
}

/// Registers a user and sends an email containing the activation code.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body = RegisterUser,
    responses(
        (status = 200, description = "User created, activation code sent", body = User),
        (status = 400, description = "User already exists", body = ErrorMessage),
        (status = 422, description = "Invalid email or password", body = ErrorMessage),
        (status = 500, description = "The activation email could not be sent", body = ErrorMessage),
    )
)]
async fn register(
    State(state): State<UsersState>,
    ValidJson(input): ValidJson<RegisterUser>,
) -> AppResult<User> {
    services::register(&state, input).await.map(Json)
}

/// Activates an account. Credentials go in an `Authorization: Basic` header.
#[utoipa::path(
    post,
    path = "/api/v1/users/activate",
    tag = "users",
    request_body = ActivateUser,
    responses(
        (status = 200, description = "User activated", body = User),
        (status = 400, description = "Already active, invalid or expired code", body = ErrorMessage),
        (status = 401, description = "Invalid credentials", body = ErrorMessage),
        (status = 404, description = "User not found", body = ErrorMessage),
        (status = 422, description = "Malformed activation code", body = ErrorMessage),
    )
)]
async fn activate(
    State(state): State<UsersState>,
    credentials: BasicCredentials,
    ValidJson(input): ValidJson<ActivateUser>,
) -> AppResult<User> {
    services::activate(&state, credentials, input).await.map(Json)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(UsersApi::openapi())
}
