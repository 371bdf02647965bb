use crate::{
    auth::{hash_password, verify_password, BasicCredentials},
    errors::AppError,
    state::UsersState,
};

use super::{
    activation::GeneratedCode,
    dtos::{ActivateUser, RegisterUser},
    models::{ActivationCode, NewUser, User},
};

pub async fn register(state: &UsersState, input: RegisterUser) -> Result<User, AppError> {
    let (user, code) = create_user(state, input).await?;

    state
        .email_client()
        .send_activation_code(&user.email, &code.code)
        .await?;

    Ok(user)
}

async fn create_user(
    state: &UsersState,
    input: RegisterUser,
) -> Result<(User, ActivationCode), AppError> {
    let mut connection = state.store().acquire().await?;

    if connection.find_user_by_email(&input.email).await?.is_some() {
        return Err(AppError::UserAlreadyExists);
    }

    let password_hash = hash_password(&input.password)?;
    let code = GeneratedCode::generate(
        state.clock().now(),
        state.config().activation_code_ttl(),
    );

    let (user, code) = connection
        .create_user_with_code(
            NewUser {
                email: input.email,
                password_hash,
            },
            code,
        )
        .await?;

    tracing::info!(
        user_id = user.id,
        expires_at = %code.expires_at,
        "user registered"
    );
    Ok((user, code))
}

pub async fn activate(
    state: &UsersState,
    credentials: BasicCredentials,
    input: ActivateUser,
) -> Result<User, AppError> {
    let mut connection = state.store().acquire().await?;

    let account = connection
        .find_user_by_email(&credentials.username)
        .await?
        .ok_or(AppError::DoesNotExist)?;

    if account.user.is_active {
        return Err(AppError::AlreadyActivated);
    }

    verify_password(&credentials.password, &account.password_hash)?;

    let code = connection
        .latest_activation_code(account.user.id)
        .await?
        .filter(|c| c.matches(&input.code))
        .ok_or(AppError::InvalidActivationCode)?;

    if code.is_expired(state.clock().now()) {
        return Err(AppError::ExpiredActivationCode);
    }

    let user = connection
        .activate_user(account.user.id)
        .await?
        .ok_or(AppError::AlreadyActivated)?;

    tracing::info!(user_id = user.id, "user activated");
    Ok(user)
}
