mod memory;
mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;

use super::{
    activation::GeneratedCode,
    models::{ActivationCode, NewUser, User, UserWithPassword},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Where users and their activation codes live.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Hands out a connection scoped to the caller. Dropping it releases it.
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, AppError>;

    async fn run_migrations(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
pub trait StoreConnection: Send {
    async fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, AppError>;

    /// Inserts the user and its first activation code atomically.
    /// Fails with [`AppError::UserAlreadyExists`] when the email is taken.
    async fn create_user_with_code(
        &mut self,
        user: NewUser,
        code: GeneratedCode,
    ) -> Result<(User, ActivationCode), AppError>;

    async fn latest_activation_code(
        &mut self,
        user_id: i64,
    ) -> Result<Option<ActivationCode>, AppError>;

    /// Flips `is_active` to true. Returns `None` if the user is missing or
    /// was already active.
    async fn activate_user(&mut self, user_id: i64) -> Result<Option<User>, AppError>;
}
