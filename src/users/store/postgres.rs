use async_trait::async_trait;
use sqlx::{pool::PoolConnection, Connection, Postgres};

use crate::{
    database::Database,
    errors::AppError,
    users::{
        activation::GeneratedCode,
        models::{ActivationCode, NewActivationCode, NewUser, User, UserWithPassword},
    },
};

use super::{CredentialStore, StoreConnection};

#[derive(Clone, Debug)]
pub struct PgStore {
    database: Database,
}

impl PgStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, AppError> {
        let connection = self.database.connection().await?;
        Ok(Box::new(PgStoreConnection(connection)))
    }

    async fn run_migrations(&self) -> Result<(), AppError> {
        self.database.run_migrations().await
    }
}

pub struct PgStoreConnection(PoolConnection<Postgres>);

#[async_trait]
impl StoreConnection for PgStoreConnection {
    async fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, AppError> {
        Ok(sqlx::query_as(
            "SELECT id, email, password_hash, is_active FROM users WHERE email = $1;",
        )
        .bind(email)
        .fetch_optional(&mut *self.0)
        .await?)
    }

    async fn create_user_with_code(
        &mut self,
        user: NewUser,
        code: GeneratedCode,
    ) -> Result<(User, ActivationCode), AppError> {
        let mut tx = self.0.begin().await?;

        let user: User = sqlx::query_as(&format!(
            "{} RETURNING id, email, is_active;",
            NewUser::insert_query()
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        let code = code.assign_to(user.id);
        let code: ActivationCode = sqlx::query_as(&format!(
            "{} RETURNING id, user_id, code, expires_at;",
            NewActivationCode::insert_query()
        ))
        .bind(code.user_id)
        .bind(&code.code)
        .bind(code.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((user, code))
    }

    async fn latest_activation_code(
        &mut self,
        user_id: i64,
    ) -> Result<Option<ActivationCode>, AppError> {
        Ok(sqlx::query_as(
            "SELECT id, user_id, code, expires_at FROM activation_codes
                WHERE user_id = $1
                ORDER BY id DESC
                LIMIT 1;",
        )
        .bind(user_id)
        .fetch_optional(&mut *self.0)
        .await?)
    }

    async fn activate_user(&mut self, user_id: i64) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as(
            "UPDATE users SET is_active = TRUE
                WHERE id = $1 AND is_active = FALSE
                RETURNING id, email, is_active;",
        )
        .bind(user_id)
        .fetch_optional(&mut *self.0)
        .await?)
    }
}
