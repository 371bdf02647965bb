use chrono::{DateTime, Utc};
use enrol_macros::Insertable;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "test@gmail.com")]
    pub email: String,
    #[schema(example = false)]
    pub is_active: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ActivationCode {
    pub id: i64,
    pub user_id: i64,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl ActivationCode {
    /// A code is still usable at exactly `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn matches(&self, code: &str) -> bool {
        self.code == code
    }
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[table_name = "activation_codes"]
pub struct NewActivationCode {
    pub user_id: i64,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}
