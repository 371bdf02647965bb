use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{
    errors::AppError,
    users::{
        activation::GeneratedCode,
        models::{ActivationCode, NewUser, User, UserWithPassword},
    },
};

use super::{CredentialStore, StoreConnection};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserWithPassword>,
    activation_codes: Vec<ActivationCode>,
}

/// Keeps everything in process memory. Clones share the same tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<Mutex<Tables>>);

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn activation_codes_for(&self, user_id: i64) -> Vec<ActivationCode> {
        self.tables()
            .activation_codes
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn user(&self, user_id: i64) -> Option<User> {
        self.tables()
            .users
            .iter()
            .find(|u| u.user.id == user_id)
            .map(|u| u.user.clone())
    }

    /// Issues an extra code for an existing user, as a re-send would.
    pub fn insert_activation_code(&self, user_id: i64, code: GeneratedCode) -> ActivationCode {
        let mut tables = self.tables();
        let code = code.assign_to(user_id);
        let row = ActivationCode {
            id: tables.activation_codes.len() as i64 + 1,
            user_id: code.user_id,
            code: code.code,
            expires_at: code.expires_at,
        };
        tables.activation_codes.push(row.clone());
        row
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, AppError> {
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl StoreConnection for MemoryStore {
    async fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, AppError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.user.email == email)
            .cloned())
    }

    async fn create_user_with_code(
        &mut self,
        user: NewUser,
        code: GeneratedCode,
    ) -> Result<(User, ActivationCode), AppError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.user.email == user.email) {
            return Err(AppError::UserAlreadyExists);
        }

        let created = User {
            id: tables.users.len() as i64 + 1,
            email: user.email,
            is_active: false,
        };
        tables.users.push(UserWithPassword {
            user: created.clone(),
            password_hash: user.password_hash,
        });

        let code = code.assign_to(created.id);
        let row = ActivationCode {
            id: tables.activation_codes.len() as i64 + 1,
            user_id: code.user_id,
            code: code.code,
            expires_at: code.expires_at,
        };
        tables.activation_codes.push(row.clone());

        Ok((created, row))
    }

    async fn latest_activation_code(
        &mut self,
        user_id: i64,
    ) -> Result<Option<ActivationCode>, AppError> {
        Ok(self
            .tables()
            .activation_codes
            .iter()
            .filter(|c| c.user_id == user_id)
            .max_by_key(|c| c.id)
            .cloned())
    }

    async fn activate_user(&mut self, user_id: i64) -> Result<Option<User>, AppError> {
        let mut tables = self.tables();
        let Some(row) = tables
            .users
            .iter_mut()
            .find(|u| u.user.id == user_id && !u.user.is_active)
        else {
            return Ok(None);
        };
        row.user.is_active = true;
        Ok(Some(row.user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::default();
        let mut conn = store.acquire().await.unwrap();
        let code = GeneratedCode::generate(Utc::now(), Duration::minutes(1));

        conn.create_user_with_code(new_user("a@b.com"), code.clone())
            .await
            .unwrap();
        let result = conn.create_user_with_code(new_user("a@b.com"), code).await;

        assert!(matches!(result, Err(AppError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_latest_code_wins() {
        let store = MemoryStore::default();
        let mut conn = store.acquire().await.unwrap();
        let now = Utc::now();
        let (user, first) = conn
            .create_user_with_code(new_user("a@b.com"), GeneratedCode::generate(now, Duration::minutes(1)))
            .await
            .unwrap();

        let second = store.insert_activation_code(
            user.id,
            GeneratedCode::generate(now, Duration::minutes(1)),
        );

        let latest = conn.latest_activation_code(user.id).await.unwrap().unwrap();
        assert_eq!(latest, second);
        assert_ne!(latest.id, first.id);
    }

    #[tokio::test]
    async fn test_activation_is_one_way() {
        let store = MemoryStore::default();
        let mut conn = store.acquire().await.unwrap();
        let (user, _) = conn
            .create_user_with_code(new_user("a@b.com"), GeneratedCode::generate(Utc::now(), Duration::minutes(1)))
            .await
            .unwrap();

        let activated = conn.activate_user(user.id).await.unwrap().unwrap();
        assert!(activated.is_active);
        assert_eq!(conn.activate_user(user.id).await.unwrap(), None);
        assert_eq!(store.user(user.id).map(|u| u.is_active), Some(true));
    }
}
