//! Runs against a real Postgres when `TEST_DATABASE_URL` is set, skipped otherwise.

use chrono::{Duration, Utc};
use enrol::{
    database::Database,
    users::{
        activation::GeneratedCode,
        models::NewUser,
        store::{CredentialStore, PgStore},
    },
    AppError,
};

async fn store() -> Option<PgStore> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL is not set, skipping");
        return None;
    };
    let store = PgStore::new(Database::new(&url).unwrap());
    store.run_migrations().await.unwrap();
    Some(store)
}

fn unique_email(prefix: &str) -> String {
    format!(
        "{}-{}@example.com",
        prefix,
        Utc::now().timestamp_nanos_opt().unwrap()
    )
}

#[tokio::test]
async fn test_user_and_code_are_created_together() {
    let Some(store) = store().await else {
        return;
    };
    let mut connection = store.acquire().await.unwrap();
    let email = unique_email("create");

    let (user, code) = connection
        .create_user_with_code(
            NewUser {
                email: email.clone(),
                password_hash: "hash".into(),
            },
            GeneratedCode::generate(Utc::now(), Duration::minutes(1)),
        )
        .await
        .unwrap();

    assert!(!user.is_active);
    assert_eq!(code.user_id, user.id);

    let found = connection.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.user, user);
    assert_eq!(found.password_hash, "hash");

    let latest = connection
        .latest_activation_code(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest, code);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let Some(store) = store().await else {
        return;
    };
    let mut connection = store.acquire().await.unwrap();
    let email = unique_email("duplicate");
    let new_user = || NewUser {
        email: email.clone(),
        password_hash: "hash".into(),
    };

    connection
        .create_user_with_code(
            new_user(),
            GeneratedCode::generate(Utc::now(), Duration::minutes(1)),
        )
        .await
        .unwrap();
    let second = connection
        .create_user_with_code(
            new_user(),
            GeneratedCode::generate(Utc::now(), Duration::minutes(1)),
        )
        .await;

    assert!(matches!(second, Err(AppError::UserAlreadyExists)));
}

#[tokio::test]
async fn test_activation_happens_once() {
    let Some(store) = store().await else {
        return;
    };
    let mut connection = store.acquire().await.unwrap();
    let (user, _) = connection
        .create_user_with_code(
            NewUser {
                email: unique_email("activate"),
                password_hash: "hash".into(),
            },
            GeneratedCode::generate(Utc::now(), Duration::minutes(1)),
        )
        .await
        .unwrap();

    let activated = connection.activate_user(user.id).await.unwrap().unwrap();
    assert!(activated.is_active);
    assert!(connection.activate_user(user.id).await.unwrap().is_none());
}
