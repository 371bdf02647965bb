use std::{ops::Deref, str::FromStr};

use sqlx::{
    migrate::Migrator,
    pool::PoolConnection,
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool, Postgres,
};

use crate::{errors::AppError, log_and_wrap_custom_internal};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone, Debug)]
pub struct Database(PgPool);

impl Deref for Database {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Database {
    pub fn new(url: &str) -> Result<Database, AppError> {
        let database_config = PgConnectOptions::from_str(url)
            .map_err(|e| log_and_wrap_custom_internal!(e))?
            .application_name(env!("CARGO_PKG_NAME"));

        Ok(Self(
            PgPoolOptions::new().connect_lazy_with(database_config),
        ))
    }

    pub async fn run_migrations(&self) -> Result<(), AppError> {
        MIGRATOR
            .run(&**self)
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    /// Checks a connection out of the pool. It goes back when dropped.
    pub async fn connection(&self) -> Result<PoolConnection<Postgres>, AppError> {
        self.acquire()
            .await
            .map_err(|e| log_and_wrap_custom_internal!(e))
    }
}
