use axum::Router;
use std::{io, sync::Arc};
use tokio::{net::TcpListener, signal};

use crate::{
    config::{EmailsConfig, ServiceConfig, UsersConfig},
    database::Database,
    emails,
    errors::AppError,
    mailing::Mailer,
    state::{EmailsState, SharedState, UsersState},
    users::{
        self,
        store::{CredentialStore, MemoryStore, PgStore},
    },
};

use super::get_router;

pub struct UsersService {
    config: UsersConfig,
    store: Option<Arc<dyn CredentialStore>>,
    router: Option<Router>,
}

impl UsersService {
    fn new(config: UsersConfig) -> Self {
        Self {
            config,
            store: None,
            router: None,
        }
    }
}

impl ServiceExt for UsersService {
    fn stub(self) -> Self {
        let store: Arc<dyn CredentialStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryStore::default()),
        };
        Self {
            config: UsersConfig::stub(),
            store: Some(store),
            router: None,
        }
    }

    async fn set_up(&mut self, shared: SharedState) -> Result<(), AppError> {
        let store = match &self.store {
            Some(store) => store.clone(),
            None => {
                let database = Database::new(&self.config.database_url())?;
                let store: Arc<dyn CredentialStore> = Arc::new(PgStore::new(database));
                self.store = Some(store.clone());
                store
            }
        };
        let state = UsersState::new(self.config.clone(), shared, store);
        self.router = Some(get_router(state, users::routes()));
        Ok(())
    }

    async fn run_migrations(&self) -> Result<(), AppError> {
        match &self.store {
            Some(store) => store.run_migrations().await,
            None => Ok(()),
        }
    }

    async fn run(self) -> io::Result<()> {
        self.config.print();
        serve(self.config.socket_addr(), self.router).await
    }
}

pub struct EmailsService {
    config: EmailsConfig,
    router: Option<Router>,
}

impl EmailsService {
    fn new(config: EmailsConfig) -> Self {
        Self {
            config,
            router: None,
        }
    }
}

impl ServiceExt for EmailsService {
    fn stub(self) -> Self {
        Self {
            config: EmailsConfig::stub(),
            router: None,
        }
    }

    async fn set_up(&mut self, _shared: SharedState) -> Result<(), AppError> {
        let mailer = Mailer::new(&self.config)?;
        if mailer.is_dry_run() {
            tracing::warn!("smtp delivery is disabled, activation codes will only be logged");
        }
        let state = EmailsState::new(self.config.clone(), mailer);
        self.router = Some(get_router(state, emails::routes()));
        Ok(())
    }

    async fn run(self) -> io::Result<()> {
        self.config.print();
        serve(self.config.socket_addr(), self.router).await
    }
}

pub enum Service {
    Users(UsersService),
    Emails(EmailsService),
}

impl Service {
    pub fn users(env_prefix: &str) -> Self {
        Self::users_from_config(UsersConfig::from_env_with_prefix(env_prefix))
    }

    pub fn emails(env_prefix: &str) -> Self {
        Self::emails_from_config(EmailsConfig::from_env_with_prefix(env_prefix))
    }

    pub fn users_from_config(config: UsersConfig) -> Self {
        Self::Users(UsersService::new(config))
    }

    pub fn emails_from_config(config: EmailsConfig) -> Self {
        Self::Emails(EmailsService::new(config))
    }

    /// Replaces the Postgres store the users service would otherwise open.
    pub fn with_store(mut self, store: impl CredentialStore + 'static) -> Self {
        if let Self::Users(service) = &mut self {
            service.store = Some(Arc::new(store));
        }
        self
    }

    pub fn router(&self) -> Option<&Router> {
        match self {
            Self::Users(s) => s.router.as_ref(),
            Self::Emails(s) => s.router.as_ref(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Users(_) => "users",
            Self::Emails(_) => "emails",
        }
    }
}

impl ServiceExt for Service {
    fn stub(self) -> Self {
        match self {
            Self::Users(s) => Self::Users(s.stub()),
            Self::Emails(s) => Self::Emails(s.stub()),
        }
    }

    async fn set_up(&mut self, shared: SharedState) -> Result<(), AppError> {
        match self {
            Self::Users(s) => s.set_up(shared).await,
            Self::Emails(s) => s.set_up(shared).await,
        }
    }

    async fn run_migrations(&self) -> Result<(), AppError> {
        match self {
            Self::Users(s) => s.run_migrations().await,
            Self::Emails(s) => s.run_migrations().await,
        }
    }

    async fn run(self) -> io::Result<()> {
        match self {
            Self::Users(s) => s.run().await,
            Self::Emails(s) => s.run().await,
        }
    }
}

pub trait ServiceExt {
    fn stub(self) -> Self;
    fn set_up(
        &mut self,
        _shared: SharedState,
    ) -> impl std::future::Future<Output = Result<(), AppError>> {
        async { Ok(()) }
    }
    fn run_migrations(&self) -> impl std::future::Future<Output = Result<(), AppError>> {
        async { Ok(()) }
    }
    fn run(self) -> impl std::future::Future<Output = io::Result<()>>;
}

async fn serve(addr: (std::net::Ipv4Addr, u16), router: Option<Router>) -> io::Result<()> {
    let router = router.ok_or_else(|| io::Error::other("service was not set up"))?;
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
        tracing::info!("shutdown gracefully from ctrl-c");
        },
        _ = terminate => {
        tracing::info!("shutdown gracefully from signal");
        },
    }
}
