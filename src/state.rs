use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    config::{EmailsConfig, UsersConfig},
    emails::EmailClient,
    http::HttpClient,
    mailing::Mailer,
    users::store::CredentialStore,
};

#[derive(Clone, Debug)]
pub struct SharedState {
    clock: Arc<dyn Clock>,
    http_client: HttpClient,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            http_client: HttpClient::new(),
        }
    }

    pub fn stub() -> Self {
        Self::new()
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }
}

#[derive(Clone)]
pub struct UsersState {
    config: UsersConfig,
    shared: SharedState,
    store: Arc<dyn CredentialStore>,
    email_client: EmailClient,
}

impl UsersState {
    pub fn new(config: UsersConfig, shared: SharedState, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            email_client: EmailClient::new(shared.http_client().clone(), &config),
            config,
            shared,
            store,
        }
    }

    pub fn config(&self) -> &UsersConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn CredentialStore {
        &*self.store
    }

    pub fn email_client(&self) -> &EmailClient {
        &self.email_client
    }

    pub fn clock(&self) -> &dyn Clock {
        self.shared.clock()
    }
}

#[derive(Clone, Debug)]
pub struct EmailsState {
    config: EmailsConfig,
    mailer: Mailer,
}

impl EmailsState {
    pub fn new(config: EmailsConfig, mailer: Mailer) -> Self {
        Self { config, mailer }
    }

    pub fn config(&self) -> &EmailsConfig {
        &self.config
    }

    pub fn mailer(&self) -> &Mailer {
        &self.mailer
    }
}
