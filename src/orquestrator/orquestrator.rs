use std::io;

use menva::read_default_file;
use tokio::task::JoinSet;

use crate::{
    config::SharedConfig,
    service::{Service, ServiceExt},
    state::SharedState,
};

use super::tracing::{init_tracing, TracingGuards};

#[derive(Default)]
pub struct ServicesOrquestrator {
    config: SharedConfig,
    services: Vec<Service>,
    run_migrations: bool,
    tracing: Option<TracingGuards>,
}

impl ServicesOrquestrator {
    pub fn load_environment_variables(self) -> Self {
        read_default_file();
        self
    }

    pub fn set_config_from_env(mut self) -> Self {
        self.config = SharedConfig::from_env();
        self
    }

    pub fn enable_migrations(mut self) -> Self {
        self.run_migrations = true;
        self
    }

    pub fn init_tracing(mut self) -> Self {
        self.tracing = Some(init_tracing(&self.config.env, self.config.sentry_token()));
        self
    }

    pub fn add_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    async fn start_services(self) -> io::Result<()> {
        let mut set = JoinSet::new();

        let state = SharedState::new();

        for mut service in self.services {
            let name = service.name();
            if let Err(e) = service.set_up(state.clone()).await {
                tracing::error!(service = name, error = %e, "service set up failed");
                return Err(io::Error::other(e));
            }

            if self.run_migrations {
                if let Err(e) = service.run_migrations().await {
                    tracing::error!(service = name, error = %e, "migrations failed");
                    return Err(io::Error::other(e));
                }
            }

            set.spawn(async move { (name, service.run().await) });
        }

        let mut outcome = Ok(());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((name, Ok(()))) => tracing::info!(service = name, "service stopped"),
                Ok((name, Err(e))) => {
                    tracing::error!(service = name, error = %e, "service crashed");
                    outcome = Err(e);
                }
                Err(e) => {
                    tracing::error!(error = %e, "service task panicked");
                    outcome = Err(io::Error::other(e));
                }
            }
        }
        outcome
    }

    pub fn run(self) -> io::Result<()> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(self.config.worker_threads)
            .max_blocking_threads(self.config.max_blocking_threads)
            .build()?
            .block_on(self.start_services())
    }
}
