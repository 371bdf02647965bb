use std::sync::Arc;

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{config::EmailsConfig, errors::AppError, log_and_wrap_custom_internal};

pub const ACTIVATION_SUBJECT: &str = "Activation Code";

#[derive(Clone, Debug)]
pub enum Mailer {
    Smtp {
        transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
        from: Mailbox,
    },
    /// Delivery is switched off; messages only reach the logs.
    DryRun,
}

impl Default for Mailer {
    fn default() -> Self {
        Self::DryRun
    }
}

impl Mailer {
    pub fn new(config: &EmailsConfig) -> Result<Self, AppError> {
        if !config.use_smtp {
            return Ok(Self::DryRun);
        }

        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .map_err(|e| log_and_wrap_custom_internal!(e))?;
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            .map_err(|e| log_and_wrap_custom_internal!(e))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self::Smtp {
            transport: Arc::new(transport),
            from,
        })
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun)
    }

    pub async fn send_activation_code(&self, to: &str, code: &str) -> Result<(), AppError> {
        let body = activation_body(code);
        match self {
            Self::DryRun => {
                tracing::info!(email = %to, %code, "smtp disabled, activation code not sent");
                Ok(())
            }
            Self::Smtp { transport, from } => {
                let message = Message::builder()
                    .from(from.clone())
                    .to(to
                        .parse()
                        .map_err(|e: lettre::address::AddressError| {
                            AppError::EmailDelivery(e.to_string())
                        })?)
                    .subject(ACTIVATION_SUBJECT)
                    .header(ContentType::TEXT_PLAIN)
                    .body(body)
                    .map_err(|e| AppError::EmailDelivery(e.to_string()))?;

                transport.send(message).await.map_err(|e| {
                    tracing::error!(email = %to, error = %e, "smtp delivery failed");
                    AppError::EmailDelivery(e.to_string())
                })?;

                tracing::info!(email = %to, "activation code sent");
                Ok(())
            }
        }
    }
}

pub fn activation_body(code: &str) -> String {
    format!("Your Activation code is: {}", code)
}
