use sentry_tracing::EventFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::Env;

/// Flushes pending logs and sentry events when dropped.
pub struct TracingGuards {
    _writer: WorkerGuard,
    _sentry: Option<sentry::ClientInitGuard>,
}

pub fn init_tracing(env: &Env, sentry_token: Option<&str>) -> TracingGuards {
    let (writer, writer_guard) = tracing_appender::non_blocking(std::io::stdout());

    let sentry_guard = sentry_token.map(|token| {
        let debug = matches!(env, Env::Development | Env::Test);
        sentry::init((
            token,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(env.to_string().into()),
                debug,
                ..Default::default()
            },
        ))
    });

    let sentry_layer = sentry_guard.as_ref().map(|_| {
        sentry_tracing::layer().event_filter(|md| match *md.level() {
            tracing::Level::ERROR | tracing::Level::WARN => EventFilter::Event,
            tracing::Level::INFO => EventFilter::Breadcrumb,
            _ => EventFilter::Ignore,
        })
    });

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .log_internal_errors(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_current_span(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_span_list(true)
                .with_target(true),
        )
        .with(sentry_layer);

    if let Err(e) = registry.try_init() {
        eprintln!("tracing was already initialised: {e}");
    }

    TracingGuards {
        _writer: writer_guard,
        _sentry: sentry_guard,
    }
}
