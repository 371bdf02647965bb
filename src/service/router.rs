use axum::{
    http::{header::AUTHORIZATION, HeaderName, Request, StatusCode},
    response::{IntoResponse, Json, Response},
    Router,
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestId, RequestId},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
    trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    LatencyUnit, ServiceBuilderExt,
};
use tracing::Level;

use crate::auth::API_KEY_HEADER;

use super::ErrorMessage;

pub fn get_router<S>(state: S, routes: Router<S>) -> Router
where
    S: Send + Sync + Clone + 'static,
{
    let sensitive_headers: Arc<[_]> =
        vec![AUTHORIZATION, HeaderName::from_static(API_KEY_HEADER)].into();
    let middleware = ServiceBuilder::new()
        // Keep credentials and the API key out of the logs
        .layer(SetSensitiveRequestHeadersLayer::from_shared(
            sensitive_headers.clone(),
        ))
        .set_x_request_id(SequentialRequestId::default())
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new())
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Micros),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .sensitive_response_headers(sensitive_headers)
        .compression()
        .propagate_x_request_id();

    Router::new()
        .merge(routes)
        .fallback(error_404)
        .layer(middleware)
        .with_state(state)
}

#[derive(Clone, Default)]
struct SequentialRequestId {
    counter: Arc<AtomicU64>,
}

impl MakeRequestId for SequentialRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        self.counter
            .fetch_add(1, Ordering::SeqCst)
            .to_string()
            .parse()
            .ok()
            .map(RequestId::new)
    }
}

async fn error_404() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorMessage::new("Not Found".into())),
    )
        .into_response()
}
