use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tower::ServiceExt as _;

use crate::state::SharedState;

use super::{Service, ServiceExt};

/// Serves a fully set up [`Service`] in process, without binding a socket.
pub struct StubService(Router);

impl StubService {
    pub async fn new(mut service: Service, shared: SharedState) -> Self {
        let name = service.name();
        service
            .set_up(shared)
            .await
            .unwrap_or_else(|e| panic!("stub {name} service could not be set up: {e}"));
        service
            .run_migrations()
            .await
            .unwrap_or_else(|e| panic!("stub {name} service could not migrate: {e}"));
        let router = service
            .router()
            .cloned()
            .unwrap_or_else(|| panic!("stub {name} service has no router"));
        Self(router)
    }

    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        match self.0.clone().oneshot(req).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    pub async fn deserialize_response<T: DeserializeOwned>(response: Response<Body>) -> T {
        let body = response
            .into_body()
            .collect()
            .await
            .unwrap_or_else(|e| panic!("could not read the response body: {e}"))
            .to_bytes();
        serde_json::from_slice(&body).unwrap_or_else(|e| {
            panic!(
                "unexpected response body {:?}: {e}",
                String::from_utf8_lossy(&body)
            )
        })
    }
}
