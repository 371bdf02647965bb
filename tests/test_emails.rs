use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use enrol::{
    config::{EmailsConfig, ServiceConfig},
    service::{ErrorMessage, Message},
    state::SharedState,
    Service, StubService,
};
use serde_json::json;

async fn setup(config: EmailsConfig) -> StubService {
    StubService::new(Service::emails_from_config(config), SharedState::stub()).await
}

fn send_request(api_key: Option<&str>, email: &str, code: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/emails/send")
        .header(CONTENT_TYPE, "application/json");
    if let Some(api_key) = api_key {
        builder = builder.header("x-api-key", api_key);
    }
    builder
        .body(Body::from(json!({"email": email, "code": code}).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_send_email() {
    let app = setup(EmailsConfig::stub()).await;

    let response = app
        .request(send_request(Some("api_key"), "test@gmail.com", "0420"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Message = StubService::deserialize_response(response).await;
    assert_eq!(body.message, "Email sent successfully");
}

#[tokio::test]
async fn test_send_email_with_wrong_api_key() {
    let app = setup(EmailsConfig::stub().with_api_key("secret")).await;

    let response = app
        .request(send_request(Some("api_key"), "test@gmail.com", "0420"))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let error: ErrorMessage = StubService::deserialize_response(response).await;
    assert_eq!(error.message, "Forbidden, you can't send email");
}

#[tokio::test]
async fn test_send_email_without_api_key() {
    let app = setup(EmailsConfig::stub()).await;

    let response = app
        .request(send_request(None, "test@gmail.com", "0420"))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_api_key_is_checked_before_the_body() {
    let app = setup(EmailsConfig::stub().with_api_key("secret")).await;

    let response = app
        .request(send_request(Some("api_key"), "not-an-email", "12"))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_send_email_with_invalid_code() {
    let app = setup(EmailsConfig::stub()).await;

    let response = app
        .request(send_request(Some("api_key"), "test@gmail.com", "04200"))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorMessage = StubService::deserialize_response(response).await;
    assert_eq!(
        error.errors.unwrap()["code"],
        vec!["Activation code must be exactly 4 digits"]
    );
}

#[tokio::test]
async fn test_send_email_with_invalid_email() {
    let app = setup(EmailsConfig::stub()).await;

    let response = app
        .request(send_request(Some("api_key"), "testgmail.com", "0420"))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorMessage = StubService::deserialize_response(response).await;
    assert_eq!(
        error.errors.unwrap()["email"],
        vec!["value is not a valid email address"]
    );
}

#[tokio::test]
async fn test_send_email_when_smtp_is_down() {
    let app = setup(EmailsConfig::stub().with_smtp("127.0.0.1", 1)).await;

    let response = app
        .request(send_request(Some("api_key"), "test@gmail.com", "0420"))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorMessage = StubService::deserialize_response(response).await;
    assert!(error.message.starts_with("Failed to send email: "));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup(EmailsConfig::stub()).await;

    let response = app
        .request(
            Request::builder()
                .uri("/emails/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let document: serde_json::Value = StubService::deserialize_response(response).await;
    assert!(document["paths"]["/api/v1/emails/send"].is_object());
}
