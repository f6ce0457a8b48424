//! Request shapes produced by the low-level client.

use crate::common::constants::*;
use crate::common::*;

use std::time::Duration;

use reqwest::StatusCode;
use revuecrafters::api::RegisterUserRequest;
use revuecrafters::{ApiError, Client, HttpClientConfig, RevueDto};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn bearer_client(uri: &str) -> Client {
    Client::with_token(uri, TEST_TOKEN, &HttpClientConfig::default())
        .expect("Failed to create client")
}

#[tokio::test]
async fn test_authenticate_posts_credentials() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/User/Authentication"))
        .and(body_json(json!({
            "email": TEST_EMAIL,
            "password": TEST_PASSWORD
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_token_response(TEST_TOKEN)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&server.uri(), &HttpClientConfig::default()).unwrap();
    let response = client
        .authenticate(TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("Request failed");

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(TEST_TOKEN));
}

#[tokio::test]
async fn test_register_user_body() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/User/Create"))
        .and(body_json(json!({
            "userName": TEST_USERNAME,
            "email": TEST_EMAIL,
            "password": TEST_PASSWORD,
            "rePassword": TEST_PASSWORD,
            "acceptedAgreement": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&server.uri(), &HttpClientConfig::default()).unwrap();
    let request = RegisterUserRequest {
        user_name: TEST_USERNAME,
        email: TEST_EMAIL,
        password: TEST_PASSWORD,
        re_password: TEST_PASSWORD,
        accepted_agreement: true,
    };
    let response = client.register_user(&request).await.unwrap();
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_revue_sends_bearer_and_body() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/Revue/Create"))
        .and(header("Authorization", BEARER))
        .and(body_json(json!({
            "title": "T",
            "url": "",
            "description": "D"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mock_message_response("Successfully created!")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server.uri());
    let response = client
        .create_revue(&RevueDto::new("T", "", "D"))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message().as_deref(), Some("Successfully created!"));
}

#[tokio::test]
async fn test_list_revues_returns_raw_body() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/Revue/All"))
        .and(header("Authorization", BEARER))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([mock_revue("revueId", REVUE_ID_1, "one")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server.uri());
    let response = client.list_revues().await.unwrap();

    let value: serde_json::Value = response.json().unwrap();
    assert_eq!(value[0]["revueId"], REVUE_ID_1);
}

#[tokio::test]
async fn test_edit_revue_passes_id_as_query() {
    let server = setup_mock_server().await;

    Mock::given(method("PUT"))
        .and(path("/api/Revue/Edit"))
        .and(query_param("revueId", REVUE_ID_1))
        .and(header("Authorization", BEARER))
        .and(body_json(json!({
            "title": "Edited",
            "url": "http://example.com",
            "description": "d"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(mock_message_response("Edited successfully")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server.uri());
    let response = client
        .edit_revue(REVUE_ID_1, &RevueDto::new("Edited", "http://example.com", "d"))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_revue_encodes_query() {
    let server = setup_mock_server().await;

    Mock::given(method("DELETE"))
        .and(path("/api/Revue/Delete"))
        .and(query_param("revueId", "id with spaces&more"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(mock_message_response("There is no such revue!")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server.uri());
    let response = client.delete_revue("id with spaces&more").await.unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message().as_deref(), Some("There is no such revue!"));
}

#[tokio::test]
async fn test_error_status_is_not_an_error() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/Revue/Create"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = bearer_client(&server.uri());
    let response = client.create_revue(&RevueDto::default()).await.unwrap();

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "boom");
    assert_eq!(response.message(), None);
}

#[tokio::test]
async fn test_configured_timeout_aborts_slow_request() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/Revue/All"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = HttpClientConfig::resolve(Some("1".to_string())).unwrap();
    let client = Client::with_token(&server.uri(), TEST_TOKEN, &config).unwrap();

    match client.list_revues().await {
        Err(ApiError::Request(err)) => assert!(err.is_timeout(), "not a timeout: {}", err),
        other => panic!("expected a timeout, got {:?}", other),
    }
}
