//! HTTP-level tests for `GET /api/v1/content/search`.

mod common;

use axum::http::StatusCode;

use common::{body_json, build_test_app, get, MockGenerator, FLAMENGO_COMPLETION};

fn app() -> axum::Router {
    build_test_app(MockGenerator::from_completion(FLAMENGO_COMPLETION))
}

#[tokio::test]
async fn search_is_case_insensitive_and_typed() {
    let response = get(app(), "/api/v1/content/search?domain=player&q=gabriel").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|item| item["type"] == "player"));
}

#[tokio::test]
async fn search_returns_at_most_ten_results() {
    let response = get(app(), "/api/v1/content/search?domain=team&q=time").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn blank_term_returns_empty_list() {
    let response = get(app(), "/api/v1/content/search?domain=team&q=%20").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_domain_is_a_bad_request() {
    let response = get(app(), "/api/v1/content/search?domain=stadium&q=mar").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unregistered_domain_is_reported() {
    let response = get(app(), "/api/v1/content/search?domain=news&q=final").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "UNSUPPORTED_DOMAIN");
}
