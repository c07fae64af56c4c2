//! HTTP-level tests for `/api/v1/carousels` that do not need a database:
//! dry-run validation and rejection of invalid bodies before persistence.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use common::{
    body_json, build_test_app, get, post_json, send, MockGenerator, FLAMENGO_COMPLETION,
};

fn app() -> axum::Router {
    build_test_app(MockGenerator::from_completion(FLAMENGO_COMPLETION))
}

fn manual_body() -> serde_json::Value {
    json!({
        "title": "Times da Série A",
        "layout": "poster",
        "carouselType": "manual",
        "domain": "team",
        "sortType": "alphabetical",
        "contentLimit": 20,
        "planType": "all",
        "status": true,
        "showMoreButton": false,
        "selectedContent": ["fla", "t1"]
    })
}

fn fields(json: &serde_json::Value, key: &str) -> Vec<String> {
    json[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// POST /carousels/validate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_accepts_a_complete_manual_config() {
    let response = post_json(app(), "/api/v1/carousels/validate", manual_body()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], true);
    assert!(json["data"]["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn validate_flags_manual_without_selection() {
    let mut body = manual_body();
    body["selectedContent"] = json!([]);

    let response = post_json(app(), "/api/v1/carousels/validate", body).await;
    let json = body_json(response).await;

    assert_eq!(json["data"]["valid"], false);
    assert_eq!(fields(&json["data"], "errors"), vec!["selectedContent"]);
}

#[tokio::test]
async fn validate_flags_zero_content_limit() {
    let mut body = manual_body();
    body["contentLimit"] = json!(0);

    let response = post_json(app(), "/api/v1/carousels/validate", body).await;
    let json = body_json(response).await;

    assert_eq!(json["data"]["valid"], false);
    let errors = json["data"]["errors"].as_array().unwrap();
    assert_eq!(errors[0]["field"], "contentLimit");
    assert_eq!(errors[0]["rule_type"], "min_value");
}

#[tokio::test]
async fn validate_reports_unknown_enum_values_per_field() {
    let mut body = manual_body();
    body["layout"] = json!("carousel-3d");
    body["planType"] = json!("gold");

    let response = post_json(app(), "/api/v1/carousels/validate", body).await;
    let json = body_json(response).await;

    let mut reported = fields(&json["data"], "errors");
    reported.sort();
    assert_eq!(reported, vec!["layout", "planType"]);
}

// ---------------------------------------------------------------------------
// POST /carousels
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_rejects_invalid_body_with_details() {
    let body = json!({ "title": "", "contentLimit": 0 });

    let response = post_json(app(), "/api/v1/carousels", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let reported = fields(&json, "details");
    assert!(reported.contains(&"contentLimit".to_string()));
    assert!(reported.contains(&"layout".to_string()));
}

#[tokio::test]
async fn create_rejects_selection_on_automatic_carousel() {
    let mut body = manual_body();
    body["carouselType"] = json!("automatic");

    let response = post_json(app(), "/api/v1/carousels", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(fields(&body_json(response).await, "details"), vec!["selectedContent"]);
}

#[tokio::test]
async fn create_rejects_malformed_json_in_error_envelope() {
    let request = Request::post("/api/v1/carousels")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = send(app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn database_failure_is_sanitized() {
    let response = get(app(), "/api/v1/carousels/1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
