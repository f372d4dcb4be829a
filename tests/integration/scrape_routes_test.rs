// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{mount_page, mount_robots, orchestrator, TestOrchestrator, ABOUT_PAGE};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use leadscout::presentation::routes;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn post_json(test: &TestOrchestrator, uri: &str, payload: Value) -> (StatusCode, Value) {
    let app = routes::routes(test.orchestrator.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_company_requires_url() {
    let test = orchestrator("");

    let (status, body) = post_json(&test, "/v1/scrape/company", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "URL is required");
    assert_eq!(test.probe.launches(), 0);
}

#[tokio::test]
async fn test_company_rejects_malformed_url() {
    let test = orchestrator("");

    let (status, body) = post_json(&test, "/v1/scrape/company", json!({"url": "http://"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid URL format"));
    assert!(body.get("url").is_none());
}

#[tokio::test]
async fn test_company_blocked_by_robots() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private\n").await;

    let test = orchestrator("");
    let (status, body) = post_json(
        &test,
        "/v1/scrape/company",
        json!({"url": format!("{}/private/team", server.uri())}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["robotsCompliance"], false);
    assert!(body["error"].as_str().unwrap().contains("robots.txt"));
}

#[tokio::test]
async fn test_company_upstream_error_is_500_with_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let test = orchestrator("");
    let url = format!("{}/broken", server.uri());
    let (status, body) = post_json(&test, "/v1/scrape/company", json!({"url": url})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Request failed with status code 500");
    assert_eq!(body["url"], url);
}

#[tokio::test]
async fn test_company_success_envelope() {
    let server = MockServer::start().await;
    mount_page(&server, "/about", ABOUT_PAGE).await;

    let test = orchestrator("");
    let url = format!("{}/about", server.uri());
    let (status, body) = post_json(&test, "/v1/scrape/company", json!({"url": url})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["description"], "We build widgets.");
    assert_eq!(body["meta"]["url"], url);
    assert_eq!(body["meta"]["method"], "static");
    assert_eq!(body["meta"]["robotsCompliance"], true);
    assert!(body["meta"]["scrapedAt"].is_string());
}

#[tokio::test]
async fn test_generic_reports_selectors_used() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/pricing",
        r#"<html><body><h1>Pricing</h1><span class="price">$10</span><span class="price">$20</span></body></html>"#,
    )
    .await;

    let test = orchestrator("");
    let (status, body) = post_json(
        &test,
        "/v1/scrape/generic",
        json!({
            "url": format!("{}/pricing", server.uri()),
            "selectors": ["h1", ".price"],
            "checkRobots": false
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["h1"]["text"], "Pricing");
    assert_eq!(body["data"][".price"]["count"], 2);
    assert_eq!(body["meta"]["selectorsUsed"], 2);
    assert_eq!(body["meta"]["robotsCompliance"], false);
}

#[tokio::test]
async fn test_generic_dynamic_uses_browser() {
    let test = orchestrator("<html><body><p>from the browser</p></body></html>");

    let (status, body) = post_json(
        &test,
        "/v1/scrape/generic",
        json!({"url": "https://example.com", "method": "dynamic", "checkRobots": false}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["method"], "dynamic");
    assert_eq!(body["data"]["title"], "Rendered Title");
    assert_eq!(test.probe.launches(), 1);
    assert_eq!(test.probe.closes(), 1);
}

#[tokio::test]
async fn test_linkedin_rejects_unknown_type() {
    let test = orchestrator("");

    let (status, body) = post_json(
        &test,
        "/v1/scrape/linkedin",
        json!({"url": "https://www.linkedin.com/in/jane", "type": "group"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], r#"Type must be "profile" or "company""#);
    assert_eq!(test.probe.launches(), 0);
}

#[tokio::test]
async fn test_linkedin_rejects_other_hosts() {
    let test = orchestrator("");

    let (status, body) = post_json(
        &test,
        "/v1/scrape/linkedin",
        json!({"url": "https://example.com/in/jane", "type": "profile"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "URL must be a LinkedIn URL");
    assert!(body["warning"].is_string());
}

#[tokio::test]
async fn test_linkedin_company_success_carries_warning() {
    let test = orchestrator(
        r#"<html><body><div class="org-top-card"><h1>Acme Corp</h1></div></body></html>"#,
    );

    let (status, body) = post_json(
        &test,
        "/v1/scrape/linkedin",
        json!({"url": "https://www.linkedin.com/company/acme", "type": "company"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Acme Corp");
    assert_eq!(body["meta"]["type"], "company");
    assert_eq!(body["meta"]["method"], "dynamic");
    assert!(body["warning"].as_str().unwrap().contains("LinkedIn"));
}
