// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{
    mount_page, mount_robots, orchestrator, orchestrator_with, orchestrator_with_robots, Behavior,
    CountingRobots, ABOUT_PAGE,
};
use leadscout::config::settings::ScraperSettings;
use leadscout::domain::models::scrape_request::{LinkedInTarget, ScrapeMethod, ScrapeRequest};
use leadscout::domain::models::scrape_result::ScrapeErrorKind;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_robots_block_skips_extraction() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /\n").await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ABOUT_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let test = orchestrator(ABOUT_PAGE);
    let request = ScrapeRequest::new(format!("{}/", server.uri())).with_company_fields();
    let result = test.orchestrator.orchestrate(&request).await;

    assert!(!result.success);
    assert!(result.blocked_by_policy);
    assert_eq!(result.error_kind, Some(ScrapeErrorKind::PolicyBlocked));
    assert!(result.data.is_none());
    assert_eq!(result.method, ScrapeMethod::Static);
}

#[tokio::test]
async fn test_malformed_url_never_touches_network() {
    let robots = Arc::new(CountingRobots::default());
    let test = orchestrator_with_robots(
        robots.clone(),
        Behavior::Succeed,
        "",
        ScraperSettings::default(),
    );

    for raw in ["not a url", "", "http://"] {
        let request = ScrapeRequest::new(raw).with_strategy(ScrapeMethod::Dynamic);
        let result = test.orchestrator.orchestrate(&request).await;

        assert!(!result.success, "{raw:?} should be rejected");
        assert_eq!(result.error_kind, Some(ScrapeErrorKind::InvalidInput));
        assert!(!result.blocked_by_policy);
    }

    assert_eq!(robots.calls.load(Ordering::SeqCst), 0);
    assert_eq!(test.probe.launches(), 0);
}

#[tokio::test]
async fn test_static_company_scrape_end_to_end() {
    let server = MockServer::start().await;
    mount_page(&server, "/about", ABOUT_PAGE).await;

    let test = orchestrator("");
    let request = ScrapeRequest::new(format!("{}/about", server.uri()))
        .with_strategy(ScrapeMethod::Static)
        .with_company_fields();
    let result = test.orchestrator.orchestrate(&request).await;

    assert!(result.success, "unexpected error: {:?}", result.error);
    assert_eq!(result.method, ScrapeMethod::Static);
    let data = result.data.unwrap();
    assert_eq!(data["description"], "We build widgets.");

    let links = data["socialLinks"].as_object().unwrap();
    assert_eq!(links.len(), 3);
    assert_eq!(links["linkedin"], "https://www.linkedin.com/company/acme");
    assert_eq!(links["twitter"], "https://twitter.com/acme");
    assert_eq!(links["facebook"], "https://www.facebook.com/acme");
}

#[tokio::test]
async fn test_unreachable_robots_is_fail_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_page(&server, "/about", ABOUT_PAGE).await;

    let test = orchestrator("");
    let request = ScrapeRequest::new(format!("{}/about", server.uri())).with_company_fields();
    let result = test.orchestrator.orchestrate(&request).await;

    assert!(result.success);
}

#[tokio::test]
async fn test_policy_check_can_be_disabled() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /\n").await;
    mount_page(&server, "/page", "<html><body><h1>Hi there</h1></body></html>").await;

    let test = orchestrator("");
    let request = ScrapeRequest::new(format!("{}/page", server.uri()))
        .with_policy_check(false)
        .with_selectors(["h1"]);
    let result = test.orchestrator.orchestrate(&request).await;

    assert!(result.success);
    assert_eq!(result.data.unwrap()["h1"]["text"], "Hi there");
}

#[tokio::test]
async fn test_static_transport_failure_preserves_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let test = orchestrator("");
    let result = test
        .orchestrator
        .orchestrate(&ScrapeRequest::new(format!("{}/gone", server.uri())))
        .await;

    assert!(!result.success);
    assert!(!result.blocked_by_policy);
    assert_eq!(result.error_kind, Some(ScrapeErrorKind::TransportFailure));
    assert_eq!(
        result.error.as_deref(),
        Some("Request failed with status code 404")
    );
}

#[tokio::test]
async fn test_dynamic_company_fields_are_merged() {
    let server = MockServer::start().await;
    let rendered = r#"<html><head><title>Acme Widgets</title>
        <meta name="description" content="Acme builds widgets for every industry."></head>
        <body><h1>Rendered by script</h1><a href="https://x.com/acme">X</a></body></html>"#;

    let test = orchestrator(rendered);
    let request = ScrapeRequest::new(format!("{}/app", server.uri()))
        .with_strategy(ScrapeMethod::Dynamic)
        .with_company_fields()
        .with_selectors(["h1"]);
    let result = test.orchestrator.orchestrate(&request).await;

    assert!(result.success, "unexpected error: {:?}", result.error);
    assert_eq!(result.method, ScrapeMethod::Dynamic);
    let data = result.data.unwrap();
    assert_eq!(data["title"], "Rendered Title");
    assert!(data["html"].as_str().unwrap().contains("Rendered by script"));
    assert_eq!(data["description"], "Acme builds widgets for every industry.");
    assert_eq!(data["about"], "Acme Widgets");
    assert_eq!(data["socialLinks"]["twitter"], "https://x.com/acme");
    assert_eq!(data["selectors"]["h1"]["count"], 1);

    assert_eq!(test.probe.launches(), 1);
    assert_eq!(test.probe.closes(), 1);
}

#[tokio::test]
async fn test_dynamic_navigation_failure_closes_browser() {
    let server = MockServer::start().await;
    let test = orchestrator_with(Behavior::FailNavigation, "", ScraperSettings::default());

    let request = ScrapeRequest::new(format!("{}/app", server.uri())).with_strategy(ScrapeMethod::Dynamic);
    let result = test.orchestrator.orchestrate(&request).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ScrapeErrorKind::RenderFailure));
    assert!(result.error.unwrap().contains("ERR_CONNECTION_RESET"));
    assert_eq!(test.probe.closes(), 1);
}

#[tokio::test]
async fn test_request_deadline_bounds_whole_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let settings = ScraperSettings {
        request_deadline_ms: Some(100),
        ..Default::default()
    };
    let test = orchestrator_with(Behavior::Succeed, "", settings);
    let request = ScrapeRequest::new(format!("{}/slow", server.uri())).with_policy_check(false);
    let result = test.orchestrator.orchestrate(&request).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ScrapeErrorKind::TransportFailure));
    assert_eq!(
        result.error.as_deref(),
        Some("Request deadline of 100ms exceeded")
    );
}

#[tokio::test]
async fn test_request_deadline_closes_hung_browser() {
    let settings = ScraperSettings {
        request_deadline_ms: Some(50),
        ..Default::default()
    };
    let test = orchestrator_with(Behavior::HangNavigation, "", settings);
    let request = ScrapeRequest::new("https://example.com/app")
        .with_strategy(ScrapeMethod::Dynamic)
        .with_policy_check(false);

    let result = test.orchestrator.orchestrate(&request).await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ScrapeErrorKind::TransportFailure));
    assert_eq!(
        result.error.as_deref(),
        Some("Request deadline of 50ms exceeded")
    );
    assert_eq!(test.probe.launches(), 1);
    assert_eq!(test.probe.closes(), 1);
}

#[tokio::test]
async fn test_request_deadline_closes_hung_linkedin_render() {
    let settings = ScraperSettings {
        request_deadline_ms: Some(50),
        ..Default::default()
    };
    let test = orchestrator_with(Behavior::HangNavigation, "", settings);

    let result = test
        .orchestrator
        .linkedin(
            "https://www.linkedin.com/company/acme",
            LinkedInTarget::Company,
            ScrapeMethod::Dynamic,
        )
        .await;

    assert_eq!(
        result.error.as_deref(),
        Some("Request deadline of 50ms exceeded")
    );
    assert_eq!(test.probe.closes(), 1);
}

#[tokio::test]
async fn test_linkedin_rejects_other_hosts() {
    let robots = Arc::new(CountingRobots::default());
    let test = orchestrator_with_robots(robots.clone(), Behavior::Succeed, "", ScraperSettings::default());

    let result = test
        .orchestrator
        .linkedin(
            "https://notlinkedin.com/company/acme",
            LinkedInTarget::Company,
            ScrapeMethod::Dynamic,
        )
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ScrapeErrorKind::InvalidInput));
    assert_eq!(result.error.as_deref(), Some("URL must be a LinkedIn URL"));
    assert_eq!(test.probe.launches(), 0);
    assert_eq!(robots.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_linkedin_company_renders_without_policy_check() {
    let robots = Arc::new(CountingRobots::default());
    let rendered = r#"<html><body>
        <div class="org-top-card"><h1 class="org-top-card-summary__title">Acme Corp</h1></div>
        <dd class="org-page-details__definition-text">Industrial Machinery</dd>
    </body></html>"#;
    let test = orchestrator_with_robots(robots.clone(), Behavior::Succeed, rendered, ScraperSettings::default());

    let result = test
        .orchestrator
        .linkedin(
            "www.linkedin.com/company/acme",
            LinkedInTarget::Company,
            ScrapeMethod::Dynamic,
        )
        .await;

    assert!(result.success, "unexpected error: {:?}", result.error);
    assert_eq!(result.url, "https://www.linkedin.com/company/acme");
    let data = result.data.unwrap();
    assert_eq!(data["name"], "Acme Corp");
    assert_eq!(data["industry"], "Industrial Machinery");
    assert_eq!(robots.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        test.probe.navigations(),
        vec!["https://www.linkedin.com/company/acme".to_string()]
    );
}

#[tokio::test]
async fn test_linkedin_profile_dynamic_includes_fields() {
    let rendered = r#"<html><head><meta property="og:title" content="Jane Doe - Head of Sales | LinkedIn"></head>
        <body><h1>Jane Doe</h1><div class="text-body-medium headline">Head of Sales at Acme</div></body></html>"#;
    let test = orchestrator(rendered);

    let result = test
        .orchestrator
        .linkedin(
            "https://www.linkedin.com/in/jane",
            LinkedInTarget::Profile,
            ScrapeMethod::Dynamic,
        )
        .await;

    assert!(result.success);
    let data = result.data.unwrap();
    assert_eq!(data["name"], "Jane Doe");
    assert_eq!(data["title"], "Rendered Title");
    assert!(data["html"].as_str().unwrap().contains("Head of Sales at Acme"));
}
