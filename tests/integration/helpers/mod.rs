// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use leadscout::application::use_cases::scrape_use_case::ScrapeOrchestrator;
use leadscout::config::settings::{BrowserSettings, ScraperSettings};
use leadscout::engines::launch::LaunchProfile;
use leadscout::engines::playwright_engine::DynamicRenderer;
use leadscout::engines::reqwest_engine::StaticScraper;
use leadscout::engines::traits::{BrowserLauncher, BrowserSession, EngineError};
use leadscout::utils::robots::{RobotsChecker, RobotsCheckerTrait};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 假浏览器的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Behavior {
    Succeed,
    FailNavigation,
    HangNavigation,
}

/// 记录启动、关闭次数和访问过的地址
#[derive(Clone, Default)]
pub struct Probe {
    launches: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    navigations: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl Probe {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

pub struct FakeLauncher {
    pub probe: Probe,
    pub behavior: Behavior,
    pub html: String,
}

struct FakeSession {
    probe: Probe,
    behavior: Behavior,
    html: String,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self, _profile: &LaunchProfile) -> Result<Box<dyn BrowserSession>, EngineError> {
        self.probe.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            probe: self.probe.clone(),
            behavior: self.behavior,
            html: self.html.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.probe.navigations.lock().unwrap().push(url.to_string());
        match self.behavior {
            Behavior::FailNavigation => Err(EngineError::Browser(
                "Navigation failed: net::ERR_CONNECTION_RESET".to_string(),
            )),
            Behavior::HangNavigation => std::future::pending().await,
            Behavior::Succeed => Ok(()),
        }
    }

    async fn wait_for_selector(&mut self, _selector: &str) -> Result<(), EngineError> {
        Ok(())
    }

    async fn content(&mut self) -> Result<String, EngineError> {
        Ok(self.html.clone())
    }

    async fn title(&mut self) -> Result<Option<String>, EngineError> {
        Ok(Some("Rendered Title".to_string()))
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, EngineError> {
        Ok(Vec::new())
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 统计调用次数的 robots.txt 检查器，始终允许
#[derive(Default)]
pub struct CountingRobots {
    pub calls: AtomicUsize,
}

#[async_trait]
impl RobotsCheckerTrait for CountingRobots {
    async fn is_allowed(&self, _url_str: &str, _user_agent: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        true
    }
}

pub struct TestOrchestrator {
    pub orchestrator: Arc<ScrapeOrchestrator>,
    pub probe: Probe,
}

/// 使用真实的 robots.txt 检查器和静态抓取器，浏览器为假实现
pub fn orchestrator_with(
    behavior: Behavior,
    html: &str,
    scraper_settings: ScraperSettings,
) -> TestOrchestrator {
    orchestrator_with_robots(
        Arc::new(RobotsChecker::new(&scraper_settings)),
        behavior,
        html,
        scraper_settings,
    )
}

pub fn orchestrator_with_robots(
    robots: Arc<dyn RobotsCheckerTrait>,
    behavior: Behavior,
    html: &str,
    scraper_settings: ScraperSettings,
) -> TestOrchestrator {
    let probe = Probe::default();
    let launcher = FakeLauncher {
        probe: probe.clone(),
        behavior,
        html: html.to_string(),
    };
    let renderer = DynamicRenderer::with_launcher(
        Arc::new(launcher),
        LaunchProfile::local(None),
        &BrowserSettings::default(),
    );
    let orchestrator = ScrapeOrchestrator::with_components(
        robots,
        StaticScraper::new(&scraper_settings),
        renderer,
        &scraper_settings,
    );

    TestOrchestrator {
        orchestrator: Arc::new(orchestrator),
        probe,
    }
}

pub fn orchestrator(html: &str) -> TestOrchestrator {
    orchestrator_with(Behavior::Succeed, html, ScraperSettings::default())
}

pub async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(html),
        )
        .mount(server)
        .await;
}

pub const ABOUT_PAGE: &str = r#"
<html>
    <head>
        <title>Acme Widgets</title>
        <meta name="description" content="We build widgets.">
    </head>
    <body>
        <h1>About us</h1>
        <a href="https://www.linkedin.com/company/acme">LinkedIn</a>
        <a href="https://twitter.com/acme">Twitter</a>
        <a href="https://www.facebook.com/acme">Facebook</a>
    </body>
</html>
"#;
