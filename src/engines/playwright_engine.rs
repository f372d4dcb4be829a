// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::settings::{BrowserSettings, Settings};
use crate::domain::extraction::extract_linkedin_company;
use crate::domain::models::company::CompanyFields;
use crate::domain::models::page::{RenderedPage, Screenshot};
use crate::domain::models::scrape_request::ScrapeMethod;
use crate::domain::models::scrape_result::ScrapeResult;
use crate::engines::deadline::RequestDeadline;
use crate::engines::launch::LaunchProfile;
use crate::engines::traits::{BrowserLauncher, BrowserSession, EngineError};
use crate::utils::errors::ScrapeError;
use crate::utils::url_utils::normalize_url;

/// LinkedIn 公司主页渲染完成的标志元素
pub const LINKEDIN_COMPANY_READY_SELECTOR: &str = r#"[class*="org-top-card"]"#;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

static PROFILE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn browser_error(error: impl std::fmt::Display) -> EngineError {
    EngineError::Browser(error.to_string())
}

/// 基于chromiumoxide的浏览器启动器
///
/// 每次调用启动一个独立的无头 Chromium 进程，使用独立的临时用户目录
pub struct ChromiumLauncher {
    user_agent: String,
    request_timeout: Duration,
    network_idle: Duration,
}

impl ChromiumLauncher {
    pub fn new(settings: &Settings) -> Self {
        Self {
            user_agent: settings.scraper.user_agent.clone(),
            request_timeout: Duration::from_millis(settings.browser.navigation_timeout_ms),
            network_idle: Duration::from_millis(settings.browser.network_idle_ms),
        }
    }

    fn profile_dir() -> PathBuf {
        std::env::temp_dir().join(format!(
            "leadscout-chromium-{}-{}",
            std::process::id(),
            PROFILE_COUNTER.fetch_add(1, Ordering::Relaxed)
        ))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, profile: &LaunchProfile) -> Result<Box<dyn BrowserSession>, EngineError> {
        let profile_dir = Self::profile_dir();

        let mut builder = BrowserConfig::builder()
            .request_timeout(self.request_timeout)
            .user_data_dir(&profile_dir)
            .args(profile.args().iter().map(String::as_str));
        if let Some(executable) = profile.executable() {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(EngineError::Browser)?;

        let (browser, mut handler) = match Browser::launch(config).await {
            Ok(launched) => launched,
            Err(e) => {
                remove_profile_dir(&profile_dir);
                return Err(browser_error(format!("Failed to launch browser: {}", e)));
            }
        };

        // Drive CDP events until the connection drops.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!(profile = profile.name(), dir = %profile_dir.display(), "Browser launched");

        Ok(Box::new(ChromiumSession {
            browser,
            page: None,
            handler_task,
            profile_dir,
            user_agent: self.user_agent.clone(),
            network_idle: self.network_idle,
            closed: false,
        }))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

#[derive(Debug, Deserialize)]
struct LoadState {
    ready: String,
    resources: u64,
}

const LOAD_STATE_SCRIPT: &str =
    "({ ready: document.readyState, resources: performance.getEntriesByType('resource').length })";

/// 单个 Chromium 进程上的会话
pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    profile_dir: PathBuf,
    user_agent: String,
    network_idle: Duration,
    closed: bool,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, EngineError> {
        self.page
            .as_ref()
            .ok_or_else(|| EngineError::Browser("No page is open".to_string()))
    }

    /// 文档加载完成且资源数量在 `network_idle` 内不再变化
    async fn wait_for_network_idle(&self) -> Result<(), EngineError> {
        let page = self.page()?;
        let mut last_resources = None;
        let mut stable_since = Instant::now();

        loop {
            let state: LoadState = page
                .evaluate(LOAD_STATE_SCRIPT)
                .await
                .map_err(browser_error)?
                .into_value()
                .map_err(browser_error)?;

            if state.ready == "complete" && last_resources == Some(state.resources) {
                if stable_since.elapsed() >= self.network_idle {
                    return Ok(());
                }
            } else {
                last_resources = Some(state.resources);
                stable_since = Instant::now();
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(browser_error)?;
        self.page = Some(page);

        let page = self.page()?;
        page.set_user_agent(self.user_agent.as_str())
            .await
            .map_err(browser_error)?;
        page.goto(url)
            .await
            .map_err(|e| browser_error(format!("Navigation to {} failed: {}", url, e)))?;

        self.wait_for_network_idle().await
    }

    async fn wait_for_selector(&mut self, selector: &str) -> Result<(), EngineError> {
        let page = self.page()?;
        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn content(&mut self) -> Result<String, EngineError> {
        self.page()?.content().await.map_err(browser_error)
    }

    async fn title(&mut self) -> Result<Option<String>, EngineError> {
        self.page()?.get_title().await.map_err(browser_error)
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, EngineError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.page()?.screenshot(params).await.map_err(browser_error)
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close page: {}", e);
            }
        }

        let result = self.browser.close().await.map(|_| ()).map_err(browser_error);
        if let Err(e) = self.browser.wait().await {
            debug!("Failed to wait for browser exit: {}", e);
        }
        self.handler_task.abort();
        remove_profile_dir(&self.profile_dir);
        result
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if !self.closed {
            self.handler_task.abort();
            remove_profile_dir(&self.profile_dir);
        }
    }
}

fn remove_profile_dir(dir: &std::path::Path) {
    if let Err(e) = std::fs::remove_dir_all(dir) {
        if e.kind() != std::io::ErrorKind::NotFound {
            debug!(dir = %dir.display(), "Failed to remove browser profile dir: {}", e);
        }
    }
}

enum Capture {
    Content,
    Screenshot,
}

enum Captured {
    Content(RenderedPage),
    Screenshot(Vec<u8>),
}

/// 动态渲染器
///
/// 每次调用都通过 [`BrowserLauncher`] 获取一个新的浏览器会话，
/// 在所有退出路径上关闭它，不在调用之间复用进程。
pub struct DynamicRenderer {
    launcher: Arc<dyn BrowserLauncher>,
    profile: LaunchProfile,
    navigation_timeout: Duration,
    selector_wait_timeout: Duration,
}

impl DynamicRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self::with_launcher(
            Arc::new(ChromiumLauncher::new(settings)),
            LaunchProfile::resolve(&settings.browser),
            &settings.browser,
        )
    }

    pub fn with_launcher(
        launcher: Arc<dyn BrowserLauncher>,
        profile: LaunchProfile,
        settings: &BrowserSettings,
    ) -> Self {
        Self {
            launcher,
            profile,
            navigation_timeout: Duration::from_millis(settings.navigation_timeout_ms),
            selector_wait_timeout: Duration::from_millis(settings.selector_wait_timeout_ms),
        }
    }

    pub fn profile(&self) -> &LaunchProfile {
        &self.profile
    }

    /// 渲染页面，返回 HTML 和标题
    pub async fn render(
        &self,
        url: &str,
        wait_for_selector: Option<&str>,
        deadline: Option<RequestDeadline>,
    ) -> Result<RenderedPage, EngineError> {
        match self.run(url, wait_for_selector, Capture::Content, deadline).await? {
            Captured::Content(page) => Ok(page),
            Captured::Screenshot(_) => Err(EngineError::Other("Unexpected screenshot capture".to_string())),
        }
    }

    /// 渲染页面并包装为抓取结果
    pub async fn scrape(&self, url: &str, wait_for_selector: Option<&str>) -> ScrapeResult<RenderedPage> {
        self.scrape_within(url, wait_for_selector, None).await
    }

    /// 同 [`scrape`](Self::scrape)，但受请求截止时间约束
    pub async fn scrape_within(
        &self,
        url: &str,
        wait_for_selector: Option<&str>,
        deadline: Option<RequestDeadline>,
    ) -> ScrapeResult<RenderedPage> {
        let target = match normalize_url(url) {
            Ok(target) => target.to_string(),
            Err(e) => return ScrapeResult::from_error(url, ScrapeMethod::Dynamic, &e),
        };

        match self.render(&target, wait_for_selector, deadline).await {
            Ok(page) => ScrapeResult::success(target, ScrapeMethod::Dynamic, page),
            Err(e) => ScrapeResult::from_error(target, ScrapeMethod::Dynamic, &ScrapeError::from(e)),
        }
    }

    /// 渲染 LinkedIn 公司主页并提取字段
    pub async fn scrape_linkedin_company(&self, url: &str) -> ScrapeResult<CompanyFields> {
        self.scrape_linkedin_company_within(url, None).await
    }

    pub async fn scrape_linkedin_company_within(
        &self,
        url: &str,
        deadline: Option<RequestDeadline>,
    ) -> ScrapeResult<CompanyFields> {
        self.scrape_within(url, Some(LINKEDIN_COMPANY_READY_SELECTOR), deadline)
            .await
            .map(|page| extract_linkedin_company(&page.document()))
    }

    /// 整页截图，base64 编码的 PNG
    pub async fn screenshot(&self, url: &str) -> ScrapeResult<Screenshot> {
        let target = match normalize_url(url) {
            Ok(target) => target.to_string(),
            Err(e) => return ScrapeResult::from_error(url, ScrapeMethod::Dynamic, &e),
        };

        match self.run(&target, None, Capture::Screenshot, None).await {
            Ok(Captured::Screenshot(bytes)) => ScrapeResult::success(
                target,
                ScrapeMethod::Dynamic,
                Screenshot {
                    data: BASE64.encode(bytes),
                    format: "png".to_string(),
                },
            ),
            Ok(Captured::Content(_)) => ScrapeResult::from_error(
                target,
                ScrapeMethod::Dynamic,
                &ScrapeError::from(EngineError::Other("Unexpected content capture".to_string())),
            ),
            Err(e) => ScrapeResult::from_error(target, ScrapeMethod::Dynamic, &ScrapeError::from(e)),
        }
    }

    /// 获取会话、执行、关闭
    ///
    /// 会话只在这里获取，`close` 在成功和失败路径上都恰好调用一次。
    /// 截止时间只约束 `drive`，到期后仍会等待 `close` 完成。
    async fn run(
        &self,
        url: &str,
        wait_for_selector: Option<&str>,
        capture: Capture,
        deadline: Option<RequestDeadline>,
    ) -> Result<Captured, EngineError> {
        let mut session = self.launcher.launch(&self.profile).await?;
        let started = Instant::now();

        let driven = self.drive(session.as_mut(), url, wait_for_selector, capture);
        let outcome = match deadline {
            Some(deadline) => deadline.run(driven).await.and_then(|captured| captured),
            None => driven.await,
        };

        if let Err(e) = session.close().await {
            warn!(launcher = self.launcher.name(), "Failed to close browser: {}", e);
        }

        debug!(
            url,
            success = outcome.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dynamic render finished"
        );
        outcome
    }

    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        wait_for_selector: Option<&str>,
        capture: Capture,
    ) -> Result<Captured, EngineError> {
        match tokio::time::timeout(self.navigation_timeout, session.navigate(url)).await {
            Ok(navigated) => navigated?,
            Err(_) => {
                return Err(EngineError::Timeout(format!(
                    "Navigation timeout of {}ms exceeded",
                    self.navigation_timeout.as_millis()
                )))
            }
        }

        if let Some(selector) = wait_for_selector {
            match tokio::time::timeout(self.selector_wait_timeout, session.wait_for_selector(selector)).await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!(selector, "Selector wait failed, continuing: {}", e),
                Err(_) => debug!(selector, "Selector wait timed out, continuing"),
            }
        }

        match capture {
            Capture::Content => {
                let html = session.content().await?;
                let title = session.title().await?;
                Ok(Captured::Content(RenderedPage { html, title }))
            }
            Capture::Screenshot => Ok(Captured::Screenshot(session.screenshot().await?)),
        }
    }
}

#[cfg(test)]
#[path = "playwright_engine_test.rs"]
mod tests;
