// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use metrics::counter;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::{
    config::settings::{ScraperSettings, Settings},
    domain::{
        extraction::{extract_company_fields, extract_linkedin_profile, extract_selectors},
        models::{
            page::RenderedPage,
            scrape_request::{LinkedInTarget, ScrapeMethod, ScrapeRequest},
            scrape_result::{ScrapeErrorKind, ScrapeResult},
        },
    },
    engines::{
        deadline::RequestDeadline, playwright_engine::DynamicRenderer,
        reqwest_engine::StaticScraper,
    },
    utils::{
        errors::ScrapeError,
        robots::{RobotsChecker, RobotsCheckerTrait},
        url_utils::{host_matches, normalize_url},
    },
};

/// 动态渲染 LinkedIn 个人资料时等待的元素
const LINKEDIN_PROFILE_READY_SELECTOR: &str = "h1";

/// 抓取编排器
///
/// 线性流程：规范化 URL、robots.txt 检查、按策略分派、合并结果。
/// 任何失败都转为 `success = false` 的结果，不会向调用方抛出。
pub struct ScrapeOrchestrator {
    robots: Arc<dyn RobotsCheckerTrait>,
    static_scraper: StaticScraper,
    renderer: DynamicRenderer,
    robots_user_agent: String,
    deadline: Option<Duration>,
}

impl ScrapeOrchestrator {
    pub fn new(settings: &Settings) -> Self {
        Self::with_components(
            Arc::new(RobotsChecker::new(&settings.scraper)),
            StaticScraper::new(&settings.scraper),
            DynamicRenderer::new(settings),
            &settings.scraper,
        )
    }

    pub fn with_components(
        robots: Arc<dyn RobotsCheckerTrait>,
        static_scraper: StaticScraper,
        renderer: DynamicRenderer,
        settings: &ScraperSettings,
    ) -> Self {
        Self {
            robots,
            static_scraper,
            renderer,
            robots_user_agent: settings.robots_user_agent.clone(),
            deadline: settings.request_deadline_ms.map(Duration::from_millis),
        }
    }

    pub fn renderer(&self) -> &DynamicRenderer {
        &self.renderer
    }

    /// robots.txt 检查，UA 默认为配置的 `robots_user_agent`
    pub async fn check_policy(&self, url: &str, user_agent: Option<&str>) -> bool {
        let user_agent = user_agent.unwrap_or(&self.robots_user_agent);
        self.robots.is_allowed(url, user_agent).await
    }

    /// 执行一次抓取请求
    pub async fn orchestrate(&self, request: &ScrapeRequest) -> ScrapeResult {
        let deadline = self.deadline.map(RequestDeadline::after);
        let result = self.execute(request, deadline).await;
        record_outcome(&result);
        result
    }

    /// LinkedIn 个人资料或公司主页
    ///
    /// 只接受 linkedin.com 及其子域名，不做 robots.txt 检查
    pub async fn linkedin(&self, url: &str, target: LinkedInTarget, method: ScrapeMethod) -> ScrapeResult {
        let deadline = self.deadline.map(RequestDeadline::after);
        let result = self.execute_linkedin(url, target, method, deadline).await;
        record_outcome(&result);
        result
    }

    async fn execute(&self, request: &ScrapeRequest, deadline: Option<RequestDeadline>) -> ScrapeResult {
        let method = request.strategy;
        let target = match normalize_url(&request.url) {
            Ok(url) => url.to_string(),
            Err(e) => return ScrapeResult::from_error(request.url.as_str(), method, &e),
        };

        if request.check_policy {
            let allowed = match bounded(deadline, self.check_policy(&target, None)).await {
                Ok(allowed) => allowed,
                Err(e) => return ScrapeResult::from_error(target, method, &e),
            };
            if !allowed {
                info!(url = %target, "Scrape blocked by robots.txt");
                return ScrapeResult::blocked(target, method);
            }
        }

        debug!(url = %target, %method, "Dispatching scrape");
        match method {
            ScrapeMethod::Static => {
                bounded(deadline, self.run_static(&target, request))
                    .await
                    .unwrap_or_else(|e| ScrapeResult::from_error(target.as_str(), method, &e))
            }
            ScrapeMethod::Dynamic => self.run_dynamic(&target, request, deadline).await,
        }
    }

    async fn run_static(&self, target: &str, request: &ScrapeRequest) -> ScrapeResult {
        if request.company_fields {
            self.static_scraper
                .scrape_company_website(target)
                .await
                .into_json()
        } else if !request.selectors.is_empty() {
            self.static_scraper
                .extract_text(target, &request.selectors)
                .await
                .into_json()
        } else {
            self.static_scraper.scrape(target, None).await.into_json()
        }
    }

    /// 渲染后的 HTML 交给静态提取逻辑，渲染结果的字段在冲突时优先
    async fn run_dynamic(
        &self,
        target: &str,
        request: &ScrapeRequest,
        deadline: Option<RequestDeadline>,
    ) -> ScrapeResult {
        let rendered = self
            .renderer
            .scrape_within(target, request.wait_for_selector.as_deref(), deadline)
            .await;
        enrich_rendered(rendered, |page, payload| {
            let document = page.document();
            if request.company_fields {
                merge_missing(payload, to_json(&extract_company_fields(&document))?);
            }
            if !request.selectors.is_empty() {
                let selectors = extract_selectors(&document, &request.selectors)?;
                merge_missing(payload, Value::Object(Map::from_iter([(
                    "selectors".to_string(),
                    to_json(&selectors)?,
                )])));
            }
            Ok(())
        })
    }

    async fn execute_linkedin(
        &self,
        url: &str,
        target: LinkedInTarget,
        method: ScrapeMethod,
        deadline: Option<RequestDeadline>,
    ) -> ScrapeResult {
        let normalized = match normalize_url(url) {
            Ok(normalized) => normalized,
            Err(e) => return ScrapeResult::from_error(url, method, &e),
        };
        let is_linkedin = normalized
            .host_str()
            .is_some_and(|host| host_matches(host, "linkedin.com"));
        if !is_linkedin {
            return ScrapeResult::failure(
                normalized.as_str(),
                method,
                ScrapeErrorKind::InvalidInput,
                "URL must be a LinkedIn URL",
            );
        }
        let normalized = normalized.to_string();

        match (method, target) {
            (ScrapeMethod::Dynamic, LinkedInTarget::Company) => self
                .renderer
                .scrape_linkedin_company_within(&normalized, deadline)
                .await
                .into_json(),
            (ScrapeMethod::Dynamic, LinkedInTarget::Profile) => {
                let rendered = self
                    .renderer
                    .scrape_within(&normalized, Some(LINKEDIN_PROFILE_READY_SELECTOR), deadline)
                    .await;
                enrich_rendered(rendered, |page, payload| {
                    merge_missing(payload, to_json(&extract_linkedin_profile(&page.document()))?);
                    Ok(())
                })
            }
            (ScrapeMethod::Static, LinkedInTarget::Company) => {
                let scraped = self.static_scraper.scrape_linkedin_company(&normalized);
                bounded(deadline, scraped)
                    .await
                    .map(ScrapeResult::into_json)
                    .unwrap_or_else(|e| ScrapeResult::from_error(normalized.as_str(), method, &e))
            }
            (ScrapeMethod::Static, LinkedInTarget::Profile) => {
                let scraped = self.static_scraper.scrape_linkedin_profile(&normalized);
                bounded(deadline, scraped)
                    .await
                    .map(ScrapeResult::into_json)
                    .unwrap_or_else(|e| ScrapeResult::from_error(normalized.as_str(), method, &e))
            }
        }
    }
}

/// 在截止时间内执行不持有浏览器会话的阶段
async fn bounded<F: Future>(
    deadline: Option<RequestDeadline>,
    work: F,
) -> Result<F::Output, ScrapeError> {
    match deadline {
        Some(deadline) => deadline.run(work).await.map_err(ScrapeError::from),
        None => Ok(work.await),
    }
}

/// 把渲染结果转为 JSON 并合并额外字段
fn enrich_rendered<F>(rendered: ScrapeResult<RenderedPage>, enrich: F) -> ScrapeResult
where
    F: FnOnce(&RenderedPage, &mut Map<String, Value>) -> Result<(), ScrapeError>,
{
    let Some(page) = rendered.data.as_ref() else {
        return rendered.into_json();
    };

    let mut payload = Map::new();
    payload.insert("html".to_string(), Value::String(page.html.clone()));
    payload.insert(
        "title".to_string(),
        page.title.clone().map(Value::String).unwrap_or(Value::Null),
    );

    match enrich(page, &mut payload) {
        Ok(()) => rendered.map(|_| Value::Object(payload)),
        Err(e) => ScrapeResult::from_error(rendered.url, rendered.method, &e),
    }
}

/// 只插入 `payload` 中不存在的键
fn merge_missing(payload: &mut Map<String, Value>, extra: Value) {
    if let Value::Object(extra) = extra {
        for (key, value) in extra {
            payload.entry(key).or_insert(value);
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, ScrapeError> {
    serde_json::to_value(value).map_err(|e| ScrapeError::Extraction(e.to_string()))
}

fn record_outcome(result: &ScrapeResult) {
    let outcome = if result.success {
        "success"
    } else {
        match result.error_kind {
            Some(ScrapeErrorKind::InvalidInput) => "invalid_input",
            Some(ScrapeErrorKind::PolicyBlocked) => "blocked",
            Some(ScrapeErrorKind::TransportFailure) => "transport_failure",
            Some(ScrapeErrorKind::RenderFailure) => "render_failure",
            Some(ScrapeErrorKind::ExtractionFailure) | None => "extraction_failure",
        }
    };
    counter!(
        "scrape_requests_total",
        "method" => result.method.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}
