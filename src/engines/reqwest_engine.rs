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

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use scraper::Html;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::settings::ScraperSettings;
use crate::domain::extraction::{
    extract_company_fields, extract_linkedin_company, extract_linkedin_profile, extract_selectors,
};
use crate::domain::models::company::{CompanyFields, LinkedInProfileFields, SelectorMatch};
use crate::domain::models::page::StaticPage;
use crate::domain::models::scrape_request::ScrapeMethod;
use crate::domain::models::scrape_result::ScrapeResult;
use crate::engines::traits::EngineError;
use crate::utils::errors::ScrapeError;
use crate::utils::url_utils::normalize_url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// 静态抓取器
///
/// 基于reqwest的单次 GET 抓取，解析 HTML 后按选择器级联提取字段。
/// 失败不重试，每次请求使用独立的客户端。
#[derive(Debug, Clone)]
pub struct StaticScraper {
    user_agent: String,
    timeout: Duration,
}

impl Default for StaticScraper {
    fn default() -> Self {
        Self::new(&ScraperSettings::default())
    }
}

impl StaticScraper {
    pub fn new(settings: &ScraperSettings) -> Self {
        Self {
            user_agent: settings.user_agent.clone(),
            timeout: Duration::from_millis(settings.static_timeout_ms),
        }
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers
    }

    /// 执行一次 GET 请求
    ///
    /// Accept-Encoding 由 reqwest 按启用的解压特性自动设置
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<StaticPage, EngineError> {
        let timeout_ms = timeout.as_millis() as u64;
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .default_headers(Self::default_headers())
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        let start = Instant::now();
        debug!(url, timeout_ms, "Static fetch started");

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| EngineError::from_reqwest(e, timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "Static fetch rejected");
            return Err(EngineError::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("text/html")
            .to_string();

        let html = response
            .text()
            .await
            .map_err(|e| EngineError::from_reqwest(e, timeout_ms))?;

        debug!(
            url,
            status = status.as_u16(),
            bytes = html.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Static fetch finished"
        );

        Ok(StaticPage {
            html,
            status_code: status.as_u16(),
            content_type,
            final_url,
        })
    }

    /// 抓取并返回原始页面
    pub async fn scrape(&self, url: &str, timeout: Option<Duration>) -> ScrapeResult<StaticPage> {
        let timeout = timeout.unwrap_or(self.timeout);
        self.fetch_and_extract(url, timeout, |_| Ok(())).await.map(|(page, _)| page)
    }

    /// 抓取公司官网并提取描述、社交链接和标题
    pub async fn scrape_company_website(&self, url: &str) -> ScrapeResult<CompanyFields> {
        self.extract(url, |document| Ok(extract_company_fields(document)))
            .await
    }

    /// 静态抓取 LinkedIn 公司主页，多数情况下只能拿到外壳
    pub async fn scrape_linkedin_company(&self, url: &str) -> ScrapeResult<CompanyFields> {
        self.extract(url, |document| Ok(extract_linkedin_company(document)))
            .await
    }

    /// 静态抓取 LinkedIn 个人资料
    pub async fn scrape_linkedin_profile(&self, url: &str) -> ScrapeResult<LinkedInProfileFields> {
        self.extract(url, |document| Ok(extract_linkedin_profile(document)))
            .await
    }

    /// 按选择器提取文本、内部 HTML 和匹配数
    pub async fn extract_text(
        &self,
        url: &str,
        selectors: &[String],
    ) -> ScrapeResult<BTreeMap<String, SelectorMatch>> {
        self.extract(url, |document| extract_selectors(document, selectors))
            .await
    }

    async fn extract<T, F>(&self, url: &str, extractor: F) -> ScrapeResult<T>
    where
        F: FnOnce(&Html) -> Result<T, ScrapeError> + Send,
        T: Send,
    {
        self.fetch_and_extract(url, self.timeout, extractor)
            .await
            .map(|(_, data)| data)
    }

    /// 所有静态抓取的公共路径：规范化、请求、解析、提取
    ///
    /// 错误在这里转为 `success = false` 的结果
    async fn fetch_and_extract<T, F>(
        &self,
        url: &str,
        timeout: Duration,
        extractor: F,
    ) -> ScrapeResult<(StaticPage, T)>
    where
        F: FnOnce(&Html) -> Result<T, ScrapeError> + Send,
        T: Send,
    {
        let target = match normalize_url(url) {
            Ok(target) => target.to_string(),
            Err(e) => return ScrapeResult::from_error(url, ScrapeMethod::Static, &e),
        };

        let page = match self.fetch(&target, timeout).await {
            Ok(page) => page,
            Err(e) => {
                return ScrapeResult::from_error(target, ScrapeMethod::Static, &ScrapeError::from(e))
            }
        };

        let extracted = {
            let document = page.document();
            extractor(&document)
        };

        match extracted {
            Ok(data) => ScrapeResult::success(target, ScrapeMethod::Static, (page, data)),
            Err(e) => ScrapeResult::from_error(target, ScrapeMethod::Static, &e),
        }
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
