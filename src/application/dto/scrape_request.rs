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

use serde::{Deserialize, Serialize};

use crate::domain::models::scrape_request::{LinkedInTarget, ScrapeMethod, ScrapeRequest};

/// 公司官网抓取请求
///
/// `method` 接受 `static`/`dynamic` 以及 `cheerio`/`playwright`
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyScrapeRequestDto {
    /// 目标URL
    pub url: Option<String>,
    /// 抓取方式，默认静态
    pub method: Option<ScrapeMethod>,
    /// 是否检查 robots.txt，默认检查
    pub check_robots: Option<bool>,
}

impl CompanyScrapeRequestDto {
    pub fn into_request(self) -> ScrapeRequest {
        ScrapeRequest::new(self.url.unwrap_or_default())
            .with_strategy(self.method.unwrap_or(ScrapeMethod::Static))
            .with_policy_check(self.check_robots.unwrap_or(true))
            .with_company_fields()
    }
}

/// 通用抓取请求
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericScrapeRequestDto {
    pub url: Option<String>,
    /// 自定义选择器
    #[serde(default)]
    pub selectors: Vec<String>,
    pub method: Option<ScrapeMethod>,
    pub check_robots: Option<bool>,
    /// 等待出现的元素，仅动态抓取
    pub wait_for_selector: Option<String>,
}

impl GenericScrapeRequestDto {
    pub fn into_request(self) -> ScrapeRequest {
        let mut request = ScrapeRequest::new(self.url.unwrap_or_default())
            .with_strategy(self.method.unwrap_or(ScrapeMethod::Static))
            .with_policy_check(self.check_robots.unwrap_or(true))
            .with_selectors(self.selectors);
        request.wait_for_selector = self.wait_for_selector;
        request
    }
}

/// LinkedIn 抓取请求
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInScrapeRequestDto {
    pub url: Option<String>,
    /// `profile` 或 `company`，默认 `profile`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// 抓取方式，默认动态
    pub method: Option<ScrapeMethod>,
}

impl LinkedInScrapeRequestDto {
    /// 解析页面类型，未知类型返回 `None`
    pub fn target(&self) -> Option<LinkedInTarget> {
        match self.kind.as_deref().map(str::trim) {
            None | Some("") | Some("profile") => Some(LinkedInTarget::Profile),
            Some("company") => Some(LinkedInTarget::Company),
            Some(_) => None,
        }
    }

    pub fn method(&self) -> ScrapeMethod {
        self.method.unwrap_or(ScrapeMethod::Dynamic)
    }
}
