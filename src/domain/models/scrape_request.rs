// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 抓取方式
///
/// `static` 只获取原始 HTML；`dynamic` 驱动无头浏览器执行页面脚本后再提取
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMethod {
    /// 静态 HTML 抓取
    #[default]
    #[serde(alias = "cheerio")]
    Static,
    /// 动态渲染抓取
    #[serde(alias = "playwright")]
    Dynamic,
}

impl ScrapeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeMethod::Static => "static",
            ScrapeMethod::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for ScrapeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// LinkedIn 页面类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkedInTarget {
    /// 个人资料页
    #[default]
    Profile,
    /// 公司主页
    Company,
}

fn default_true() -> bool {
    true
}

/// 抓取请求
///
/// 由调用方独占持有；URL 在任何网络 I/O 之前完成规范化与校验
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    /// 目标URL，裸域名会自动补全协议
    pub url: String,
    /// 抓取方式
    #[serde(default, alias = "method")]
    pub strategy: ScrapeMethod,
    /// 是否检查 robots.txt
    #[serde(default = "default_true", alias = "checkRobots")]
    pub check_policy: bool,
    /// 自定义提取选择器
    #[serde(default)]
    pub selectors: Vec<String>,
    /// 等待出现的元素（仅动态抓取）
    #[serde(default)]
    pub wait_for_selector: Option<String>,
    /// 是否提取公司字段
    #[serde(default)]
    pub company_fields: bool,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            strategy: ScrapeMethod::Static,
            check_policy: true,
            selectors: Vec::new(),
            wait_for_selector: None,
            company_fields: false,
        }
    }

    pub fn with_strategy(mut self, strategy: ScrapeMethod) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_policy_check(mut self, enabled: bool) -> Self {
        self.check_policy = enabled;
        self
    }

    pub fn with_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    pub fn wait_for(mut self, selector: impl Into<String>) -> Self {
        self.wait_for_selector = Some(selector.into());
        self
    }

    pub fn with_company_fields(mut self) -> Self {
        self.company_fields = true;
        self
    }
}
