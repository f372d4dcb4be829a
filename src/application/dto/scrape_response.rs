// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::models::scrape_request::{LinkedInTarget, ScrapeMethod};
use crate::domain::models::scrape_result::ScrapeResult;

/// 抓取成功的响应
#[derive(Debug, Deserialize, Serialize)]
pub struct ScrapeResponseDto {
    /// 请求处理是否成功
    pub success: bool,
    /// 提取到的数据
    pub data: Value,
    /// LinkedIn 抓取附带的使用提示
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub meta: ScrapeMetaDto,
}

/// 响应元数据
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeMetaDto {
    pub url: String,
    pub method: ScrapeMethod,
    pub scraped_at: DateTime<Utc>,
    /// 是否执行了 robots.txt 检查
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots_compliance: Option<bool>,
    /// 使用的自定义选择器数量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selectors_used: Option<usize>,
    /// LinkedIn 页面类型
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<LinkedInTarget>,
}

impl ScrapeResponseDto {
    /// 从成功的抓取结果构建响应
    pub fn from_result(result: ScrapeResult) -> Self {
        Self {
            success: true,
            meta: ScrapeMetaDto {
                url: result.url,
                method: result.method,
                scraped_at: result.scraped_at,
                robots_compliance: None,
                selectors_used: None,
                kind: None,
            },
            data: result.data.unwrap_or(Value::Null),
            warning: None,
        }
    }

    pub fn with_robots_compliance(mut self, checked: bool) -> Self {
        self.meta.robots_compliance = Some(checked);
        self
    }

    pub fn with_selectors_used(mut self, count: usize) -> Self {
        self.meta.selectors_used = Some(count);
        self
    }

    pub fn with_linkedin_target(mut self, target: LinkedInTarget, warning: &str) -> Self {
        self.meta.kind = Some(target);
        self.warning = Some(warning.to_string());
        self
    }
}

/// 失败响应
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponseDto {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// 被 robots.txt 拦截时为 `false`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots_compliance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ErrorResponseDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            url: None,
            robots_compliance: None,
            warning: None,
        }
    }
}
