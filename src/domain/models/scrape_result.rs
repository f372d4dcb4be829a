// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::models::scrape_request::ScrapeMethod;
use crate::utils::errors::ScrapeError;

/// 失败结果的错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrapeErrorKind {
    /// URL 缺失或格式错误，未发生任何网络请求
    InvalidInput,
    /// robots.txt 明确禁止
    PolicyBlocked,
    /// DNS、超时、非 2xx、连接错误
    TransportFailure,
    /// 无头浏览器启动或导航失败
    RenderFailure,
    /// 提取阶段的意外失败
    ExtractionFailure,
}

/// 抓取结果
///
/// 无论哪种失败，调用方都收到统一的
/// `{success, data|error, method, scrapedAt, url}` 结构。
/// `success` 为真时只有 `data` 有意义，为假时只有 `error` 有意义。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult<T = Value> {
    /// 是否成功
    pub success: bool,
    /// 提取到的数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// 错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 错误分类
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ScrapeErrorKind>,
    /// 是否被 robots.txt 拦截
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub blocked_by_policy: bool,
    /// 目标URL
    pub url: String,
    /// 抓取时间
    pub scraped_at: DateTime<Utc>,
    /// 实际使用的抓取方式
    pub method: ScrapeMethod,
}

impl<T> ScrapeResult<T> {
    pub fn success(url: impl Into<String>, method: ScrapeMethod, data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            blocked_by_policy: false,
            url: url.into(),
            scraped_at: Utc::now(),
            method,
        }
    }

    pub fn failure(
        url: impl Into<String>,
        method: ScrapeMethod,
        kind: ScrapeErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: Some(kind),
            blocked_by_policy: kind == ScrapeErrorKind::PolicyBlocked,
            url: url.into(),
            scraped_at: Utc::now(),
            method,
        }
    }

    pub fn from_error(url: impl Into<String>, method: ScrapeMethod, error: &ScrapeError) -> Self {
        Self::failure(url, method, error.kind(), error.to_string())
    }

    /// robots.txt 拦截结果
    pub fn blocked(url: impl Into<String>, method: ScrapeMethod) -> Self {
        Self::from_error(url, method, &ScrapeError::PolicyBlocked)
    }

    pub fn is_blocked_by_policy(&self) -> bool {
        self.blocked_by_policy
    }

    /// 转换数据部分，保留其余字段
    pub fn map<U, F>(self, f: F) -> ScrapeResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ScrapeResult {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            error_kind: self.error_kind,
            blocked_by_policy: self.blocked_by_policy,
            url: self.url,
            scraped_at: self.scraped_at,
            method: self.method,
        }
    }
}

impl<T: Serialize> ScrapeResult<T> {
    /// 擦除数据类型，便于合并与输出
    pub fn into_json(self) -> ScrapeResult<Value> {
        let converted = self.data.as_ref().map(serde_json::to_value).transpose();
        match converted {
            Ok(Some(value)) => self.map(|_| value),
            Ok(None) => self.map(|_| Value::Null),
            Err(e) => ScrapeResult::failure(
                self.url,
                self.method,
                ScrapeErrorKind::ExtractionFailure,
                format!("Failed to serialize extracted data: {}", e),
            ),
        }
    }
}
