// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_result::ScrapeErrorKind;
use crate::engines::traits::EngineError;
use thiserror::Error;

/// robots.txt 拦截时返回给调用方的消息
pub const POLICY_BLOCKED_MESSAGE: &str = "Scraping this URL is disallowed by robots.txt";

/// 抓取错误类型
///
/// 在最底层捕获，由编排器转换为 `success = false` 的结果，不会继续向上抛出
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// 输入无效（URL 缺失或格式错误、选择器无法解析）
    #[error("{0}")]
    InvalidInput(String),

    /// 被 robots.txt 禁止
    #[error("{}", POLICY_BLOCKED_MESSAGE)]
    PolicyBlocked,

    /// 引擎错误（网络、超时、浏览器）
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// 字段提取失败
    #[error("Failed to extract data: {0}")]
    Extraction(String),
}

impl ScrapeError {
    /// 错误分类
    pub fn kind(&self) -> ScrapeErrorKind {
        match self {
            ScrapeError::InvalidInput(_) => ScrapeErrorKind::InvalidInput,
            ScrapeError::PolicyBlocked => ScrapeErrorKind::PolicyBlocked,
            ScrapeError::Engine(e) => e.kind(),
            ScrapeError::Extraction(_) => ScrapeErrorKind::ExtractionFailure,
        }
    }
}
