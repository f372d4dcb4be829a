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

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::scrape_result::ScrapeErrorKind;
use crate::engines::launch::LaunchProfile;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非 2xx 响应
    #[error("Request failed with status code {0}")]
    HttpStatus(u16),
    /// 超时
    #[error("{0}")]
    Timeout(String),
    /// 浏览器启动或导航失败
    #[error("Browser error: {0}")]
    Browser(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 将 reqwest 超时转换为带时长的超时错误
    pub fn from_reqwest(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            EngineError::Timeout(format!("timeout of {}ms exceeded", timeout_ms))
        } else {
            EngineError::RequestFailed(error)
        }
    }

    /// 对外的错误分类
    pub fn kind(&self) -> ScrapeErrorKind {
        match self {
            EngineError::Browser(_) => ScrapeErrorKind::RenderFailure,
            _ => ScrapeErrorKind::TransportFailure,
        }
    }
}

/// 一次浏览器会话
///
/// 对应一个独立的无头浏览器进程；由 [`crate::engines::playwright_engine::DynamicRenderer`]
/// 在每个退出路径上调用 `close` 恰好一次。超时由调用方控制。
#[async_trait]
pub trait BrowserSession: Send {
    /// 打开页面并导航，直到网络空闲
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError>;
    /// 等待元素出现
    async fn wait_for_selector(&mut self, selector: &str) -> Result<(), EngineError>;
    /// 渲染后的 HTML
    async fn content(&mut self) -> Result<String, EngineError>;
    /// 页面标题
    async fn title(&mut self) -> Result<Option<String>, EngineError>;
    /// 整页 PNG 截图
    async fn screenshot(&mut self) -> Result<Vec<u8>, EngineError>;
    /// 关闭浏览器进程
    async fn close(&mut self) -> Result<(), EngineError>;
}

/// 浏览器启动器
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, profile: &LaunchProfile) -> Result<Box<dyn BrowserSession>, EngineError>;

    /// 启动器名称
    fn name(&self) -> &'static str;
}
