// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 桌面浏览器 User-Agent
///
/// 部分站点会根据请求头过滤爬虫，返回空页面或降级内容
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_STATIC_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_ROBOTS_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_SELECTOR_WAIT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_NETWORK_IDLE_MS: u64 = 500;

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取配置
    pub scraper: ScraperSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// robots.txt 规则匹配模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RobotsMode {
    /// 仅支持字面前缀匹配的 Disallow 规则
    #[default]
    Literal,
    /// 完整的 robots.txt 语义（通配符、`$`、Allow）
    Strict,
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// 静态抓取超时时间（毫秒）
    pub static_timeout_ms: u64,
    /// robots.txt 抓取超时时间（毫秒）
    pub robots_timeout_ms: u64,
    /// 静态抓取使用的 User-Agent
    pub user_agent: String,
    /// robots.txt 规则匹配时使用的 User-Agent 标识
    pub robots_user_agent: String,
    /// robots.txt 匹配模式
    pub robots_mode: RobotsMode,
    /// 单次请求的整体截止时间（毫秒），未设置时只使用各阶段的超时
    pub request_deadline_ms: Option<u64>,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            static_timeout_ms: DEFAULT_STATIC_TIMEOUT_MS,
            robots_timeout_ms: DEFAULT_ROBOTS_TIMEOUT_MS,
            user_agent: DESKTOP_USER_AGENT.to_string(),
            robots_user_agent: "*".to_string(),
            robots_mode: RobotsMode::Literal,
            request_deadline_ms: None,
        }
    }
}

/// 浏览器运行环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BrowserRuntime {
    /// 启动时探测
    #[default]
    Auto,
    /// 本地系统 Chromium
    Local,
    /// 受限运行时（无服务器环境等）
    Constrained,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 页面导航超时时间（毫秒）
    pub navigation_timeout_ms: u64,
    /// 等待指定元素的超时时间（毫秒）
    pub selector_wait_timeout_ms: u64,
    /// 判定网络空闲所需的静默时长（毫秒）
    pub network_idle_ms: u64,
    /// Chromium 可执行文件路径（可选）
    pub executable_path: Option<String>,
    /// 运行环境
    pub runtime: BrowserRuntime,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            selector_wait_timeout_ms: DEFAULT_SELECTOR_WAIT_TIMEOUT_MS,
            network_idle_ms: DEFAULT_NETWORK_IDLE_MS,
            executable_path: None,
            runtime: BrowserRuntime::Auto,
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `LEADSCOUT__*` 环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("scraper.static_timeout_ms", DEFAULT_STATIC_TIMEOUT_MS)?
            .set_default("scraper.robots_timeout_ms", DEFAULT_ROBOTS_TIMEOUT_MS)?
            .set_default("scraper.user_agent", DESKTOP_USER_AGENT)?
            .set_default("scraper.robots_user_agent", "*")?
            .set_default("scraper.robots_mode", "literal")?
            .set_default("browser.navigation_timeout_ms", DEFAULT_NAVIGATION_TIMEOUT_MS)?
            .set_default(
                "browser.selector_wait_timeout_ms",
                DEFAULT_SELECTOR_WAIT_TIMEOUT_MS,
            )?
            .set_default("browser.network_idle_ms", DEFAULT_NETWORK_IDLE_MS)?
            .set_default("browser.runtime", "auto")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("LEADSCOUT").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
