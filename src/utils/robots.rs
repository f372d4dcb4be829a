// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::settings::{RobotsMode, ScraperSettings};
use crate::utils::url_utils::robots_url;

/// Robots.txt检查器接口
#[async_trait]
pub trait RobotsCheckerTrait: Send + Sync {
    /// 检查URL是否被允许访问
    ///
    /// 永不失败：任何网络或解析问题都视为允许
    async fn is_allowed(&self, url_str: &str, user_agent: &str) -> bool;
}

/// 解析后的 robots.txt 策略
///
/// 只支持字面前缀匹配的 Disallow 规则，不展开 `*` 与 `$`，
/// 是对完整规范的保守近似。每次检查都重新构建，不做缓存。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    /// 站点 origin
    origin: String,
    /// User-Agent（小写）到禁止路径前缀的映射
    disallowed: HashMap<String, Vec<String>>,
}

impl RobotsPolicy {
    /// 逐行解析 robots.txt
    ///
    /// 连续的 `User-agent` 行组成同一个规则组；`Disallow` 归入当前组的所有 UA
    pub fn parse(origin: impl Into<String>, content: &str) -> Self {
        let mut disallowed: HashMap<String, Vec<String>> = HashMap::new();
        let mut current_agents: Vec<String> = Vec::new();
        let mut in_rules = false;

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    if in_rules {
                        current_agents.clear();
                        in_rules = false;
                    }
                    current_agents.push(value.to_ascii_lowercase());
                }
                "disallow" => {
                    in_rules = true;
                    // An empty Disallow allows everything.
                    if value.is_empty() {
                        continue;
                    }
                    for agent in &current_agents {
                        disallowed
                            .entry(agent.clone())
                            .or_default()
                            .push(value.to_string());
                    }
                }
                "allow" | "crawl-delay" => {
                    in_rules = true;
                }
                _ => {}
            }
        }

        Self {
            origin: origin.into(),
            disallowed,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// 适用于指定 UA 的禁止前缀（`*` 组加上名称相同的组）
    pub fn disallowed_for<'a>(&'a self, user_agent: &str) -> impl Iterator<Item = &'a str> + 'a {
        let agent = user_agent.trim().to_ascii_lowercase();
        let wildcard = self.disallowed.get("*").into_iter().flatten();
        let specific = if agent == "*" {
            None
        } else {
            self.disallowed.get(&agent)
        };
        wildcard
            .chain(specific.into_iter().flatten())
            .map(String::as_str)
    }

    /// 路径是否被允许
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        !self
            .disallowed_for(user_agent)
            .any(|rule| rule == "/" || path.starts_with(rule))
    }
}

/// Robots.txt检查器
#[derive(Clone)]
pub struct RobotsChecker {
    /// 抓取超时时间
    timeout: Duration,
    /// 匹配模式
    mode: RobotsMode,
    /// 抓取 robots.txt 时发送的 User-Agent
    fetch_user_agent: String,
}

impl Default for RobotsChecker {
    fn default() -> Self {
        Self::new(&ScraperSettings::default())
    }
}

#[async_trait]
impl RobotsCheckerTrait for RobotsChecker {
    async fn is_allowed(&self, url_str: &str, user_agent: &str) -> bool {
        let allowed = self.check(url_str, user_agent).await;
        counter!(
            "robots_checks_total",
            "decision" => if allowed { "allowed" } else { "disallowed" }
        )
        .increment(1);
        allowed
    }
}

impl RobotsChecker {
    /// 创建新的Robots检查器实例
    pub fn new(settings: &ScraperSettings) -> Self {
        Self {
            timeout: Duration::from_millis(settings.robots_timeout_ms),
            mode: settings.robots_mode,
            fetch_user_agent: settings.user_agent.clone(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_mode(mut self, mode: RobotsMode) -> Self {
        self.mode = mode;
        self
    }

    /// 检查是否允许抓取，UA 默认为 `*`
    pub async fn check_policy(&self, url_str: &str, user_agent: Option<&str>) -> bool {
        RobotsCheckerTrait::is_allowed(self, url_str, user_agent.unwrap_or("*")).await
    }

    async fn check(&self, url_str: &str, user_agent: &str) -> bool {
        let Ok(url) = Url::parse(url_str) else {
            warn!("Cannot parse {} for robots.txt check, assuming allowed", url_str);
            return true;
        };
        let Some(robots_url) = robots_url(&url) else {
            return true;
        };
        let Some(content) = self.fetch_robots(&robots_url).await else {
            return true;
        };

        let allowed = match self.mode {
            RobotsMode::Literal => {
                let origin = url.origin().ascii_serialization();
                RobotsPolicy::parse(origin, &content).is_allowed(url.path(), user_agent)
            }
            RobotsMode::Strict => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(&content, user_agent, url.as_str())
            }
        };

        debug!(url = %url, user_agent, allowed, "robots.txt evaluated");
        allowed
    }

    /// 获取 robots.txt 内容，失败（网络错误、非 2xx、超时）时返回 `None`
    async fn fetch_robots(&self, robots_url: &str) -> Option<String> {
        let client = match Client::builder()
            .user_agent(self.fetch_user_agent.as_str())
            .timeout(self.timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to build robots.txt client: {}", e);
                return None;
            }
        };

        match client.get(robots_url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Failed to read robots.txt from {}: {}", robots_url, e);
                    None
                }
            },
            Ok(resp) => {
                debug!(
                    "robots.txt at {} returned {}, assuming allowed",
                    robots_url,
                    resp.status()
                );
                None
            }
            Err(e) => {
                warn!(
                    "Failed to fetch robots.txt from {}: {}, assuming allowed",
                    robots_url, e
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "robots_test.rs"]
mod tests;
