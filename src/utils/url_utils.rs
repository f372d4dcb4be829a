// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::ScrapeError;
use url::Url;

/// 规范化目标 URL
///
/// 裸域名会补上 `https://`，结果必须是带主机名的 http(s) 绝对地址
pub fn normalize_url(raw: &str) -> Result<Url, ScrapeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScrapeError::InvalidInput("URL is required".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ScrapeError::InvalidInput(format!("Invalid URL format: {}", e)))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ScrapeError::InvalidInput(
            "Invalid URL format: missing host".to_string(),
        )),
    }
}

/// 计算 URL 对应的 robots.txt 地址（origin + `/robots.txt`）
pub fn robots_url(url: &Url) -> Option<String> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!("{}/robots.txt", origin.ascii_serialization()))
}

/// 主机名是否等于 `domain` 或为其子域名
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}
