// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{Html, Selector};
use std::collections::BTreeMap;

use super::cascade::joined_text;
use crate::domain::models::company::SelectorMatch;
use crate::utils::errors::ScrapeError;

/// 按调用方给出的选择器提取文本
///
/// 未命中的选择器返回 `count = 0` 的空结果；无法解析的选择器视为输入错误
pub fn extract_selectors(
    document: &Html,
    selectors: &[String],
) -> Result<BTreeMap<String, SelectorMatch>, ScrapeError> {
    let mut extracted = BTreeMap::new();

    for raw in selectors {
        let selector = Selector::parse(raw).map_err(|e| {
            ScrapeError::InvalidInput(format!("Invalid selector `{}`: {}", raw, e))
        })?;
        let matched: Vec<_> = document.select(&selector).collect();

        extracted.insert(
            raw.clone(),
            SelectorMatch {
                text: joined_text(matched.iter().copied()),
                html: matched.first().map(|el| el.inner_html()),
                count: matched.len(),
            },
        );
    }

    Ok(extracted)
}
