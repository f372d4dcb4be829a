// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

/// 单条提取策略
///
/// 每条策略都是 `(document) -> Option<String>` 的纯函数，空白结果视为未命中
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// 首个匹配元素的属性值；属性缺失时退回所有匹配元素的文本
    AttrOrText {
        selector: &'static str,
        attr: &'static str,
    },
    /// 首个匹配元素的属性值
    Attr {
        selector: &'static str,
        attr: &'static str,
    },
    /// 所有匹配元素的文本拼接
    Text(&'static str),
    /// 首个匹配元素的文本
    FirstText(&'static str),
    /// 文本包含任一关键词（不区分大小写）的首个链接的 `href`
    AnchorHref {
        selector: &'static str,
        text_contains: &'static [&'static str],
    },
}

impl ExtractionStrategy {
    /// 对文档执行策略
    pub fn apply(&self, document: &Html) -> Option<String> {
        let value = match *self {
            ExtractionStrategy::AttrOrText { selector, attr } => {
                let selector = parse(selector)?;
                let first_attr = document
                    .select(&selector)
                    .next()
                    .and_then(|el| el.value().attr(attr))
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string);
                first_attr.or_else(|| Some(joined_text(document.select(&selector))))
            }
            ExtractionStrategy::Attr { selector, attr } => {
                let selector = parse(selector)?;
                document
                    .select(&selector)
                    .next()
                    .and_then(|el| el.value().attr(attr))
                    .map(|v| v.trim().to_string())
            }
            ExtractionStrategy::Text(selector) => {
                let selector = parse(selector)?;
                Some(joined_text(document.select(&selector)))
            }
            ExtractionStrategy::FirstText(selector) => {
                let selector = parse(selector)?;
                document.select(&selector).next().map(element_text)
            }
            ExtractionStrategy::AnchorHref {
                selector,
                text_contains,
            } => {
                let selector = parse(selector)?;
                document
                    .select(&selector)
                    .find(|el| {
                        let text = element_text(*el).to_lowercase();
                        text_contains.iter().any(|needle| text.contains(needle))
                    })
                    .and_then(|el| el.value().attr("href"))
                    .map(|href| href.trim().to_string())
            }
        };

        value.filter(|v| !v.is_empty())
    }
}

/// 选择器级联
///
/// 按优先级依次尝试候选策略，取第一个非空且长度达标的结果；全部未命中时返回 `None`
#[derive(Debug, Clone)]
pub struct Cascade {
    strategies: Vec<ExtractionStrategy>,
    min_chars: usize,
    short_fallback: bool,
}

impl Cascade {
    pub fn new(strategies: impl Into<Vec<ExtractionStrategy>>) -> Self {
        Self {
            strategies: strategies.into(),
            min_chars: 1,
            short_fallback: false,
        }
    }

    /// 结果至少需要的字符数
    pub fn min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars.max(1);
        self
    }

    /// 没有候选达到长度要求时，退回第一个非空结果
    pub fn with_short_fallback(mut self) -> Self {
        self.short_fallback = true;
        self
    }

    /// 返回命中的策略序号与结果
    pub fn first_match_with_index(&self, document: &Html) -> Option<(usize, String)> {
        let mut fallback = None;

        for (index, strategy) in self.strategies.iter().enumerate() {
            let Some(value) = strategy.apply(document) else {
                continue;
            };
            if value.chars().count() >= self.min_chars {
                trace!(index, ?strategy, "selector cascade hit");
                return Some((index, value));
            }
            if self.short_fallback && fallback.is_none() {
                fallback = Some((index, value));
            }
        }

        fallback
    }

    pub fn first_match(&self, document: &Html) -> Option<String> {
        self.first_match_with_index(document).map(|(_, value)| value)
    }
}

pub(crate) fn parse(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn joined_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements
        .map(|el| el.text().collect::<String>())
        .collect::<String>()
        .trim()
        .to_string()
}
