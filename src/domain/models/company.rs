// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 社交链接
///
/// 每个平台最多保留一个链接，以文档中首次出现的为准
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

impl SocialLinks {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 已识别的平台数量
    pub fn len(&self) -> usize {
        [&self.linkedin, &self.twitter, &self.facebook]
            .iter()
            .filter(|link| link.is_some())
            .count()
    }
}

/// 公司字段
///
/// 尽力而为：任何单个字段缺失都不算错误
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFields {
    /// 公司名称
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 公司描述
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 来自 `<title>` 的简介提示
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    /// 行业
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// 公司规模
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// 官网
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// 社交链接
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    /// 页面标题（h1-h3），用作上下文信号
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<String>,
    /// 原始 `<title>` 文本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_title: Option<String>,
}

/// LinkedIn 个人资料字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedInProfileFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

/// 单个选择器的匹配结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorMatch {
    /// 所有匹配元素的文本拼接
    pub text: String,
    /// 首个匹配元素的内部 HTML
    pub html: Option<String>,
    /// 匹配元素数量
    pub count: usize,
}
