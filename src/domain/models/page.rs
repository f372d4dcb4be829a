// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::Html;
use serde::{Deserialize, Serialize};

/// 静态抓取得到的页面
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPage {
    /// 原始 HTML
    pub html: String,
    /// HTTP状态码
    pub status_code: u16,
    /// 内容类型
    pub content_type: String,
    /// 重定向后的最终地址
    pub final_url: String,
}

impl StaticPage {
    /// 解析为可查询的文档树
    ///
    /// `Html` 不是 `Send`，不要跨 `.await` 持有
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// 浏览器渲染后的页面
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedPage {
    /// 渲染后的 HTML
    pub html: String,
    /// 页面标题
    pub title: Option<String>,
}

impl RenderedPage {
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// 页面截图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screenshot {
    /// base64 编码的图片
    pub data: String,
    /// 图片格式
    pub format: String,
}
