// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 抓取请求（scrape_request）：目标、抓取方式与选项
/// - 抓取结果（scrape_result）：统一的成功/失败结构
/// - 公司字段（company）：从页面中提取的结构化数据
/// - 页面（page）：静态或渲染后的原始内容
pub mod company;
pub mod page;
pub mod scrape_request;
pub mod scrape_result;
