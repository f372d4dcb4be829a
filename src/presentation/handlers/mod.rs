// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 每个处理器校验输入、调用抓取编排器并整理 JSON 响应
pub mod scrape_handler;
