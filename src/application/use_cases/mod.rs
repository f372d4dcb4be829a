// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// 编排策略检查、静态抓取与动态渲染
pub mod scrape_use_case;
