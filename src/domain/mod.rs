// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// - 领域模型（models）：请求、结果与提取字段
/// - 提取（extraction）：选择器级联与各类字段提取
///
/// 领域层不做任何网络 I/O，只处理已经拿到的 HTML。
pub mod extraction;
pub mod models;
