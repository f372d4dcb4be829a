// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 提取模块
///
/// 所有字段都通过选择器级联提取：按优先级尝试候选策略，取第一个命中值，
/// 全部未命中的字段直接省略。静态抓取与动态渲染共用这里的实现。
pub mod cascade;
pub mod company;
pub mod profile;
pub mod selectors;

pub use cascade::{Cascade, ExtractionStrategy};
pub use company::{extract_company_fields, extract_headings, extract_linkedin_company, extract_social_links};
pub use profile::extract_linkedin_profile;
pub use selectors::extract_selectors;
