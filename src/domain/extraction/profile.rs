// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::Html;

use super::cascade::{Cascade, ExtractionStrategy};
use crate::domain::models::company::LinkedInProfileFields;

const NAME_CANDIDATES: [ExtractionStrategy; 2] = [
    ExtractionStrategy::FirstText("h1"),
    ExtractionStrategy::FirstText(r#"[class*="name"]"#),
];

const HEADLINE_CANDIDATES: [ExtractionStrategy; 2] = [
    ExtractionStrategy::FirstText(r#"[class*="headline"]"#),
    ExtractionStrategy::FirstText("h2"),
];

const LOCATION_CANDIDATES: [ExtractionStrategy; 3] = [
    ExtractionStrategy::FirstText(".text-body-small.inline.t-black--light.break-words"),
    ExtractionStrategy::FirstText(".pv-top-card--list-bullet li:nth-child(2)"),
    ExtractionStrategy::FirstText(".pv-text-details__left-panel .text-body-small"),
];

const ABOUT_CANDIDATES: [ExtractionStrategy; 3] = [
    ExtractionStrategy::FirstText("#about + * .inline-show-more-text"),
    ExtractionStrategy::FirstText(".pv-about-section .pv-about__summary-text"),
    ExtractionStrategy::FirstText(r#"section[data-section="summary"] .pv-shared-text-with-see-more"#),
];

// First entry of the experience list is the current position.
const CURRENT_COMPANY: ExtractionStrategy = ExtractionStrategy::FirstText(
    r#"li[data-view-name="profile-component-entity"] .t-14.t-normal span[aria-hidden="true"]"#,
);

const OG_TITLE: ExtractionStrategy = ExtractionStrategy::Attr {
    selector: r#"meta[property="og:title"]"#,
    attr: "content",
};

/// 从公开的 LinkedIn 个人资料页提取基础字段
///
/// 静态 HTML 通常只包含少量数据；`og:title` 形如 "Jane Doe - Engineer - Acme"，
/// 其第一段优先作为姓名。
pub fn extract_linkedin_profile(document: &Html) -> LinkedInProfileFields {
    let og_name = OG_TITLE
        .apply(document)
        .and_then(|title| title.split('-').next().map(|s| s.trim().to_string()))
        .filter(|name| !name.is_empty());

    let title = Cascade::new(HEADLINE_CANDIDATES).first_match(document);
    let company = title
        .as_deref()
        .and_then(company_from_headline)
        .or_else(|| CURRENT_COMPANY.apply(document));

    LinkedInProfileFields {
        name: og_name.or_else(|| Cascade::new(NAME_CANDIDATES).first_match(document)),
        company,
        location: Cascade::new(LOCATION_CANDIDATES).first_match(document),
        about: Cascade::new(ABOUT_CANDIDATES).first_match(document),
        title,
    }
}

/// "Head of Sales at Acme" 中 `at` 之后的部分
fn company_from_headline(headline: &str) -> Option<String> {
    headline
        .split_once(" at ")
        .map(|(_, company)| company.trim().to_string())
        .filter(|company| !company.is_empty())
}
