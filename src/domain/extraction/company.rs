// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{Html, Selector};
use url::Url;

use super::cascade::{element_text, Cascade, ExtractionStrategy};
use crate::domain::models::company::{CompanyFields, SocialLinks};
use crate::utils::url_utils::host_matches;

/// 描述至少需要的字符数
const DESCRIPTION_MIN_CHARS: usize = 21;
const MAX_HEADINGS: usize = 10;

/// 公司官网描述的候选选择器，按优先级排列
pub const DESCRIPTION_CANDIDATES: [ExtractionStrategy; 6] = [
    ExtractionStrategy::AttrOrText {
        selector: r#"meta[name="description"]"#,
        attr: "content",
    },
    ExtractionStrategy::AttrOrText {
        selector: r#"meta[property="og:description"]"#,
        attr: "content",
    },
    ExtractionStrategy::AttrOrText {
        selector: ".company-description",
        attr: "content",
    },
    ExtractionStrategy::AttrOrText {
        selector: ".about-us",
        attr: "content",
    },
    ExtractionStrategy::AttrOrText {
        selector: "#about",
        attr: "content",
    },
    ExtractionStrategy::AttrOrText {
        selector: r#"[itemprop="description"]"#,
        attr: "content",
    },
];

const TITLE_CANDIDATES: [ExtractionStrategy; 2] = [
    ExtractionStrategy::FirstText("head > title"),
    ExtractionStrategy::FirstText("title"),
];

// LinkedIn renders these client-side; class names are matched by substring.
const LINKEDIN_NAME_CANDIDATES: [ExtractionStrategy; 3] = [
    ExtractionStrategy::FirstText(r#"h1[class*="org-top-card-summary__title"]"#),
    ExtractionStrategy::FirstText(r#"[class*="org-top-card"] h1"#),
    ExtractionStrategy::Attr {
        selector: r#"meta[property="og:title"]"#,
        attr: "content",
    },
];

const LINKEDIN_DESCRIPTION_CANDIDATES: [ExtractionStrategy; 3] = [
    ExtractionStrategy::Text(r#"[class*="org-about-us-organization-description"]"#),
    ExtractionStrategy::Text(r#"[data-test-id="about-us__description"]"#),
    ExtractionStrategy::Attr {
        selector: r#"meta[property="og:description"]"#,
        attr: "content",
    },
];

const LINKEDIN_INDUSTRY_CANDIDATES: [ExtractionStrategy; 2] = [
    ExtractionStrategy::FirstText(r#"[class*="org-page-details__definition-text"]"#),
    ExtractionStrategy::FirstText(r#"[class*="org-top-card-summary-info-list__info-item"]"#),
];

const LINKEDIN_SIZE_CANDIDATES: [ExtractionStrategy; 2] = [
    ExtractionStrategy::Text(r#"[class*="org-about-company-module__company-size-definition"]"#),
    ExtractionStrategy::FirstText(r#"[data-test-id="about-us__size"] dd"#),
];

const LINKEDIN_WEBSITE_CANDIDATES: [ExtractionStrategy; 1] = [ExtractionStrategy::AnchorHref {
    selector: r#"a[href*="http"]"#,
    text_contains: &["website", "www"],
}];

/// 社交平台
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SocialPlatform {
    LinkedIn,
    Twitter,
    Facebook,
}

impl SocialPlatform {
    fn detect(href: &str) -> Option<Self> {
        let url = parse_href(href)?;
        let host = url.host_str()?;

        if host_matches(host, "linkedin.com") {
            Some(SocialPlatform::LinkedIn)
        } else if host_matches(host, "twitter.com") || host_matches(host, "x.com") {
            Some(SocialPlatform::Twitter)
        } else if host_matches(host, "facebook.com") {
            Some(SocialPlatform::Facebook)
        } else {
            None
        }
    }
}

/// 解析链接地址，`//host` 与 `host/path` 形式按 https 处理
///
/// 站内相对路径（`/`、`?`、`#` 开头）不视为外部链接
fn parse_href(href: &str) -> Option<Url> {
    if href.starts_with("//") {
        return Url::parse(&format!("https:{}", href)).ok();
    }
    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase)
            if !href.starts_with(['/', '?', '#']) =>
        {
            Url::parse(&format!("https://{}", href)).ok()
        }
        Err(_) => None,
    }
}

/// 从公司官网提取字段
pub fn extract_company_fields(document: &Html) -> CompanyFields {
    let title = Cascade::new(TITLE_CANDIDATES).first_match(document);
    let social_links = extract_social_links(document);

    CompanyFields {
        description: Cascade::new(DESCRIPTION_CANDIDATES)
            .min_chars(DESCRIPTION_MIN_CHARS)
            .with_short_fallback()
            .first_match(document),
        about: title.clone(),
        social_links: (!social_links.is_empty()).then_some(social_links),
        headings: extract_headings(document),
        raw_title: title,
        ..Default::default()
    }
}

/// 从渲染后的 LinkedIn 公司主页提取字段
pub fn extract_linkedin_company(document: &Html) -> CompanyFields {
    CompanyFields {
        name: Cascade::new(LINKEDIN_NAME_CANDIDATES).first_match(document),
        description: Cascade::new(LINKEDIN_DESCRIPTION_CANDIDATES).first_match(document),
        industry: Cascade::new(LINKEDIN_INDUSTRY_CANDIDATES).first_match(document),
        size: Cascade::new(LINKEDIN_SIZE_CANDIDATES).first_match(document),
        website: Cascade::new(LINKEDIN_WEBSITE_CANDIDATES).first_match(document),
        ..Default::default()
    }
}

/// 提取社交链接，每个平台只保留首次出现的链接
pub fn extract_social_links(document: &Html) -> SocialLinks {
    let mut links = SocialLinks::default();
    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        let slot = match SocialPlatform::detect(href) {
            Some(SocialPlatform::LinkedIn) => &mut links.linkedin,
            Some(SocialPlatform::Twitter) => &mut links.twitter,
            Some(SocialPlatform::Facebook) => &mut links.facebook,
            None => continue,
        };
        if slot.is_none() {
            *slot = Some(href.to_string());
        }
    }

    links
}

/// 按文档顺序收集 h1-h3 文本，长度在 (3, 100) 之间，最多 10 条
pub fn extract_headings(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("h1, h2, h3") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(element_text)
        .filter(|text| {
            let len = text.chars().count();
            len > 3 && len < 100
        })
        .take(MAX_HEADINGS)
        .collect()
}
