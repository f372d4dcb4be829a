// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tracing::warn;

use crate::{
    application::{
        dto::{
            scrape_request::{
                CompanyScrapeRequestDto, GenericScrapeRequestDto, LinkedInScrapeRequestDto,
            },
            scrape_response::ScrapeResponseDto,
        },
        use_cases::scrape_use_case::ScrapeOrchestrator,
    },
    presentation::errors::{AppError, ScrapeFailure},
};

/// LinkedIn 抓取响应附带的提示
pub const LINKEDIN_WARNING: &str =
    "LinkedIn restricts automated scraping. Use their official API or this for educational/personal use only.";

fn require_url(url: Option<&str>) -> Result<(), AppError> {
    match url.map(str::trim) {
        Some(url) if !url.is_empty() => Ok(()),
        _ => Err(ScrapeFailure::invalid_input("URL is required").into()),
    }
}

/// 抓取公司官网
pub async fn scrape_company(
    Extension(orchestrator): Extension<Arc<ScrapeOrchestrator>>,
    Json(payload): Json<CompanyScrapeRequestDto>,
) -> Result<Json<ScrapeResponseDto>, AppError> {
    require_url(payload.url.as_deref())?;
    let request = payload.into_request();

    let result = orchestrator.orchestrate(&request).await;
    if !result.success {
        warn!(url = %result.url, error = ?result.error, "Company scrape failed");
        return Err(ScrapeFailure::from_result(result).into());
    }

    Ok(Json(
        ScrapeResponseDto::from_result(result).with_robots_compliance(request.check_policy),
    ))
}

/// 通用抓取，可带自定义选择器
pub async fn scrape_generic(
    Extension(orchestrator): Extension<Arc<ScrapeOrchestrator>>,
    Json(payload): Json<GenericScrapeRequestDto>,
) -> Result<Json<ScrapeResponseDto>, AppError> {
    require_url(payload.url.as_deref())?;
    let request = payload.into_request();

    let result = orchestrator.orchestrate(&request).await;
    if !result.success {
        warn!(url = %result.url, error = ?result.error, "Generic scrape failed");
        return Err(ScrapeFailure::from_result(result).into());
    }

    Ok(Json(
        ScrapeResponseDto::from_result(result)
            .with_robots_compliance(request.check_policy)
            .with_selectors_used(request.selectors.len()),
    ))
}

/// 抓取 LinkedIn 个人资料或公司主页
pub async fn scrape_linkedin(
    Extension(orchestrator): Extension<Arc<ScrapeOrchestrator>>,
    Json(payload): Json<LinkedInScrapeRequestDto>,
) -> Result<Json<ScrapeResponseDto>, AppError> {
    require_url(payload.url.as_deref())?;
    let target = payload
        .target()
        .ok_or_else(|| ScrapeFailure::invalid_input(r#"Type must be "profile" or "company""#))?;
    let url = payload.url.clone().unwrap_or_default();

    let result = orchestrator.linkedin(&url, target, payload.method()).await;
    if !result.success {
        warn!(url = %result.url, error = ?result.error, "LinkedIn scrape failed");
        return Err(ScrapeFailure::from_result(result)
            .with_warning(LINKEDIN_WARNING)
            .into());
    }

    Ok(Json(
        ScrapeResponseDto::from_result(result).with_linkedin_target(target, LINKEDIN_WARNING),
    ))
}
