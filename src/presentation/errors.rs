// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::application::dto::scrape_response::ErrorResponseDto;
use crate::domain::models::scrape_result::{ScrapeErrorKind, ScrapeResult};

/// 失败的抓取结果
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ScrapeFailure {
    pub kind: ScrapeErrorKind,
    pub message: String,
    pub url: Option<String>,
    pub warning: Option<String>,
}

impl ScrapeFailure {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: ScrapeErrorKind::InvalidInput,
            message: message.into(),
            url: None,
            warning: None,
        }
    }

    pub fn from_result<T>(result: ScrapeResult<T>) -> Self {
        let kind = result.error_kind.unwrap_or(ScrapeErrorKind::ExtractionFailure);
        Self {
            kind,
            message: result
                .error
                .unwrap_or_else(|| "Failed to scrape URL".to_string()),
            url: Some(result.url),
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: &str) -> Self {
        self.warning = Some(warning.to_string());
        self
    }

    fn status(&self) -> StatusCode {
        match self.kind {
            ScrapeErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ScrapeErrorKind::PolicyBlocked => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponseDto {
        let mut body = ErrorResponseDto::new(self.message.as_str());
        body.warning = self.warning.clone();
        match self.kind {
            ScrapeErrorKind::InvalidInput => {}
            ScrapeErrorKind::PolicyBlocked => body.robots_compliance = Some(false),
            _ => body.url = self.url.clone(),
        }
        body
    }
}

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0.downcast_ref::<ScrapeFailure>() {
            Some(failure) => (failure.status(), Json(failure.body())).into_response(),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponseDto::new(self.0.to_string())),
            )
                .into_response(),
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
