// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::scrape_use_case::ScrapeOrchestrator;
use crate::presentation::handlers::scrape_handler;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(orchestrator: Arc<ScrapeOrchestrator>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/scrape/company", post(scrape_handler::scrape_company))
        .route("/v1/scrape/generic", post(scrape_handler::scrape_generic))
        .route("/v1/scrape/linkedin", post(scrape_handler::scrape_linkedin))
        .layer(Extension(orchestrator))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}
