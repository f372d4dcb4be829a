// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::engines::traits::EngineError;

/// 整个抓取请求的截止时间
///
/// 在请求开始时创建，各阶段共享同一个截止点
#[derive(Debug, Clone, Copy)]
pub struct RequestDeadline {
    at: Instant,
    budget: Duration,
}

impl RequestDeadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    /// 在截止时间内执行 `work`，超时时 `work` 被丢弃
    ///
    /// 只能包裹可以安全取消的工作；持有浏览器会话的部分必须自行保证关闭
    pub async fn run<F: Future>(self, work: F) -> Result<F::Output, EngineError> {
        tokio::time::timeout_at(self.at, work)
            .await
            .map_err(|_| self.exceeded())
    }

    fn exceeded(&self) -> EngineError {
        EngineError::Timeout(format!(
            "Request deadline of {}ms exceeded",
            self.budget.as_millis()
        ))
    }
}
