//! 限流重试策略
//!
//! 只识别 [`AgentError::RateLimited`]：固定等待一次后再执行一次，
//! 第二次的结果（无论成败）原样返回。其他错误立即返回。

use std::future::Future;
use std::time::Duration;

use tracing::info;

use crate::config::RetryConfig;
use crate::error::AgentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRetry {
    delay: Duration,
}

impl RateLimitRetry {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(Duration::from_secs(config.rate_limit_delay_secs))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 执行 `operation`，限流时等待固定时长后重试一次
    pub async fn run<T, F, Fut>(&self, operation: F) -> Result<T, AgentError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, AgentError>>,
    {
        match operation().await {
            Err(err) if err.is_rate_limited() => {
                info!(
                    delay_secs = self.delay.as_secs(),
                    error = %err,
                    "Rate limit exceeded, retrying in {} seconds...",
                    self.delay.as_secs()
                );
                tokio::time::sleep(self.delay).await;
                operation().await
            }
            result => result,
        }
    }
}

impl Default for RateLimitRetry {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
