//! 计费事件
//!
//! 运行开始时发出 `actor-start`，Agent成功完成后发出 `task-completed`。
//! 这些事件只是给托管平台的计费信号，不携带数据。

use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::error::OutletError;
use crate::scraper::ApifyClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeEvent {
    ActorStart,
    TaskCompleted,
}

impl ChargeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ChargeEvent::ActorStart => "actor-start",
            ChargeEvent::TaskCompleted => "task-completed",
        }
    }
}

impl Display for ChargeEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[async_trait]
pub trait BillingMeter: Send + Sync {
    async fn charge(&self, event: ChargeEvent) -> Result<(), OutletError>;
}

/// 不在平台内运行时只记录日志
#[derive(Debug, Default)]
pub struct LogBillingMeter;

#[async_trait]
impl BillingMeter for LogBillingMeter {
    async fn charge(&self, event: ChargeEvent) -> Result<(), OutletError> {
        info!(event = %event, "billing event");
        Ok(())
    }
}

/// 上报到平台运行的计费接口
pub struct PlatformBillingMeter {
    client: ApifyClient,
    run_id: String,
}

impl PlatformBillingMeter {
    pub fn new(client: ApifyClient, run_id: impl Into<String>) -> Self {
        Self {
            client,
            run_id: run_id.into(),
        }
    }
}

#[async_trait]
impl BillingMeter for PlatformBillingMeter {
    async fn charge(&self, event: ChargeEvent) -> Result<(), OutletError> {
        let response = self
            .client
            .post(&format!("/v2/actor-runs/{}/charge", self.run_id))
            .json(&json!({ "eventName": event.name(), "count": 1 }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OutletError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        info!(event = %event, run_id = %self.run_id, "billing event charged");
        Ok(())
    }
}
