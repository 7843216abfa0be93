//! LLM客户端 - 基于rig的研究Agent实现

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::agent::{ResearchAgent, ResearchTask, system_prompt};
use crate::config::LLMConfig;
use crate::error::AgentError;
use crate::llm::tools::ResearchTools;
use crate::types::ResearchReport;

mod providers;
pub mod utils;

use providers::ProviderClient;
use utils::classify_prompt_error;

/// 由rig驱动的研究Agent，挂载官网、LinkedIn、Crunchbase三个工具
#[derive(Clone)]
pub struct RigResearchAgent {
    client: ProviderClient,
    config: LLMConfig,
    model: String,
    tools: ResearchTools,
}

impl RigResearchAgent {
    /// 创建新的研究Agent，`model` 为调用方选定的模型
    pub fn new(config: &LLMConfig, model: &str, tools: ResearchTools) -> Result<Self, AgentError> {
        let client = ProviderClient::new(config)?;
        Ok(Self {
            client,
            config: config.clone(),
            model: model.to_string(),
            tools,
        })
    }
}

#[async_trait]
impl ResearchAgent for RigResearchAgent {
    #[instrument(skip_all, fields(company = %task.company_name, model = %self.model))]
    async fn research(&self, task: &ResearchTask) -> Result<ResearchReport, AgentError> {
        let agent = self.client.create_agent_with_tools(
            &self.model,
            &system_prompt(),
            &self.config,
            &self.tools,
        );

        // 清除上一次调用遗留的限流信号
        self.tools.take_rate_limit();

        debug!(max_turns = self.config.max_turns, "starting research agent");
        let outcome = agent
            .multi_turn_with_usage(&task.prompt(), self.config.max_turns)
            .await
            .map_err(classify_prompt_error);

        settle(outcome, self.tools.take_rate_limit())
    }
}

/// 合并模型调用结果与工具限流信号
///
/// 工具遇到的限流只能通过信号得知，此时无论模型是否给出了答案都按限流处理。
pub fn settle(
    outcome: Result<(String, u64), AgentError>,
    tool_rate_limited: bool,
) -> Result<ResearchReport, AgentError> {
    match outcome {
        Err(AgentError::RateLimited(message)) => Err(AgentError::RateLimited(message)),
        _ if tool_rate_limited => Err(AgentError::RateLimited(
            "scraping platform rate limit hit during a tool call".to_string(),
        )),
        Ok((raw_text, token_usage)) => Ok(ResearchReport {
            raw_text,
            token_usage,
        }),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_passes_through_clean_result() {
        let report = settle(Ok(("Acme report".to_string(), 42)), false).unwrap();

        assert_eq!(report.raw_text, "Acme report");
        assert_eq!(report.token_usage, 42);
    }

    #[test]
    fn test_settle_tool_rate_limit_overrides_answer() {
        let err = settle(Ok(("partial report".to_string(), 10)), true).unwrap_err();
        assert!(err.is_rate_limited());

        let err = settle(Err(AgentError::Failed("max depth".to_string())), true).unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_settle_keeps_other_errors() {
        let err = settle(Err(AgentError::Failed("invalid api key".to_string())), false).unwrap_err();
        assert!(matches!(err, AgentError::Failed(_)));

        let err = settle(Err(AgentError::RateLimited("429 Too Many Requests".to_string())), false)
            .unwrap_err();
        assert!(err.is_rate_limited());
    }
}
