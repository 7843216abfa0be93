//! LLM Provider支持模块

use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::{Prompt, PromptError},
};

use crate::{
    config::{LLMConfig, LLMProvider},
    error::AgentError,
    llm::tools::ResearchTools,
};

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    Anthropic(rig::providers::anthropic::Client),
    DeepSeek(rig::providers::deepseek::Client),
    OpenRouter(rig::providers::openrouter::Client),
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &LLMConfig) -> Result<Self, AgentError> {
        match config.provider {
            LLMProvider::OpenAI => {
                let client = rig::providers::openai::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build();
                Ok(ProviderClient::OpenAI(client))
            }
            LLMProvider::Anthropic => {
                let client = rig::providers::anthropic::ClientBuilder::new(&config.api_key)
                    .build()
                    .map_err(|e| AgentError::Failed(format!("anthropic client: {}", e)))?;
                Ok(ProviderClient::Anthropic(client))
            }
            LLMProvider::DeepSeek => {
                let client = rig::providers::deepseek::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build();
                Ok(ProviderClient::DeepSeek(client))
            }
            LLMProvider::OpenRouter => {
                let client = rig::providers::openrouter::Client::builder(&config.api_key).build();
                Ok(ProviderClient::OpenRouter(client))
            }
        }
    }

    /// 创建挂载了三个抓取工具的Agent
    pub fn create_agent_with_tools(
        &self,
        model: &str,
        system_prompt: &str,
        config: &LLMConfig,
        tools: &ResearchTools,
    ) -> ProviderAgent {
        match self {
            ProviderClient::OpenAI(client) => {
                let agent = client
                    .completion_model(model)
                    .completions_api()
                    .into_agent_builder()
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .tool(tools.website.clone())
                    .tool(tools.linkedin.clone())
                    .tool(tools.crunchbase.clone())
                    .build();
                ProviderAgent::OpenAI(agent)
            }
            ProviderClient::Anthropic(client) => {
                let agent = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .tool(tools.website.clone())
                    .tool(tools.linkedin.clone())
                    .tool(tools.crunchbase.clone())
                    .build();
                ProviderAgent::Anthropic(agent)
            }
            ProviderClient::DeepSeek(client) => {
                let agent = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .tool(tools.website.clone())
                    .tool(tools.linkedin.clone())
                    .tool(tools.crunchbase.clone())
                    .build();
                ProviderAgent::DeepSeek(agent)
            }
            ProviderClient::OpenRouter(client) => {
                let agent = client
                    .agent(model)
                    .preamble(system_prompt)
                    .temperature(config.temperature)
                    .tool(tools.website.clone())
                    .tool(tools.linkedin.clone())
                    .tool(tools.crunchbase.clone())
                    .build();
                ProviderAgent::OpenRouter(agent)
            }
        }
    }
}

/// 统一的Agent枚举
pub enum ProviderAgent {
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    DeepSeek(Agent<rig::providers::deepseek::CompletionModel>),
    OpenRouter(Agent<rig::providers::openrouter::CompletionModel>),
}

impl ProviderAgent {
    /// 执行多轮工具调用对话，返回最终文本与所有轮次累计的token用量
    pub async fn multi_turn_with_usage(
        &self,
        prompt: &str,
        max_turns: usize,
    ) -> Result<(String, u64), PromptError> {
        let response = match self {
            ProviderAgent::OpenAI(agent) => {
                agent
                    .prompt(prompt)
                    .multi_turn(max_turns)
                    .extended_details()
                    .await?
            }
            ProviderAgent::Anthropic(agent) => {
                agent
                    .prompt(prompt)
                    .multi_turn(max_turns)
                    .extended_details()
                    .await?
            }
            ProviderAgent::DeepSeek(agent) => {
                agent
                    .prompt(prompt)
                    .multi_turn(max_turns)
                    .extended_details()
                    .await?
            }
            ProviderAgent::OpenRouter(agent) => {
                agent
                    .prompt(prompt)
                    .multi_turn(max_turns)
                    .extended_details()
                    .await?
            }
        };

        Ok((response.output, response.total_usage.total_tokens))
    }
}
