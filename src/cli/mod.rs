use crate::config::{Config, LLMProvider};
use crate::error::ConfigError;
use crate::funding::RoundPolicy;
use crate::types::{ReportDepth, ResearchRequest};
use clap::Parser;
use std::path::{Path, PathBuf};

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "company-research.toml";

/// Company Research - 基于抓取工具与LLM Agent的公司调研报告生成器
#[derive(Parser, Debug)]
#[command(name = "company-research")]
#[command(
    about = "Researches a company from its website, LinkedIn and Crunchbase profiles with an LLM agent, then persists the findings and optionally renders a report with a funding timeline chart."
)]
#[command(version)]
pub struct Args {
    /// 目标公司名称
    pub company_name: Option<String>,

    /// JSON格式的调用输入文件（company_name, model_name, report_depth）
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// 研究Agent使用的模型
    #[arg(short, long)]
    pub model_name: Option<String>,

    /// 报告深度 (summary, detailed)
    #[arg(short = 'd', long)]
    pub report_depth: Option<ReportDepth>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出目录
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// LLM Provider (openai, anthropic, deepseek, openrouter)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 抓取平台 API TOKEN
    #[arg(long)]
    pub scraper_token: Option<String>,

    /// 触发限流后重试前的等待秒数
    #[arg(long)]
    pub retry_delay_secs: Option<u64>,

    /// 任何一轮融资记录格式错误即终止，而不是丢弃该轮
    #[arg(long)]
    pub strict_funding: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 由输入文件与命令行参数组装研究请求，命令行参数优先
    pub fn to_request(&self) -> Result<ResearchRequest, ConfigError> {
        let mut request = match &self.input {
            Some(path) => read_request(path)?,
            None => ResearchRequest::new(String::new()),
        };

        if let Some(company_name) = &self.company_name {
            request.company_name = company_name.clone();
        }
        if let Some(model_name) = &self.model_name {
            request.model_name = model_name.clone();
        }
        if let Some(report_depth) = self.report_depth {
            request.report_depth = report_depth;
        }

        request.validate()?;
        Ok(request)
    }

    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            // 显式指定的配置文件必须可读
            Some(config_path) => Config::from_file(config_path)?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);

                if default_config_path.exists() {
                    Config::from_file(&default_config_path)?
                } else {
                    Config::default()
                }
            }
        };

        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }

        if let Some(scraper_token) = self.scraper_token {
            config.scraper.api_token = scraper_token;
        }
        if let Some(delay) = self.retry_delay_secs {
            config.retry.rate_limit_delay_secs = delay;
        }
        if self.strict_funding {
            config.funding.policy = RoundPolicy::Strict;
        }
        config.verbose = config.verbose || self.verbose;

        // 凭据最后从环境变量补全，provider可能已被命令行改变
        config.resolve_from_env();

        Ok(config)
    }
}

fn read_request(path: &Path) -> Result<ResearchRequest, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::InvalidInput(e.to_string()))
}
