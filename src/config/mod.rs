use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::funding::RoundPolicy;

/// 抓取平台访问令牌的环境变量
pub const SCRAPER_TOKEN_ENV: &str = "APIFY_TOKEN";
/// 平台默认数据集ID的环境变量（在平台内运行时注入）
pub const DATASET_ID_ENV: &str = "APIFY_DEFAULT_DATASET_ID";
/// 平台运行ID的环境变量（在平台内运行时注入）
pub const ACTOR_RUN_ID_ENV: &str = "ACTOR_RUN_ID";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
}

impl LLMProvider {
    /// 该Provider的API KEY环境变量
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "OPENAI_API_KEY",
            LLMProvider::Anthropic => "ANTHROPIC_API_KEY",
            LLMProvider::DeepSeek => "DEEPSEEK_API_KEY",
            LLMProvider::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 输出目录（数据集、文档、图表）
    pub output_dir: PathBuf,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 抓取平台配置
    pub scraper: ScraperConfig,

    /// 限流重试配置
    pub retry: RetryConfig,

    /// 报告输出配置
    pub report: ReportConfig,

    /// 结果输出配置
    pub outlet: OutletConfig,

    /// 融资轮次解析配置
    pub funding: FundingConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY，为空时从Provider对应的环境变量读取
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// Agent单次运行允许的最大工具调用轮数
    pub max_turns: usize,
}

/// 抓取平台配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ScraperConfig {
    /// 平台访问令牌，为空时读取 `APIFY_TOKEN`
    pub api_token: String,

    /// 平台API基地址
    pub base_url: String,

    /// 单次调用超时时间（秒）
    pub timeout_seconds: u64,

    /// 官网爬取的页数上限
    pub max_pages_per_crawl: u32,

    pub website_actor: String,

    pub linkedin_actor: String,

    pub crunchbase_actor: String,
}

/// 限流重试配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RetryConfig {
    /// 检测到限流后的固定等待时间（秒）
    pub rate_limit_delay_secs: u64,
}

/// 报告输出配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    /// HTML转PDF的命令行程序，为空时只输出HTML文档
    pub pdf_engine: String,

    /// 图表宽度（像素）
    pub chart_width: u32,

    /// 图表高度（像素）
    pub chart_height: u32,
}

/// 结果输出配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OutletConfig {
    /// 本地数据集文件名（位于输出目录下，JSON Lines）
    pub dataset_file: String,

    /// 平台数据集ID，为空时读取 `APIFY_DEFAULT_DATASET_ID`
    pub dataset_id: Option<String>,

    /// 平台运行ID，为空时读取 `ACTOR_RUN_ID`；存在时计费事件上报至平台
    pub actor_run_id: Option<String>,

    /// 是否同时推送到平台数据集
    pub push_to_platform: bool,
}

/// 融资轮次解析配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct FundingConfig {
    pub policy: RoundPolicy,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// 从进程环境变量补全凭据与平台运行信息
    pub fn resolve_from_env(&mut self) {
        self.resolve_with(|name| std::env::var(name).ok());
    }

    /// 用给定的查找函数补全凭据，配置中已有的值优先
    pub fn resolve_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.llm.api_key.trim().is_empty()
            && let Some(key) = lookup(self.llm.provider.api_key_env())
        {
            self.llm.api_key = key;
        }
        if self.scraper.api_token.trim().is_empty()
            && let Some(token) = lookup(SCRAPER_TOKEN_ENV)
        {
            self.scraper.api_token = token;
        }
        if self.outlet.dataset_id.is_none() {
            self.outlet.dataset_id = lookup(DATASET_ID_ENV).filter(|id| !id.is_empty());
        }
        if self.outlet.actor_run_id.is_none() {
            self.outlet.actor_run_id = lookup(ACTOR_RUN_ID_ENV).filter(|id| !id.is_empty());
        }
    }

    /// 校验必需凭据，缺失即为启动期致命错误
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scraper.api_token.trim().is_empty() {
            return Err(ConfigError::MissingCredential(SCRAPER_TOKEN_ENV));
        }
        if self.llm.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential(
                self.llm.provider.api_key_env(),
            ));
        }
        Ok(())
    }

    /// 本地数据集文件路径
    pub fn dataset_path(&self) -> PathBuf {
        self.output_dir.join(&self.outlet.dataset_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            llm: LLMConfig::default(),
            scraper: ScraperConfig::default(),
            retry: RetryConfig::default(),
            report: ReportConfig::default(),
            outlet: OutletConfig::default(),
            funding: FundingConfig::default(),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: String::new(),
            api_base_url: String::from("https://api.openai.com/v1"),
            max_tokens: 4096,
            temperature: 0.1,
            max_turns: 20,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: String::from("https://api.apify.com"),
            timeout_seconds: 300,
            max_pages_per_crawl: 5,
            website_actor: String::from("apify/website-content-crawler"),
            linkedin_actor: String::from("pratikdani/linkedin-company-profile-scraper"),
            crunchbase_actor: String::from("pratikdani/crunchbase-companies-scraper"),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            rate_limit_delay_secs: 60,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pdf_engine: String::from("wkhtmltopdf"),
            chart_width: 1000,
            chart_height: 500,
        }
    }
}

impl Default for OutletConfig {
    fn default() -> Self {
        Self {
            dataset_file: String::from("dataset.jsonl"),
            dataset_id: None,
            actor_run_id: None,
            push_to_platform: true,
        }
    }
}
