//! 错误类型
//!
//! 各层使用 `thiserror` 定义的具体错误，`main` 与 CLI 胶水层使用 `anyhow` 汇总。

use std::path::PathBuf;

/// 配置或输入校验错误，在任何远程调用之前抛出
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("missing \"{0}\" attribute in input")]
    MissingInput(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// 抓取平台调用错误
#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    /// 平台返回 429
    #[error("rate limit exceeded on scraping platform (actor {actor})")]
    RateLimited { actor: String },

    #[error("scraping platform returned {status} for actor {actor}: {body}")]
    Status {
        actor: String,
        status: u16,
        body: String,
    },

    #[error("scraping platform request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from actor {actor}: {message}")]
    Decode { actor: String, message: String },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl ScraperError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ScraperError::RateLimited { .. })
    }
}

/// 研究Agent调用错误
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// 模型服务或其工具调用触发限流
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("research agent failed: {0}")]
    Failed(String),
}

impl AgentError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AgentError::RateLimited(_))
    }
}

/// 严格模式下融资轮次解析失败
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("funding round #{index} is malformed: {reason}")]
    MalformedRound { index: usize, reason: String },
}

/// 文档渲染错误
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("pdf engine `{engine}` could not be started: {source}")]
    EngineUnavailable {
        engine: String,
        source: std::io::Error,
    },

    #[error("pdf engine `{engine}` exited with {status}: {stderr}")]
    EngineFailed {
        engine: String,
        status: String,
        stderr: String,
    },
}

/// 融资时间线图表错误
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("funding round date {date:?} is not YYYY-MM-DD")]
    InvalidDate { date: String },

    #[error("failed to draw chart {path:?}: {message}")]
    Draw { path: PathBuf, message: String },
}

/// 结果输出（数据集、计费事件）错误
#[derive(Debug, thiserror::Error)]
pub enum OutletError {
    #[error("failed to append record to {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("platform request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("platform returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// 一次研究运行的顶层错误
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Outlet(#[from] OutletError),
}

pub type Result<T, E = ResearchError> = std::result::Result<T, E>;
