//! 暴露给研究Agent的工具

pub mod crunchbase;
pub mod linkedin;
pub mod website;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;

use crate::config::Config;
use crate::error::ScraperError;
use crate::scraper::{
    ActorRunner, CrunchbaseFetcher, LinkedInFetcher, TimelineCapture, WebsiteFetcher,
};

pub use crunchbase::AgentToolCrunchbase;
pub use linkedin::AgentToolLinkedIn;
pub use website::AgentToolWebsite;

/// 工具调用期间抓取平台返回的限流信号
///
/// rig 把工具错误转成文本交还给模型，限流因此不会以错误形式离开Agent循环。
/// 工具在这里登记限流，Agent在本次调用结束后读取并转为 [`AgentError::RateLimited`]。
///
/// [`AgentError::RateLimited`]: crate::error::AgentError::RateLimited
#[derive(Debug, Clone, Default)]
pub struct RateLimitSignal {
    tripped: Arc<AtomicBool>,
}

impl RateLimitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }

    /// 读取并清除信号
    pub fn take(&self) -> bool {
        self.tripped.swap(false, Ordering::SeqCst)
    }

    /// 工具结果为限流错误时登记信号，结果原样返回
    pub(crate) fn observe<T>(&self, result: Result<T, ScraperError>) -> Result<T, ScraperError> {
        if let Err(err) = &result
            && err.is_rate_limited()
        {
            self.trip();
        }
        result
    }
}

/// 研究Agent可调用的全部工具
#[derive(Clone)]
pub struct ResearchTools {
    pub website: AgentToolWebsite,
    pub linkedin: AgentToolLinkedIn,
    pub crunchbase: AgentToolCrunchbase,
    rate_limit: RateLimitSignal,
}

impl ResearchTools {
    /// 三个工具共享同一个抓取平台客户端；融资时间线写入 `capture`
    pub fn new(runner: Arc<dyn ActorRunner>, config: &Config, capture: TimelineCapture) -> Self {
        let website = WebsiteFetcher::new(runner.clone(), &config.scraper);
        let linkedin = LinkedInFetcher::new(runner.clone(), &config.scraper);
        let crunchbase =
            CrunchbaseFetcher::new(runner, &config.scraper, config.funding.policy, capture);

        let rate_limit = RateLimitSignal::new();

        Self {
            website: AgentToolWebsite::new(website, rate_limit.clone()),
            linkedin: AgentToolLinkedIn::new(linkedin, rate_limit.clone()),
            crunchbase: AgentToolCrunchbase::new(crunchbase, rate_limit.clone()),
            rate_limit,
        }
    }

    /// 自上次读取以来是否有工具遇到限流，读取后清除
    pub fn take_rate_limit(&self) -> bool {
        self.rate_limit.take()
    }
}

/// 三个抓取工具共用的参数
#[derive(Debug, Deserialize)]
pub struct ScrapeArgs {
    #[serde(default)]
    pub url: String,
}

/// 工具参数的JSON Schema
fn url_parameters(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "url": {
                "type": "string",
                "description": description
            }
        },
        "required": ["url"]
    })
}
