//! Crunchbase 公司档案抓取工具

use rig::tool::Tool;
use serde_json::Value;

use super::{RateLimitSignal, ScrapeArgs, url_parameters};
use crate::error::ScraperError;
use crate::scraper::CrunchbaseFetcher;

#[derive(Clone)]
pub struct AgentToolCrunchbase {
    fetcher: CrunchbaseFetcher,
    rate_limit: RateLimitSignal,
}

impl AgentToolCrunchbase {
    pub fn new(fetcher: CrunchbaseFetcher, rate_limit: RateLimitSignal) -> Self {
        Self {
            fetcher,
            rate_limit,
        }
    }
}

impl Tool for AgentToolCrunchbase {
    const NAME: &'static str = "crunchbase_company_scraper";

    type Error = ScraperError;
    type Args = ScrapeArgs;
    type Output = Value;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Scrapes funding history and company data from Crunchbase profile.".to_string(),
            parameters: url_parameters("Crunchbase organization profile URL"),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        println!("   🔧 tool called...{}@{}", Self::NAME, args.url);

        let result = self
            .rate_limit
            .observe(self.fetcher.fetch(&args.url).await)?;
        Ok(result.into_tool_output())
    }
}
