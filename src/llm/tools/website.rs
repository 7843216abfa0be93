//! 公司官网抓取工具

use rig::tool::Tool;
use serde_json::Value;

use super::{RateLimitSignal, ScrapeArgs, url_parameters};
use crate::error::ScraperError;
use crate::scraper::WebsiteFetcher;

#[derive(Clone)]
pub struct AgentToolWebsite {
    fetcher: WebsiteFetcher,
    rate_limit: RateLimitSignal,
}

impl AgentToolWebsite {
    pub fn new(fetcher: WebsiteFetcher, rate_limit: RateLimitSignal) -> Self {
        Self {
            fetcher,
            rate_limit,
        }
    }
}

impl Tool for AgentToolWebsite {
    const NAME: &'static str = "company_website_extractor";

    type Error = ScraperError;
    type Args = ScrapeArgs;
    type Output = Value;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Extracts company focus, products, funding, executives, and contact info from official website.".to_string(),
            parameters: url_parameters("Official website URL of the company."),
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
