//! LinkedIn 公司主页抓取工具

use rig::tool::Tool;
use serde_json::Value;

use super::{RateLimitSignal, ScrapeArgs, url_parameters};
use crate::error::ScraperError;
use crate::scraper::LinkedInFetcher;

#[derive(Clone)]
pub struct AgentToolLinkedIn {
    fetcher: LinkedInFetcher,
    rate_limit: RateLimitSignal,
}

impl AgentToolLinkedIn {
    pub fn new(fetcher: LinkedInFetcher, rate_limit: RateLimitSignal) -> Self {
        Self {
            fetcher,
            rate_limit,
        }
    }
}

impl Tool for AgentToolLinkedIn {
    const NAME: &'static str = "linkedin_company_profile_scraper";

    type Error = ScraperError;
    type Args = ScrapeArgs;
    type Output = Value;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Scrapes company profile and employee data from LinkedIn.".to_string(),
            parameters: url_parameters("LinkedIn company profile URL"),
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
