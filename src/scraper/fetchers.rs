//! 三个远程数据获取器
//!
//! 每个获取器对应一个抓取服务：输入为空时直接返回错误结果，不发起远程调用；
//! 否则调用一次远程服务并把返回的数据整形为 [`FetchResult`]。
//! 远程调用本身的失败原样向上传播。

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value, json};
use tracing::info;

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::funding::{RoundPolicy, normalize_funding_rounds};
use crate::scraper::client::ActorRunner;
use crate::types::{FetchResult, FundingRound, Source};

/// 本次运行中第一次归一化得到的融资时间线
///
/// 由 Crunchbase 获取器写入，供图表输出读取，编排层无需直接调用获取器。
/// Agent会先查目标公司再查竞品，因此只保留第一次写入；每次运行开始前清空。
#[derive(Debug, Clone, Default)]
pub struct TimelineCapture {
    inner: Arc<Mutex<Option<Vec<FundingRound>>>>,
}

impl TimelineCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已有时间线时忽略后续写入
    pub fn record(&self, timeline: Vec<FundingRound>) {
        let mut slot = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            *slot = Some(timeline);
        }
    }

    pub fn clear(&self) {
        let mut slot = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    /// 尚未抓取到融资数据时返回空序列
    pub fn latest(&self) -> Vec<FundingRound> {
        let slot = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        slot.clone().unwrap_or_default()
    }
}

/// 公司官网内容获取器
#[derive(Clone)]
pub struct WebsiteFetcher {
    runner: Arc<dyn ActorRunner>,
    actor_id: String,
    max_pages: u32,
}

impl WebsiteFetcher {
    pub fn new(runner: Arc<dyn ActorRunner>, config: &ScraperConfig) -> Self {
        Self {
            runner,
            actor_id: config.website_actor.clone(),
            max_pages: config.max_pages_per_crawl,
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchResult, ScraperError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(FetchResult::error(Source::Website, "No URL provided"));
        }

        info!(source = %Source::Website, url, "fetching company website");
        let input = json!({
            "startUrls": [{"url": url}],
            "maxPagesPerCrawl": self.max_pages,
        });
        let pages = self.runner.run_actor(&self.actor_id, input).await?;

        if pages.is_empty() {
            return Ok(FetchResult::error(Source::Website, "No pages scraped."));
        }

        let all_text = pages
            .iter()
            .map(|page| page.get("text").and_then(Value::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ");

        let mut payload = Map::new();
        payload.insert("website_data".to_string(), Value::String(all_text));
        Ok(FetchResult::ok(Source::Website, payload))
    }
}

/// LinkedIn 公司主页获取器
#[derive(Clone)]
pub struct LinkedInFetcher {
    runner: Arc<dyn ActorRunner>,
    actor_id: String,
}

impl LinkedInFetcher {
    pub fn new(runner: Arc<dyn ActorRunner>, config: &ScraperConfig) -> Self {
        Self {
            runner,
            actor_id: config.linkedin_actor.clone(),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchResult, ScraperError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(FetchResult::error(Source::Linkedin, "No LinkedIn URL provided"));
        }

        info!(source = %Source::Linkedin, url, "fetching linkedin profile");
        let items = self
            .runner
            .run_actor(&self.actor_id, json!({ "url": url }))
            .await?;

        match items.into_iter().next() {
            None => Ok(FetchResult::error(Source::Linkedin, "No data from LinkedIn.")),
            Some(first) => {
                let profile = into_object(&self.actor_id, first)?;
                Ok(FetchResult::ok(Source::Linkedin, profile))
            }
        }
    }
}

/// Crunchbase 公司档案与融资历史获取器
#[derive(Clone)]
pub struct CrunchbaseFetcher {
    runner: Arc<dyn ActorRunner>,
    actor_id: String,
    policy: RoundPolicy,
    capture: TimelineCapture,
}

impl CrunchbaseFetcher {
    pub fn new(
        runner: Arc<dyn ActorRunner>,
        config: &ScraperConfig,
        policy: RoundPolicy,
        capture: TimelineCapture,
    ) -> Self {
        Self {
            runner,
            actor_id: config.crunchbase_actor.clone(),
            policy,
            capture,
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchResult, ScraperError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(FetchResult::error(
                Source::Crunchbase,
                "No Crunchbase URL provided",
            ));
        }

        info!(source = %Source::Crunchbase, url, "fetching crunchbase profile");
        let items = self
            .runner
            .run_actor(&self.actor_id, json!({ "url": url }))
            .await?;

        let Some(first) = items.into_iter().next() else {
            return Ok(FetchResult::error(
                Source::Crunchbase,
                "No data from Crunchbase.",
            ));
        };

        let profile = into_object(&self.actor_id, first)?;
        let timeline = normalize_funding_rounds(profile.get("funding_rounds_list"), self.policy)?;
        self.capture.record(timeline.clone());

        let mut payload = Map::new();
        payload.insert("company_profile".to_string(), Value::Object(profile));
        payload.insert(
            "funding_timeline".to_string(),
            serde_json::to_value(&timeline).map_err(|e| ScraperError::Decode {
                actor: self.actor_id.clone(),
                message: e.to_string(),
            })?,
        );
        Ok(FetchResult::ok(Source::Crunchbase, payload))
    }
}

fn into_object(actor_id: &str, item: Value) -> Result<Map<String, Value>, ScraperError> {
    match item {
        Value::Object(map) => Ok(map),
        _ => Err(ScraperError::Decode {
            actor: actor_id.to_string(),
            message: "dataset item is not an object".to_string(),
        }),
    }
}
