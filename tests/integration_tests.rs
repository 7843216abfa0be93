use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rig::tool::Tool;
use serde_json::{Value, json};
use tempfile::TempDir;

use company_research::agent::{ResearchAgent, ResearchTask};
use company_research::config::Config;
use company_research::error::{AgentError, ResearchError, ScraperError};
use company_research::llm::client::settle;
use company_research::llm::tools::{ResearchTools, ScrapeArgs};
use company_research::outlet::{JsonlDataset, LogBillingMeter};
use company_research::report::ReportEmitter;
use company_research::scraper::{ActorRunner, TimelineCapture};
use company_research::types::{FundingRound, ReportDepth, ResearchReport, ResearchRequest};
use company_research::workflow::{Pipeline, RateLimitRetry, ResearchRun, RunState};

/// 按actor返回固定数据集的抓取平台
struct FixtureRunner {
    items: HashMap<String, Vec<Value>>,
    calls: Mutex<Vec<(String, Value)>>,
    rate_limited_calls: AtomicUsize,
}

impl FixtureRunner {
    fn acme(config: &Config) -> Self {
        let mut items = HashMap::new();
        items.insert(
            config.scraper.website_actor.clone(),
            vec![
                json!({"url": "https://acme.example", "text": "Acme builds widgets."}),
                json!({"url": "https://acme.example/about", "text": "Founded in 2015."}),
            ],
        );
        items.insert(
            config.scraper.linkedin_actor.clone(),
            vec![json!({"name": "Acme Corp", "employees": 120})],
        );
        items.insert(
            config.scraper.crunchbase_actor.clone(),
            vec![json!({
                "name": "Acme Corp",
                "funding_rounds_list": [
                    {
                        "announced_on": "2021-03-01",
                        "money_raised": {"value_usd": 12000000},
                        "lead_investors": [{"names": "Sequoia"}]
                    },
                    {
                        "announced_on": "2019-01-10",
                        "money_raised": {"value_usd": 1000000},
                        "lead_investors": [{"names": "Y Combinator"}]
                    }
                ]
            })],
        );
        Self {
            items,
            calls: Mutex::new(Vec::new()),
            rate_limited_calls: AtomicUsize::new(0),
        }
    }

    /// 前 `n` 次调用返回429
    fn with_rate_limits(self, n: usize) -> Self {
        self.rate_limited_calls.store(n, Ordering::SeqCst);
        self
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActorRunner for FixtureRunner {
    async fn run_actor(&self, actor_id: &str, input: Value) -> Result<Vec<Value>, ScraperError> {
        self.calls
            .lock()
            .unwrap()
            .push((actor_id.to_string(), input));
        let limited = self
            .rate_limited_calls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if limited {
            return Err(ScraperError::RateLimited {
                actor: actor_id.to_string(),
            });
        }
        Ok(self.items.get(actor_id).cloned().unwrap_or_default())
    }
}

/// 依次调用三个工具并把工具输出拼成报告的Agent
///
/// 与rig的多轮循环一样，工具错误以文本形式交还给模型而不是中断调用。
struct ToolCallingAgent {
    tools: ResearchTools,
}

#[async_trait]
impl ResearchAgent for ToolCallingAgent {
    async fn research(&self, task: &ResearchTask) -> Result<ResearchReport, AgentError> {
        self.tools.take_rate_limit();

        let args = |url: &str| ScrapeArgs {
            url: url.to_string(),
        };
        let as_text = |e: ScraperError| Value::String(e.to_string());

        let website = self
            .tools
            .website
            .call(args("https://acme.example"))
            .await
            .unwrap_or_else(as_text);
        let linkedin = self
            .tools
            .linkedin
            .call(args("https://www.linkedin.com/company/acme"))
            .await
            .unwrap_or_else(as_text);
        let crunchbase = self
            .tools
            .crunchbase
            .call(args("https://www.crunchbase.com/organization/acme"))
            .await
            .unwrap_or_else(as_text);

        let raw_text = format!(
            "# {}\n\n{}\n\nEmployees: {}\n\nRounds: {}",
            task.company_name,
            website["website_data"].as_str().unwrap_or_default(),
            linkedin["employees"],
            crunchbase["funding_timeline"].as_array().map_or(0, Vec::len),
        );

        settle(Ok((raw_text, 314)), self.tools.take_rate_limit())
    }
}

struct RecordingEmitter(Arc<Mutex<Vec<Vec<FundingRound>>>>);

#[async_trait]
impl ReportEmitter for RecordingEmitter {
    async fn emit(
        &self,
        company_name: &str,
        _raw_text: &str,
        timeline: &[FundingRound],
    ) -> Result<Vec<PathBuf>, ResearchError> {
        self.0.lock().unwrap().push(timeline.to_vec());
        Ok(vec![PathBuf::from(format!("{company_name}_report.html"))])
    }
}

struct Fixture {
    _temp_dir: TempDir,
    dataset_path: PathBuf,
    runner: Arc<FixtureRunner>,
    emitted: Arc<Mutex<Vec<Vec<FundingRound>>>>,
    pipeline: Pipeline,
}

fn fixture() -> Fixture {
    fixture_with_rate_limits(0)
}

fn fixture_with_rate_limits(rate_limits: usize) -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.output_dir = temp_dir.path().to_path_buf();
    let dataset_path = config.dataset_path();

    let runner = Arc::new(FixtureRunner::acme(&config).with_rate_limits(rate_limits));
    let capture = TimelineCapture::new();
    let tools = ResearchTools::new(runner.clone(), &config, capture.clone());
    let emitted = Arc::new(Mutex::new(Vec::new()));

    let pipeline = Pipeline::new(
        Box::new(ToolCallingAgent { tools }),
        Box::new(JsonlDataset::new(&dataset_path)),
        Box::new(LogBillingMeter),
        Box::new(RecordingEmitter(emitted.clone())),
        capture,
        RateLimitRetry::new(Duration::from_secs(60)),
    );

    Fixture {
        _temp_dir: temp_dir,
        dataset_path,
        runner,
        emitted,
        pipeline,
    }
}

#[tokio::test]
async fn test_summary_run_writes_one_dataset_line() {
    let fx = fixture();
    let request = ResearchRequest::new("Acme Corp");

    let mut run = ResearchRun::new(request);
    let outcome = run.execute(&fx.pipeline).await.unwrap();

    assert_eq!(run.state(), RunState::Done);
    assert_eq!(outcome.token_usage, 314);

    let content = std::fs::read_to_string(&fx.dataset_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);

    let record: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record["company_name"], "Acme Corp");
    let response = record["response"].as_str().unwrap();
    assert!(response.contains("Acme builds widgets. Founded in 2015."));
    assert!(response.contains("Employees: 120"));
    assert!(response.contains("Rounds: 2"));
    assert_eq!(record.as_object().unwrap().len(), 2);

    assert!(fx.emitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_tools_issue_one_remote_call_each() {
    let fx = fixture();

    ResearchRun::new(ResearchRequest::new("Acme Corp"))
        .execute(&fx.pipeline)
        .await
        .unwrap();

    let calls = fx.runner.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].0, "apify/website-content-crawler");
    assert_eq!(
        calls[0].1,
        json!({"startUrls": [{"url": "https://acme.example"}], "maxPagesPerCrawl": 5})
    );
    assert_eq!(calls[1].1, json!({"url": "https://www.linkedin.com/company/acme"}));
    assert_eq!(calls[2].0, "pratikdani/crunchbase-companies-scraper");
}

#[tokio::test]
async fn test_detailed_run_charts_sorted_timeline() {
    let fx = fixture();
    let request = ResearchRequest::new("Acme Corp").with_depth(ReportDepth::Detailed);

    let outcome = ResearchRun::new(request)
        .execute(&fx.pipeline)
        .await
        .unwrap();

    assert_eq!(outcome.artifacts, vec![PathBuf::from("Acme Corp_report.html")]);

    let emitted = fx.emitted.lock().unwrap();
    assert_eq!(emitted.len(), 1);
    let timeline = &emitted[0];
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].date, "2019-01-10");
    assert_eq!(timeline[0].amount_usd, 1_000_000.0);
    assert_eq!(timeline[0].investors, vec!["Y Combinator".to_string()]);
    assert_eq!(timeline[1].date, "2021-03-01");
}

#[tokio::test]
async fn test_consecutive_runs_append_records() {
    let fx = fixture();

    for company in ["Acme Corp", "Globex"] {
        ResearchRun::new(ResearchRequest::new(company))
            .execute(&fx.pipeline)
            .await
            .unwrap();
    }

    let content = std::fs::read_to_string(&fx.dataset_path).unwrap();
    let companies: Vec<String> = content
        .lines()
        .map(|line| {
            let record: Value = serde_json::from_str(line).unwrap();
            record["company_name"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(companies, vec!["Acme Corp", "Globex"]);
}

#[tokio::test]
async fn test_empty_tool_url_returns_error_output_without_remote_call() {
    let config = Config::default();
    let runner = Arc::new(FixtureRunner::acme(&config));
    let tools = ResearchTools::new(runner.clone(), &config, TimelineCapture::new());

    let output = tools
        .linkedin
        .call(ScrapeArgs {
            url: "   ".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(output, json!({"error": "No LinkedIn URL provided"}));
    assert!(runner.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_scraper_rate_limit_retries_the_run_once() {
    let fx = fixture_with_rate_limits(1);
    let start = tokio::time::Instant::now();

    let mut run = ResearchRun::new(ResearchRequest::new("Acme Corp"));
    let outcome = run.execute(&fx.pipeline).await.unwrap();

    assert_eq!(run.state(), RunState::Done);
    assert!(outcome.record.response.contains("Acme builds widgets."));
    assert!(start.elapsed() >= Duration::from_secs(60));
    // 第一轮三个工具 + 重试一轮三个工具
    assert_eq!(fx.runner.calls().len(), 6);

    let content = std::fs::read_to_string(&fx.dataset_path).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_scraper_rate_limit_on_both_attempts_fails_the_run() {
    let fx = fixture_with_rate_limits(4);

    let mut run = ResearchRun::new(ResearchRequest::new("Acme Corp"));
    let err = run.execute(&fx.pipeline).await.unwrap_err();

    assert_eq!(run.state(), RunState::Failed);
    assert!(matches!(err, ResearchError::Agent(AgentError::RateLimited(_))));
    assert_eq!(fx.runner.calls().len(), 6);
    assert!(!fx.dataset_path.exists());
}
