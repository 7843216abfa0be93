//! 研究工作流编排
//!
//! 一次运行：校验输入 → 计费 `actor-start` → 执行研究Agent（限流时重试一次）
//! → 记录token用量 → 计费 `task-completed` → `detailed` 深度下输出文档与图表
//! → 写入数据集。

pub mod retry;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::agent::{ResearchAgent, ResearchTask};
use crate::config::Config;
use crate::error::ResearchError;
use crate::llm::client::RigResearchAgent;
use crate::llm::tools::ResearchTools;
use crate::outlet::{
    BillingMeter, ChargeEvent, DatasetSink, JsonlDataset, LogBillingMeter, PlatformBillingMeter,
    PlatformDataset, TeeDataset,
};
use crate::report::{FileReportEmitter, ReportEmitter};
use crate::scraper::{ApifyClient, TimelineCapture};
use crate::types::{PersistedRecord, ReportDepth, ResearchRequest};

pub use retry::RateLimitRetry;

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Done,
    Failed,
}

/// 成功运行的产出
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub record: PersistedRecord,
    pub token_usage: u64,
    /// `detailed` 深度下写入的文档与图表
    pub artifacts: Vec<PathBuf>,
}

/// 一次运行所需的全部协作者
pub struct Pipeline {
    agent: Box<dyn ResearchAgent>,
    dataset: Box<dyn DatasetSink>,
    billing: Box<dyn BillingMeter>,
    emitter: Box<dyn ReportEmitter>,
    timeline: TimelineCapture,
    retry: RateLimitRetry,
}

impl Pipeline {
    pub fn new(
        agent: Box<dyn ResearchAgent>,
        dataset: Box<dyn DatasetSink>,
        billing: Box<dyn BillingMeter>,
        emitter: Box<dyn ReportEmitter>,
        timeline: TimelineCapture,
        retry: RateLimitRetry,
    ) -> Self {
        Self {
            agent,
            dataset,
            billing,
            emitter,
            timeline,
            retry,
        }
    }

    /// 按配置组装生产环境的协作者
    ///
    /// 凭据缺失时在构造任何客户端之前返回错误。
    pub fn from_config(config: &Config, request: &ResearchRequest) -> Result<Self, ResearchError> {
        config.validate()?;

        let client = ApifyClient::new(&config.scraper)?;
        let timeline = TimelineCapture::new();
        let tools = ResearchTools::new(Arc::new(client.clone()), config, timeline.clone());
        let agent = RigResearchAgent::new(&config.llm, &request.model_name, tools)?;

        let mut remotes: Vec<Box<dyn DatasetSink>> = Vec::new();
        if config.outlet.push_to_platform
            && let Some(dataset_id) = &config.outlet.dataset_id
        {
            remotes.push(Box::new(PlatformDataset::new(client.clone(), dataset_id)));
        }
        let dataset = TeeDataset::new(JsonlDataset::new(config.dataset_path()), remotes);

        let billing: Box<dyn BillingMeter> = match &config.outlet.actor_run_id {
            Some(run_id) => Box::new(PlatformBillingMeter::new(client, run_id)),
            None => Box::new(LogBillingMeter),
        };

        Ok(Self::new(
            Box::new(agent),
            Box::new(dataset),
            billing,
            Box::new(FileReportEmitter::new(config)),
            timeline,
            RateLimitRetry::from_config(&config.retry),
        ))
    }

    async fn execute(&self, request: &ResearchRequest) -> Result<RunOutcome, ResearchError> {
        request.validate()?;
        self.timeline.clear();
        self.billing.charge(ChargeEvent::ActorStart).await?;

        let task = ResearchTask::for_company(&request.company_name);
        let report = self.retry.run(|| self.agent.research(&task)).await?;

        info!("Total tokens used: {}", report.token_usage);
        self.billing.charge(ChargeEvent::TaskCompleted).await?;

        let artifacts = match request.report_depth {
            ReportDepth::Detailed => {
                self.emitter
                    .emit(
                        &request.company_name,
                        &report.raw_text,
                        &self.timeline.latest(),
                    )
                    .await?
            }
            ReportDepth::Summary => Vec::new(),
        };

        let record = PersistedRecord::new(&request.company_name, &report);
        self.dataset.push(&record).await?;
        info!("Company research data pushed to the dataset successfully!");

        Ok(RunOutcome {
            record,
            token_usage: report.token_usage,
            artifacts,
        })
    }
}

/// 一次端到端运行
#[derive(Debug)]
pub struct ResearchRun {
    id: Uuid,
    request: ResearchRequest,
    state: RunState,
}

impl ResearchRun {
    pub fn new(request: ResearchRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            state: RunState::Running,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn request(&self) -> &ResearchRequest {
        &self.request
    }

    /// 执行运行，结束后状态为 `Done` 或 `Failed`
    pub async fn execute(&mut self, pipeline: &Pipeline) -> Result<RunOutcome, ResearchError> {
        let span = info_span!(
            "research_run",
            run_id = %self.id,
            company = %self.request.company_name,
            depth = %self.request.report_depth,
        );

        let result = pipeline.execute(&self.request).instrument(span).await;
        self.state = match &result {
            Ok(_) => RunState::Done,
            Err(e) => {
                error!(run_id = %self.id, error = %e, "research run failed");
                RunState::Failed
            }
        };
        result
    }
}

/// 启动公司研究工作流
pub async fn launch(config: &Config, request: ResearchRequest) -> Result<RunOutcome> {
    request.validate()?;
    let pipeline = Pipeline::from_config(config, &request)?;

    println!("🚀 开始研究公司: {}", request.company_name);
    let mut run = ResearchRun::new(request);
    let outcome = run.execute(&pipeline).await?;

    println!(
        "✓ 研究完成，消耗 {} tokens，结果已写入 {}",
        outcome.token_usage,
        config.dataset_path().display()
    );
    for artifact in &outcome.artifacts {
        println!("📄 {}", artifact.display());
    }

    Ok(outcome)
}
