//! 报告输出：样式化文档与融资时间线图表
//!
//! 仅在 `detailed` 深度下调用。输出文件名由公司名插入固定模板得到。

pub mod chart;
pub mod document;

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::error::ResearchError;
use crate::types::FundingRound;

pub use chart::{chart_points, plot_chart_points, plot_funding_timeline};
pub use document::DocumentRenderer;

/// 把公司名中的路径分隔符替换掉，避免写出输出目录
pub fn file_stem(company_name: &str) -> String {
    company_name.trim().replace(['/', '\\'], "_")
}

pub fn chart_file_name(company_name: &str) -> String {
    format!("{}_funding_timeline.png", file_stem(company_name))
}

/// 报告输出器
#[async_trait]
pub trait ReportEmitter: Send + Sync {
    /// 输出文档与图表，返回写入的文件路径
    async fn emit(
        &self,
        company_name: &str,
        raw_text: &str,
        timeline: &[FundingRound],
    ) -> Result<Vec<PathBuf>, ResearchError>;
}

/// 写入本地输出目录的报告输出器
pub struct FileReportEmitter {
    output_dir: PathBuf,
    document: DocumentRenderer,
    chart_size: (u32, u32),
}

impl FileReportEmitter {
    pub fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            document: DocumentRenderer::new(&config.report.pdf_engine),
            chart_size: (config.report.chart_width, config.report.chart_height),
        }
    }
}

#[async_trait]
impl ReportEmitter for FileReportEmitter {
    async fn emit(
        &self,
        company_name: &str,
        raw_text: &str,
        timeline: &[FundingRound],
    ) -> Result<Vec<PathBuf>, ResearchError> {
        // 日期先行校验，非法日期时不写出任何文件
        let points = chart_points(timeline)?;

        let document = self
            .document
            .render(raw_text, company_name, &self.output_dir)
            .await?;
        info!(path = %document.display(), "report document written");

        let chart_path = self.output_dir.join(chart_file_name(company_name));
        plot_chart_points(&points, company_name, &chart_path, self.chart_size)?;
        info!(path = %chart_path.display(), rounds = timeline.len(), "funding chart written");

        Ok(vec![document, chart_path])
    }
}
