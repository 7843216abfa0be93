use serde::{Deserialize, Serialize};

/// 研究Agent产出的报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    /// 原始叙述文本（轻量Markdown）
    pub raw_text: String,
    /// 消耗的token总数
    pub token_usage: u64,
}

/// 写入输出数据集的记录，每次成功运行一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub company_name: String,
    pub response: String,
}

impl PersistedRecord {
    pub fn new(company_name: &str, report: &ResearchReport) -> Self {
        Self {
            company_name: company_name.to_string(),
            response: report.raw_text.clone(),
        }
    }
}
