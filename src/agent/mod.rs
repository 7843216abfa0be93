//! 研究Agent边界
//!
//! 编排层只通过 [`ResearchAgent`] 与Agent交互：给出一个研究任务，拿回叙述文本与
//! token用量。Agent内部调用哪些工具、调用几次、以什么顺序调用，都不可见。

use async_trait::async_trait;

use crate::error::AgentError;
use crate::types::ResearchReport;

/// Agent角色
pub const ROLE: &str = "Business Intelligence Researcher";

/// Agent目标
pub const GOAL: &str = "Collect and analyze detailed company data for actionable insights.";

/// Agent背景设定
pub const BACKSTORY: &str = "I specialize in business intelligence, researching companies to reveal insights about their focus areas, products, funding history, executives, competitors, and online presence for strategic decision-making.";

/// 期望输出
pub const EXPECTED_OUTPUT: &str = "A detailed, structured report with insights about the company.";

/// 绑定到某一家公司的研究任务
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchTask {
    pub company_name: String,
    pub description: String,
    pub expected_output: String,
}

impl ResearchTask {
    pub fn for_company(company_name: &str) -> Self {
        Self {
            company_name: company_name.to_string(),
            description: format!(
                "Gather comprehensive data about the company \"{}\" including focus areas, products, funding, key personnel, competitors, and social media presence.",
                company_name
            ),
            expected_output: EXPECTED_OUTPUT.to_string(),
        }
    }

    /// 发送给模型的用户提示词
    pub fn prompt(&self) -> String {
        format!(
            "{}\n\nExpected output: {}",
            self.description, self.expected_output
        )
    }
}

/// 由角色、目标与背景设定组成的系统提示词
pub fn system_prompt() -> String {
    format!(
        "You are a {ROLE}.\n{BACKSTORY}\n\nYour personal goal is: {GOAL}\n\nUse the available tools to collect data from the company's official website, its LinkedIn company page and its Crunchbase organization profile whenever you can determine the URLs. When a tool returns an error, continue with the information you have. Write the final answer as a Markdown report."
    )
}

/// 研究Agent能力边界
#[async_trait]
pub trait ResearchAgent: Send + Sync {
    async fn research(&self, task: &ResearchTask) -> Result<ResearchReport, AgentError>;
}
