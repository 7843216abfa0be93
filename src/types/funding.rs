use serde::{Deserialize, Serialize};

/// 一轮融资事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRound {
    /// 公告日期，原样透传（期望为 YYYY-MM-DD，但不做校验）
    pub date: String,
    /// 融资金额（美元），缺失或无法解析时为0
    pub amount_usd: f64,
    /// 领投方名称
    pub investors: Vec<String>,
}
