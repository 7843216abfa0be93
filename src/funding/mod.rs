//! 融资时间线归一化
//!
//! 把融资数据库返回的原始 `funding_rounds_list` 映射为 [`FundingRound`] 序列，
//! 并按日期字符串做稳定的字典序排序。日期不做解析，格式不规范的日期按文本位置排序。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::NormalizeError;
use crate::types::FundingRound;

/// 轮次解析失败时的处理策略
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoundPolicy {
    /// 丢弃解析失败的轮次，其余轮次保持相对顺序
    #[default]
    Lenient,
    /// 任何一轮解析失败即整体失败
    Strict,
}

/// 归一化融资轮次
///
/// `raw` 为 `None` 或不是数组时视为没有融资记录。
pub fn normalize_funding_rounds(
    raw: Option<&Value>,
    policy: RoundPolicy,
) -> Result<Vec<FundingRound>, NormalizeError> {
    let rounds = match raw.and_then(Value::as_array) {
        Some(rounds) => rounds,
        None => return Ok(Vec::new()),
    };

    let mut timeline = Vec::with_capacity(rounds.len());
    for (index, round) in rounds.iter().enumerate() {
        match extract_round(round) {
            Ok(round) => timeline.push(round),
            Err(reason) => match policy {
                RoundPolicy::Lenient => {
                    debug!(index, %reason, "dropping malformed funding round");
                }
                RoundPolicy::Strict => {
                    return Err(NormalizeError::MalformedRound { index, reason });
                }
            },
        }
    }

    // sort_by 是稳定排序，同日期轮次保持原有顺序
    timeline.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(timeline)
}

fn extract_round(round: &Value) -> Result<FundingRound, String> {
    let round = round
        .as_object()
        .ok_or_else(|| "round is not an object".to_string())?;

    let date = match round.get("announced_on") {
        Some(Value::String(date)) => date.clone(),
        Some(other) => return Err(format!("announced_on is not a string: {}", other)),
        None => return Err("announced_on is missing".to_string()),
    };

    let amount_usd = match round.get("money_raised") {
        None => 0.0,
        Some(Value::Object(money)) => money.get("value_usd").map(parse_amount).unwrap_or(0.0),
        Some(other) => return Err(format!("money_raised is not an object: {}", other)),
    };

    let investors = match round.get("lead_investors") {
        None => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(extract_investor_name)
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => return Err(format!("lead_investors is not a list: {}", other)),
    };

    Ok(FundingRound {
        date,
        amount_usd,
        investors,
    })
}

fn parse_amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn extract_investor_name(entry: &Value) -> Result<String, String> {
    let entry = entry
        .as_object()
        .ok_or_else(|| format!("lead investor is not an object: {}", entry))?;

    entry
        .get("names")
        .or_else(|| entry.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| "lead investor has no name".to_string())
}
