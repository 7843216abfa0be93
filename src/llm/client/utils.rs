use rig::completion::PromptError;

use crate::error::AgentError;

/// 模型服务返回的限流特征
///
/// 状态码只以 `status 429` / `status code 429` 的形式匹配，
/// 避免把恰好包含这几个数字的其他错误当成限流。
const RATE_LIMIT_MARKERS: [&str; 6] = [
    "ratelimiterror",
    "rate limit",
    "rate_limit",
    "too many requests",
    "status 429",
    "status code 429",
];

/// 在远程调用边界把rig的错误归类为带类型的 [`AgentError`]
///
/// rig 只以文本形式转述provider的错误，因此分类只在这一处进行，
/// 编排层仅匹配 [`AgentError::RateLimited`] 变体。工具遇到的限流见
/// [`RateLimitSignal`](crate::llm::tools::RateLimitSignal)。
pub fn classify_prompt_error(err: PromptError) -> AgentError {
    let message = err.to_string();
    if is_rate_limit_message(&message) {
        AgentError::RateLimited(message)
    } else {
        AgentError::Failed(message)
    }
}

pub fn is_rate_limit_message(message: &str) -> bool {
    let message = message.to_lowercase();
    RATE_LIMIT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}
