//! 日志初始化

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

/// 初始化全局tracing订阅者，`RUST_LOG` 设置时优先生效
pub fn init(verbose: bool) -> Result<()> {
    let filter = if verbose {
        "company_research=debug"
    } else {
        "company_research=info"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    Ok(())
}
