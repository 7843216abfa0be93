use anyhow::Result;
use clap::Parser;

use company_research::{cli, launch, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let request = args.to_request()?;
    let config = args.into_config()?;
    logging::init(config.verbose)?;

    launch(&config, request).await?;
    Ok(())
}
