pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod funding;
pub mod llm;
pub mod logging;
pub mod outlet;
pub mod report;
pub mod scraper;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use config::Config;
pub use error::{ResearchError, Result};
pub use types::{ReportDepth, ResearchRequest};
pub use workflow::launch;
