pub mod fetch;
pub mod funding;
pub mod report;
pub mod request;

pub use fetch::{FetchResult, Source};
pub use funding::FundingRound;
pub use report::{PersistedRecord, ResearchReport};
pub use request::{ReportDepth, ResearchRequest};
