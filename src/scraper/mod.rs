//! 抓取平台访问层
//!
//! [`ActorRunner`] 是对远程抓取服务的一次性调用抽象，[`fetchers`] 在其上
//! 实现官网、LinkedIn、Crunchbase 三个数据获取器。

pub mod client;
pub mod fetchers;

pub use client::{ActorRunner, ApifyClient};
pub use fetchers::{CrunchbaseFetcher, LinkedInFetcher, TimelineCapture, WebsiteFetcher};
