//! 结果输出：数据集记录与计费事件

pub mod billing;
pub mod dataset;

pub use billing::{BillingMeter, ChargeEvent, LogBillingMeter, PlatformBillingMeter};
pub use dataset::{DatasetSink, JsonlDataset, PlatformDataset, TeeDataset};
