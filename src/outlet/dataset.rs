//! 追加写入的输出数据集

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::OutletError;
use crate::scraper::ApifyClient;
use crate::types::PersistedRecord;

/// 输出数据集，只支持追加
#[async_trait]
pub trait DatasetSink: Send + Sync {
    async fn push(&self, record: &PersistedRecord) -> Result<(), OutletError>;
}

/// 本地 JSON Lines 数据集，每条记录一行
pub struct JsonlDataset {
    path: PathBuf,
}

impl JsonlDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetSink for JsonlDataset {
    async fn push(&self, record: &PersistedRecord) -> Result<(), OutletError> {
        let io_err = |source| OutletError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;

        debug!(path = %self.path.display(), "record appended");
        Ok(())
    }
}

/// 平台上的默认数据集
pub struct PlatformDataset {
    client: ApifyClient,
    dataset_id: String,
}

impl PlatformDataset {
    pub fn new(client: ApifyClient, dataset_id: impl Into<String>) -> Self {
        Self {
            client,
            dataset_id: dataset_id.into(),
        }
    }
}

#[async_trait]
impl DatasetSink for PlatformDataset {
    async fn push(&self, record: &PersistedRecord) -> Result<(), OutletError> {
        let response = self
            .client
            .post(&format!("/v2/datasets/{}/items", self.dataset_id))
            .json(&[record])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OutletError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

/// 本地数据集加若干远程数据集
///
/// 先写远程，全部成功后才追加本地记录；任一远程失败时本地不留记录。
pub struct TeeDataset {
    local: JsonlDataset,
    remotes: Vec<Box<dyn DatasetSink>>,
}

impl TeeDataset {
    pub fn new(local: JsonlDataset, remotes: Vec<Box<dyn DatasetSink>>) -> Self {
        Self { local, remotes }
    }
}

#[async_trait]
impl DatasetSink for TeeDataset {
    async fn push(&self, record: &PersistedRecord) -> Result<(), OutletError> {
        for sink in &self.remotes {
            sink.push(record).await?;
        }
        self.local.push(record).await
    }
}
