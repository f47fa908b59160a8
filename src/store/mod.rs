//! Item store access
//!
//! All handlers talk to the backing table through [`ItemStore`]. The store is
//! built once per process by [`connect`] and shared across invocations.

pub mod dynamo;
pub mod memory;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{Config, StoreBackend};
use crate::models::Item;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No item found with uuid {uuid}")]
    NotFound { uuid: String },

    #[error("Item has no uuid attribute")]
    MissingKey,

    #[error("{0}")]
    Backend(String),

    #[error("Failed to convert item attributes: {0}")]
    Codec(String),
}

/// One bounded page of a scan
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<Item>,
    /// Key of the last item evaluated, `None` once the scan is exhausted
    pub next: Option<String>,
}

/// Single-table key-value store keyed by `uuid`
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Fetch exactly one item, failing with [`StoreError::NotFound`] if absent
    async fn get_by_key(&self, uuid: &str) -> Result<Item, StoreError>;

    /// Read one page of a full-table scan, resuming after `start` when given
    async fn scan_page(&self, start: Option<String>) -> Result<ScanPage, StoreError>;

    /// Insert or overwrite an item by its key. Last write wins.
    async fn put(&self, item: Item) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    /// Every item in the store.
    ///
    /// Follows continuation tokens until the scan is exhausted and flattens
    /// the pages in the order the backend returned them.
    async fn get_all(&self) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut start = None;
        let mut pages = 0usize;

        loop {
            let page = self.scan_page(start.take()).await?;
            pages += 1;
            items.extend(page.items);

            match page.next {
                Some(next) => start = Some(next),
                None => break,
            }
        }

        tracing::debug!("Scanned {} items across {} pages", items.len(), pages);
        Ok(items)
    }
}

/// Build the store selected by the configuration
pub async fn connect(config: &Config) -> Result<Arc<dyn ItemStore>> {
    match config.store_backend {
        StoreBackend::DynamoDb => {
            let store = DynamoStore::from_config(config).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; items will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Store double whose every call fails, for exercising error paths
#[cfg(test)]
pub(crate) struct FailingStore;

#[cfg(test)]
#[async_trait]
impl ItemStore for FailingStore {
    async fn get_by_key(&self, _uuid: &str) -> Result<Item, StoreError> {
        Err(StoreError::Backend("ProvisionedThroughputExceededException".to_string()))
    }

    async fn scan_page(&self, _start: Option<String>) -> Result<ScanPage, StoreError> {
        Err(StoreError::Backend("ProvisionedThroughputExceededException".to_string()))
    }

    async fn put(&self, _item: Item) -> Result<(), StoreError> {
        Err(StoreError::Backend("AccessDeniedException".to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}
