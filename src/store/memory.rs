use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ItemStore, ScanPage, StoreError};
use crate::models::Item;

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// In-process store used for local development and tests.
///
/// Scans are paged exactly like the DynamoDB backend: at most `page_size`
/// items per page, with the last returned key as the continuation token.
#[derive(Clone)]
pub struct MemoryStore {
    items: Arc<RwLock<BTreeMap<String, Item>>>,
    page_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
            page_size: page_size.max(1),
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn get_by_key(&self, uuid: &str) -> Result<Item, StoreError> {
        self.items
            .read()
            .await
            .get(uuid)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                uuid: uuid.to_string(),
            })
    }

    async fn scan_page(&self, start: Option<String>) -> Result<ScanPage, StoreError> {
        let items = self.items.read().await;

        let lower = match start {
            Some(key) => Bound::Excluded(key),
            None => Bound::Unbounded,
        };
        let mut range = items.range::<String, _>((lower, Bound::Unbounded));

        let page: Vec<Item> = range
            .by_ref()
            .take(self.page_size)
            .map(|(_, item)| item.clone())
            .collect();

        let next = if range.next().is_some() {
            page.last().and_then(Item::uuid).map(str::to_string)
        } else {
            None
        };

        Ok(ScanPage { items: page, next })
    }

    async fn put(&self, item: Item) -> Result<(), StoreError> {
        let key = item.uuid().ok_or(StoreError::MissingKey)?.to_string();
        self.items.write().await.insert(key, item);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
