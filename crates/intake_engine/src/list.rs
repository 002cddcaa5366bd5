use std::sync::Arc;

use async_trait::async_trait;
use intake_core::{DownloadFilter, PaginationState, PersistedDownloadItem};

use crate::types::StoreError;

/// One page of persisted download items plus the filtered total.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DownloadPage {
    pub items: Vec<PersistedDownloadItem>,
    pub total: u64,
}

/// Read side of the external persistence layer.
#[async_trait]
pub trait DownloadStore: Send + Sync {
    async fn query(
        &self,
        page_index: u32,
        page_size: u32,
        filter: DownloadFilter,
    ) -> Result<DownloadPage, StoreError>;
}

/// Paginated view over the persisted download list.
///
/// Purely delegates to the store; nothing is cached beyond the page that was
/// last fetched.
pub struct DownloadListModel {
    store: Arc<dyn DownloadStore>,
    filter: DownloadFilter,
    pagination: PaginationState,
    items: Vec<PersistedDownloadItem>,
}

impl DownloadListModel {
    pub fn new(store: Arc<dyn DownloadStore>, page_size: u32) -> Self {
        Self {
            store,
            filter: DownloadFilter::Pending,
            pagination: PaginationState {
                page_index: 0,
                page_size,
                total: 0,
            },
            items: Vec::new(),
        }
    }

    pub fn filter(&self) -> DownloadFilter {
        self.filter
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn items(&self) -> &[PersistedDownloadItem] {
        &self.items
    }

    /// Fetch one page and rewrite the pagination state from the result.
    pub async fn fetch_page(&mut self, page_index: u32) -> Result<(), StoreError> {
        let page = self
            .store
            .query(page_index, self.pagination.page_size, self.filter)
            .await?;
        self.pagination = PaginationState {
            page_index,
            page_size: self.pagination.page_size,
            total: page.total,
        };
        self.items = page.items;
        Ok(())
    }

    /// Changing the filter goes back to the first page and re-queries.
    pub async fn set_filter(&mut self, filter: DownloadFilter) -> Result<(), StoreError> {
        self.filter = filter;
        self.fetch_page(0).await
    }

    /// Re-issue the query for the current page index, size and filter.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        self.fetch_page(self.pagination.page_index).await
    }
}
