use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use intake_core::{DownloadFilter, DownloadStatus, DownloadType, PersistedDownloadItem};
use intake_engine::{DownloadListModel, DownloadPage, DownloadStore, StoreError};
use pretty_assertions::assert_eq;

/// Serves a fixed filtered list and records every query it receives.
struct RecordingStore {
    queries: Mutex<Vec<(u32, u32, DownloadFilter)>>,
    items: Vec<PersistedDownloadItem>,
}

impl RecordingStore {
    fn with_items(count: u64) -> Self {
        let items = (0..count)
            .map(|id| PersistedDownloadItem {
                id,
                url: format!("http://a.example/{id}"),
                name: format!("clip-{id}"),
                kind: DownloadType::Mp4,
                headers: String::new(),
                folder: None,
                status: DownloadStatus::Pending,
            })
            .collect();
        Self {
            queries: Mutex::new(Vec::new()),
            items,
        }
    }

    fn queries(&self) -> Vec<(u32, u32, DownloadFilter)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadStore for RecordingStore {
    async fn query(
        &self,
        page_index: u32,
        page_size: u32,
        filter: DownloadFilter,
    ) -> Result<DownloadPage, StoreError> {
        self.queries
            .lock()
            .unwrap()
            .push((page_index, page_size, filter));
        let start = (page_index as usize) * (page_size as usize);
        let items = self
            .items
            .iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok(DownloadPage {
            items,
            total: self.items.len() as u64,
        })
    }
}

#[tokio::test]
async fn fetch_page_populates_items_and_total() {
    let store = Arc::new(RecordingStore::with_items(7));
    let mut model = DownloadListModel::new(store.clone(), 3);

    model.fetch_page(0).await.expect("query ok");

    assert_eq!(model.items().len(), 3);
    assert_eq!(model.pagination().total, 7);
    assert_eq!(model.pagination().page_index, 0);
    assert_eq!(store.queries(), vec![(0, 3, DownloadFilter::Pending)]);
}

#[tokio::test]
async fn last_page_is_partial() {
    let store = Arc::new(RecordingStore::with_items(7));
    let mut model = DownloadListModel::new(store, 3);

    model.fetch_page(2).await.expect("query ok");

    assert_eq!(model.items().len(), 1);
    assert_eq!(model.items()[0].id, 6);
    assert_eq!(model.pagination().page_index, 2);
}

#[tokio::test]
async fn changing_filter_returns_to_first_page() {
    let store = Arc::new(RecordingStore::with_items(10));
    let mut model = DownloadListModel::new(store.clone(), 4);

    model.fetch_page(2).await.expect("query ok");
    model
        .set_filter(DownloadFilter::Completed)
        .await
        .expect("query ok");

    assert_eq!(model.filter(), DownloadFilter::Completed);
    assert_eq!(model.pagination().page_index, 0);
    assert_eq!(
        store.queries(),
        vec![
            (2, 4, DownloadFilter::Pending),
            (0, 4, DownloadFilter::Completed),
        ]
    );
}

#[tokio::test]
async fn refresh_reissues_the_identical_query() {
    let store = Arc::new(RecordingStore::with_items(10));
    let mut model = DownloadListModel::new(store.clone(), 4);

    model.fetch_page(1).await.expect("query ok");
    model.refresh().await.expect("query ok");

    assert_eq!(
        store.queries(),
        vec![
            (1, 4, DownloadFilter::Pending),
            (1, 4, DownloadFilter::Pending),
        ]
    );
}

#[tokio::test]
async fn failed_query_surfaces_the_store_error() {
    struct FailingStore;

    #[async_trait]
    impl DownloadStore for FailingStore {
        async fn query(
            &self,
            _page_index: u32,
            _page_size: u32,
            _filter: DownloadFilter,
        ) -> Result<DownloadPage, StoreError> {
            Err(StoreError::new("disk unplugged"))
        }
    }

    let mut model = DownloadListModel::new(Arc::new(FailingStore), 4);
    let err = model.fetch_page(0).await.unwrap_err();
    assert_eq!(err, StoreError::new("disk unplugged"));
}
