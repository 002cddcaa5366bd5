//! RON-backed download worklist.
//!
//! Stands in for the full download executor behind the [`DownloadEngine`]
//! seam: accepted items are persisted with a status, and the list side serves
//! filtered pages from the same file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use intake_core::{
    DownloadFilter, DownloadStatus, DownloadType, PersistedDownloadItem, ResolvedItem,
};
use intake_engine::{DownloadEngine, DownloadPage, DownloadStore, EngineRejection, StoreError};
use intake_logging::{intake_info, intake_warn};
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".fetchqueue_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredItem {
    id: u64,
    url: String,
    name: String,
    kind: String,
    headers: String,
    folder: Option<String>,
    status: String,
    added_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoredState {
    next_id: u64,
    items: Vec<StoredItem>,
}

/// File-backed worklist. All mutation goes through one mutex; every change
/// is flushed to disk before the call returns.
pub struct FileStore {
    path: PathBuf,
    state: Mutex<StoredState>,
}

impl FileStore {
    /// Open the state file under `dir`, creating an empty worklist when the
    /// file is missing. Unreadable or unparseable state is logged and
    /// replaced rather than aborting startup.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(STATE_FILENAME);
        let state = match fs::read_to_string(&path) {
            Ok(content) => match ron::from_str(&content) {
                Ok(state) => state,
                Err(err) => {
                    intake_warn!("failed to parse state file {:?}: {}", path, err);
                    StoredState::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoredState::default(),
            Err(err) => {
                intake_warn!("failed to read state file {:?}: {}", path, err);
                StoredState::default()
            }
        };
        intake_info!("download worklist opened at {:?}", path);
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    fn insert(&self, item: ResolvedItem, status: DownloadStatus) -> Result<(), EngineRejection> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| EngineRejection::new("worklist lock poisoned"))?;
        let id = state.next_id;
        state.next_id += 1;
        state.items.push(StoredItem {
            id,
            url: item.url,
            name: item.name,
            kind: item.kind.as_str().to_string(),
            headers: item.headers,
            folder: item.folder,
            status: status_to_str(status).to_string(),
            added_at: Utc::now().to_rfc3339(),
        });
        persist(&self.path, &state).map_err(EngineRejection::new)
    }
}

/// Serialize and atomically replace the state file (write-then-rename).
fn persist(path: &Path, state: &StoredState) -> Result<(), String> {
    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(state, pretty).map_err(|err| err.to_string())?;
    let tmp = path.with_extension("ron.tmp");
    fs::write(&tmp, content).map_err(|err| err.to_string())?;
    fs::rename(&tmp, path).map_err(|err| err.to_string())
}

fn status_to_str(status: DownloadStatus) -> &'static str {
    match status {
        DownloadStatus::Pending => "pending",
        DownloadStatus::Downloading => "downloading",
        DownloadStatus::Completed => "completed",
        DownloadStatus::Failed => "failed",
    }
}

fn status_from_str(text: &str) -> DownloadStatus {
    match text {
        "downloading" => DownloadStatus::Downloading,
        "completed" => DownloadStatus::Completed,
        "failed" => DownloadStatus::Failed,
        _ => DownloadStatus::Pending,
    }
}

fn to_persisted(item: &StoredItem) -> PersistedDownloadItem {
    PersistedDownloadItem {
        id: item.id,
        url: item.url.clone(),
        name: item.name.clone(),
        kind: DownloadType::parse_hint(&item.kind).unwrap_or(DownloadType::Mp4),
        headers: item.headers.clone(),
        folder: item.folder.clone(),
        status: status_from_str(&item.status),
    }
}

#[async_trait]
impl DownloadEngine for FileStore {
    async fn add_item(&self, item: ResolvedItem) -> Result<(), EngineRejection> {
        self.insert(item, DownloadStatus::Pending)
    }

    async fn add_items(&self, items: Vec<ResolvedItem>) -> Result<(), EngineRejection> {
        for item in items {
            self.insert(item, DownloadStatus::Pending)?;
        }
        Ok(())
    }

    async fn download_now(&self, item: ResolvedItem) -> Result<(), EngineRejection> {
        // No execution engine is wired in; the item is parked as in-flight
        // so the pending view picks it up first.
        self.insert(item, DownloadStatus::Downloading)
    }
}

#[async_trait]
impl DownloadStore for FileStore {
    async fn query(
        &self,
        page_index: u32,
        page_size: u32,
        filter: DownloadFilter,
    ) -> Result<DownloadPage, StoreError> {
        let state = self
            .state
            .lock()
            .map_err(|_| StoreError::new("worklist lock poisoned"))?;
        let filtered: Vec<&StoredItem> = state
            .items
            .iter()
            .filter(|item| filter.matches(status_from_str(&item.status)))
            .collect();
        let total = filtered.len() as u64;
        let start = (page_index as usize).saturating_mul(page_size as usize);
        let items = filtered
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .map(|item| to_persisted(item))
            .collect();
        Ok(DownloadPage { items, total })
    }
}
