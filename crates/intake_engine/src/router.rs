use std::sync::Arc;

use async_trait::async_trait;
use intake_core::ResolvedItem;
use intake_logging::intake_warn;

use crate::types::{EngineRejection, ItemFailure, SubmissionReport};

/// Queue and immediate-execution surface of the external download engine.
#[async_trait]
pub trait DownloadEngine: Send + Sync {
    /// Add one item to the persisted worklist.
    async fn add_item(&self, item: ResolvedItem) -> Result<(), EngineRejection>;
    /// Queue several items at once; the engine may batch internally.
    async fn add_items(&self, items: Vec<ResolvedItem>) -> Result<(), EngineRejection>;
    /// Hand one item straight to the execution engine.
    async fn download_now(&self, item: ResolvedItem) -> Result<(), EngineRejection>;
}

/// Hook into the excluded list-rendering layer, fired by the intake worker
/// after a submission batch's report has been emitted.
#[async_trait]
pub trait RefreshSink: Send + Sync {
    async fn refresh(&self);
}

/// Routes resolved items to the queued-add or immediate-download path.
pub struct SubmissionRouter {
    engine: Arc<dyn DownloadEngine>,
}

impl SubmissionRouter {
    pub fn new(engine: Arc<dyn DownloadEngine>) -> Self {
        Self { engine }
    }

    /// Submit a batch. Per-item rejections are recorded in the report and
    /// never roll back or block siblings.
    pub async fn submit(&self, items: Vec<ResolvedItem>, immediate: bool) -> SubmissionReport {
        let mut report = SubmissionReport::default();

        if immediate {
            // One engine call per item so a rejection cannot block siblings.
            for (index, item) in items.into_iter().enumerate() {
                let url = item.url.clone();
                match self.engine.download_now(item).await {
                    Ok(()) => report.accepted += 1,
                    Err(err) => {
                        intake_warn!("immediate download rejected for {url}: {err}");
                        report.failures.push(ItemFailure {
                            index,
                            url,
                            message: err.to_string(),
                        });
                    }
                }
            }
        } else {
            match items.len() {
                0 => {}
                1 => {
                    let mut items = items;
                    let item = items.remove(0);
                    let url = item.url.clone();
                    match self.engine.add_item(item).await {
                        Ok(()) => report.accepted += 1,
                        Err(err) => {
                            intake_warn!("queue add rejected for {url}: {err}");
                            report.failures.push(ItemFailure {
                                index: 0,
                                url,
                                message: err.to_string(),
                            });
                        }
                    }
                }
                _ => {
                    let urls: Vec<String> = items.iter().map(|item| item.url.clone()).collect();
                    match self.engine.add_items(items).await {
                        Ok(()) => report.accepted += urls.len(),
                        Err(err) => {
                            intake_warn!("queue add rejected for batch of {}: {err}", urls.len());
                            let message = err.to_string();
                            report
                                .failures
                                .extend(urls.into_iter().enumerate().map(|(index, url)| {
                                    ItemFailure {
                                        index,
                                        url,
                                        message: message.clone(),
                                    }
                                }));
                        }
                    }
                }
            }
        }

        report
    }
}
