use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use intake_core::{
    decode_activation, resolve_name, ActivationEvent, Coordinator, Disposition, DownloadFilter,
    DownloadRequest, DownloadType, PaginationState, PersistedDownloadItem, ResolvedItem,
};
use intake_logging::{intake_debug, intake_error, intake_warn};
use tokio::sync::Mutex;

use crate::expand::{expand_batch, BatchDefaults};
use crate::list::{DownloadListModel, DownloadStore};
use crate::namer::RandomNamer;
use crate::router::{DownloadEngine, RefreshSink, SubmissionRouter};
use crate::title::TitleResolver;
use crate::types::{RegistrarError, SubmissionReport};

/// Registration of the custom URL scheme with the OS as privileged (secure,
/// standard addressing). Must succeed before activations can reliably fire;
/// the worker performs it before anything else.
pub trait SchemeRegistrar: Send + Sync {
    fn register_privileged(&self, scheme: &str) -> Result<(), RegistrarError>;
}

/// External collaborators and configuration the intake pipeline runs on.
pub struct IntakeDeps {
    pub engine: Arc<dyn DownloadEngine>,
    pub store: Arc<dyn DownloadStore>,
    pub resolver: Arc<dyn TitleResolver>,
    pub namer: Arc<dyn RandomNamer>,
    pub registrar: Arc<dyn SchemeRegistrar>,
    pub scheme: String,
    pub page_size: u32,
}

/// Events the pipeline hands back to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeEvent {
    /// Pre-fill the interactive form (the `openModal` hook into the
    /// excluded UI layer).
    OpenForm(DownloadRequest),
    /// The OS would not take the scheme registration; deep links may not be
    /// delivered until the operator intervenes.
    RegistrationFailed {
        scheme: String,
        error: RegistrarError,
    },
    /// A submission batch settled; per-item failures are in the report.
    Submitted(SubmissionReport),
    /// The list view model re-queried; the current page is attached.
    Refreshed {
        items: Vec<PersistedDownloadItem>,
        pagination: PaginationState,
    },
}

enum IntakeCommand {
    Activation(ActivationEvent),
    Ready,
    Submit {
        request: DownloadRequest,
        immediate: bool,
    },
    SubmitBatch {
        block: String,
        kind: Option<DownloadType>,
        headers: String,
        immediate: bool,
    },
    SetFilter(DownloadFilter),
    FetchPage(u32),
}

/// Synchronous facade over the intake pipeline.
///
/// Owns a worker thread with its own tokio runtime; commands go in and
/// events come out over plain mpsc channels, so the (excluded) presentation
/// layer never touches async code. Commands are processed strictly in order.
pub struct IntakeHandle {
    cmd_tx: mpsc::Sender<IntakeCommand>,
    event_rx: mpsc::Receiver<IntakeEvent>,
}

impl IntakeHandle {
    pub fn new(deps: IntakeDeps) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    intake_error!("intake runtime failed to start: {err}");
                    return;
                }
            };
            let mut worker = Worker::new(deps, event_tx);
            worker.register_scheme();
            while let Ok(command) = cmd_rx.recv() {
                runtime.block_on(worker.handle(command));
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Feed one activation event. Buffered until [`IntakeHandle::ready`].
    pub fn activation(&self, event: ActivationEvent) {
        let _ = self.cmd_tx.send(IntakeCommand::Activation(event));
    }

    /// Initialization is complete; buffered activations replay now, FIFO.
    pub fn ready(&self) {
        let _ = self.cmd_tx.send(IntakeCommand::Ready);
    }

    /// Submit a single confirmed form request.
    pub fn submit(&self, request: DownloadRequest, immediate: bool) {
        let _ = self.cmd_tx.send(IntakeCommand::Submit { request, immediate });
    }

    /// Submit a multi-line batch block with shared type and headers.
    pub fn submit_batch(
        &self,
        block: impl Into<String>,
        kind: Option<DownloadType>,
        headers: impl Into<String>,
        immediate: bool,
    ) {
        let _ = self.cmd_tx.send(IntakeCommand::SubmitBatch {
            block: block.into(),
            kind,
            headers: headers.into(),
            immediate,
        });
    }

    pub fn set_filter(&self, filter: DownloadFilter) {
        let _ = self.cmd_tx.send(IntakeCommand::SetFilter(filter));
    }

    pub fn fetch_page(&self, page_index: u32) {
        let _ = self.cmd_tx.send(IntakeCommand::FetchPage(page_index));
    }

    pub fn try_recv(&self) -> Option<IntakeEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<IntakeEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

struct Worker {
    coordinator: Coordinator,
    router: SubmissionRouter,
    refresh: Arc<dyn RefreshSink>,
    model: Arc<Mutex<DownloadListModel>>,
    resolver: Arc<dyn TitleResolver>,
    namer: Arc<dyn RandomNamer>,
    registrar: Arc<dyn SchemeRegistrar>,
    scheme: String,
    event_tx: mpsc::Sender<IntakeEvent>,
}

impl Worker {
    fn new(deps: IntakeDeps, event_tx: mpsc::Sender<IntakeEvent>) -> Self {
        let model = Arc::new(Mutex::new(DownloadListModel::new(
            deps.store,
            deps.page_size,
        )));
        let refresh = Arc::new(ModelRefresh {
            model: model.clone(),
            event_tx: event_tx.clone(),
        });
        let router = SubmissionRouter::new(deps.engine);
        let mut coordinator = Coordinator::new();
        coordinator.begin_acquire();

        Self {
            coordinator,
            router,
            refresh,
            model,
            resolver: deps.resolver,
            namer: deps.namer,
            registrar: deps.registrar,
            scheme: deps.scheme,
            event_tx,
        }
    }

    fn register_scheme(&self) {
        if let Err(err) = self.registrar.register_privileged(&self.scheme) {
            intake_error!("scheme registration for {} failed: {err}", self.scheme);
            let _ = self.event_tx.send(IntakeEvent::RegistrationFailed {
                scheme: self.scheme.clone(),
                error: err,
            });
        }
    }

    /// Route a settled batch: the report goes out first, then the refresh
    /// hook fires exactly once, so the presentation layer always sees the
    /// submission outcome before the page update.
    async fn submit(&self, items: Vec<ResolvedItem>, immediate: bool) {
        let report = self.router.submit(items, immediate).await;
        let _ = self.event_tx.send(IntakeEvent::Submitted(report));
        self.refresh.refresh().await;
    }

    async fn handle(&mut self, command: IntakeCommand) {
        match command {
            IntakeCommand::Activation(event) => {
                if let Some(event) = self.coordinator.offer(event) {
                    self.dispatch_activation(event).await;
                }
            }
            IntakeCommand::Ready => {
                for event in self.coordinator.mark_ready() {
                    self.dispatch_activation(event).await;
                }
            }
            IntakeCommand::Submit { request, immediate } => {
                let item = self.enrich(request).await;
                self.submit(vec![item], immediate).await;
            }
            IntakeCommand::SubmitBatch {
                block,
                kind,
                headers,
                immediate,
            } => {
                let defaults = BatchDefaults { kind, headers };
                let items = expand_batch(
                    &block,
                    &defaults,
                    self.resolver.as_ref(),
                    self.namer.as_ref(),
                )
                .await;
                self.submit(items, immediate).await;
            }
            IntakeCommand::SetFilter(filter) => {
                let mut model = self.model.lock().await;
                match model.set_filter(filter).await {
                    Ok(()) => send_page(&self.event_tx, &model),
                    Err(err) => intake_warn!("list query failed: {err}"),
                }
            }
            IntakeCommand::FetchPage(page_index) => {
                let mut model = self.model.lock().await;
                match model.fetch_page(page_index).await {
                    Ok(()) => send_page(&self.event_tx, &model),
                    Err(err) => intake_warn!("list query failed: {err}"),
                }
            }
        }
    }

    async fn dispatch_activation(&self, event: ActivationEvent) {
        match decode_activation(&event, || self.namer.random_name()) {
            None => {
                intake_debug!("activation carried no download intent: {}", event.raw_url);
            }
            Some(intent) => match intent.disposition {
                Disposition::Interactive => {
                    let _ = self.event_tx.send(IntakeEvent::OpenForm(intent.request));
                }
                Disposition::Silent => {
                    let item = self.finalize(intent.request);
                    self.submit(vec![item], true).await;
                }
            },
        }
    }

    /// Form-path enrichment: fetch the page title, then settle name and type.
    async fn enrich(&self, request: DownloadRequest) -> ResolvedItem {
        let title = match self.resolver.resolve(&request.url).await {
            Ok(title) => Some(title),
            Err(err) => {
                intake_warn!("title resolution failed for {}: {}", request.url, err);
                None
            }
        };
        let name = resolve_name(request.name.as_deref(), title.as_deref(), || {
            self.namer.random_name()
        });
        let kind = request
            .kind
            .unwrap_or_else(|| DownloadType::infer(&request.url));
        ResolvedItem {
            url: request.url,
            name,
            kind,
            headers: request.headers,
            folder: request.folder,
        }
    }

    /// Silent-path finish: the decoder already settled the name; fill any
    /// remaining gap without a title fetch.
    fn finalize(&self, request: DownloadRequest) -> ResolvedItem {
        let name = resolve_name(request.name.as_deref(), None, || self.namer.random_name());
        let kind = request
            .kind
            .unwrap_or_else(|| DownloadType::infer(&request.url));
        ResolvedItem {
            url: request.url,
            name,
            kind,
            headers: request.headers,
            folder: request.folder,
        }
    }
}

fn send_page(event_tx: &mpsc::Sender<IntakeEvent>, model: &DownloadListModel) {
    let _ = event_tx.send(IntakeEvent::Refreshed {
        items: model.items().to_vec(),
        pagination: model.pagination(),
    });
}

struct ModelRefresh {
    model: Arc<Mutex<DownloadListModel>>,
    event_tx: mpsc::Sender<IntakeEvent>,
}

#[async_trait::async_trait]
impl RefreshSink for ModelRefresh {
    async fn refresh(&self) {
        let mut model = self.model.lock().await;
        match model.refresh().await {
            Ok(()) => send_page(&self.event_tx, &model),
            Err(err) => intake_warn!("list refresh failed: {err}"),
        }
    }
}
