//! Intake engine: asynchronous enrichment, submission routing and
//! single-instance arbitration around the pure `intake_core` policies.
mod expand;
mod gate;
mod handle;
mod html;
mod list;
mod namer;
mod router;
mod title;
mod types;

pub use expand::{expand_batch, BatchDefaults};
pub use gate::{GateOutcome, InstanceGate};
pub use handle::{IntakeDeps, IntakeEvent, IntakeHandle, SchemeRegistrar};
pub use list::{DownloadListModel, DownloadPage, DownloadStore};
pub use namer::{AlphanumericNamer, RandomNamer};
pub use router::{DownloadEngine, RefreshSink, SubmissionRouter};
pub use title::{HttpTitleResolver, TitleResolver, TitleSettings};
pub use types::{
    EngineRejection, ItemFailure, RegistrarError, StoreError, SubmissionReport, TitleError,
};
