//! Intake core: pure download-request policy and coordination state machines.
mod batch;
mod classify;
mod deeplink;
mod instance;
mod model;
mod name;

pub use batch::{parse_batch, BatchLine};
pub use deeplink::{
    decode_activation, decode_scheme, decode_search, DeepLinkIntent, DeepLinkSource, Disposition,
};
pub use instance::{scheme_url_from_argv, Coordinator, GatePhase};
pub use model::{
    ActivationEvent, ActivationKind, DownloadFilter, DownloadRequest, DownloadStatus, DownloadType,
    PaginationState, PersistedDownloadItem, ResolvedItem,
};
pub use name::resolve_name;
