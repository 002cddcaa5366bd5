use std::fmt;

/// Classified category of downloadable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadType {
    M3u8,
    Bilibili,
    Mp4,
}

impl DownloadType {
    /// Parse an explicit type hint. Only the canonical lowercase names are
    /// recognized; anything else is treated as no hint at all.
    pub fn parse_hint(hint: &str) -> Option<Self> {
        match hint {
            "m3u8" => Some(Self::M3u8),
            "bilibili" => Some(Self::Bilibili),
            "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::M3u8 => "m3u8",
            Self::Bilibili => "bilibili",
            Self::Mp4 => "mp4",
        }
    }
}

impl fmt::Display for DownloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A download request during intake. Transient: it only lives until name and
/// type resolution turn it into a [`ResolvedItem`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DownloadRequest {
    pub url: String,
    pub name: Option<String>,
    pub kind: Option<DownloadType>,
    pub headers: String,
    pub folder: Option<String>,
}

/// A fully resolved download: `name` is non-empty and `kind` is concrete.
/// This is the unit handed to the submission router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub url: String,
    pub name: String,
    pub kind: DownloadType,
    pub headers: String,
    pub folder: Option<String>,
}

/// How the application was activated from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationKind {
    /// OS-level scheme activation (`open-url`).
    OpenUrl,
    /// A later launch of the process forwarded its activation here.
    SecondInstance,
}

/// An ephemeral activation signal, consumed exactly once by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationEvent {
    pub kind: ActivationKind,
    pub raw_url: String,
}

impl ActivationEvent {
    pub fn open_url(raw_url: impl Into<String>) -> Self {
        Self {
            kind: ActivationKind::OpenUrl,
            raw_url: raw_url.into(),
        }
    }

    pub fn second_instance(raw_url: impl Into<String>) -> Self {
        Self {
            kind: ActivationKind::SecondInstance,
            raw_url: raw_url.into(),
        }
    }
}

/// Lifecycle status of a persisted download item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Pending,
    Downloading,
    Completed,
    Failed,
}

/// List filter: the pending view covers everything not yet completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFilter {
    Pending,
    Completed,
}

impl DownloadFilter {
    pub fn matches(self, status: DownloadStatus) -> bool {
        match self {
            Self::Pending => status != DownloadStatus::Completed,
            Self::Completed => status == DownloadStatus::Completed,
        }
    }
}

/// A download item as the persistence side reports it. The intake pipeline
/// never assigns `id`; that happens on insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDownloadItem {
    pub id: u64,
    pub url: String,
    pub name: String,
    pub kind: DownloadType,
    pub headers: String,
    pub folder: Option<String>,
    pub status: DownloadStatus,
}

/// Current page of the list view model, recomputed on every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page_index: u32,
    pub page_size: u32,
    pub total: u64,
}
