use url::Url;

use crate::model::DownloadType;

impl DownloadType {
    /// Infer a type from the URL shape. Total: every input maps to exactly
    /// one type, with [`DownloadType::Mp4`] as the defined default.
    pub fn infer(url: &str) -> Self {
        match Url::parse(url) {
            Ok(parsed) => {
                if parsed.path().to_ascii_lowercase().contains(".m3u8") {
                    Self::M3u8
                } else if parsed
                    .host_str()
                    .is_some_and(|host| host.to_ascii_lowercase().contains("bilibili"))
                {
                    Self::Bilibili
                } else {
                    Self::Mp4
                }
            }
            // Unparseable input still classifies; fall back to a plain scan.
            Err(_) => {
                let lowered = url.to_ascii_lowercase();
                if lowered.contains(".m3u8") {
                    Self::M3u8
                } else if lowered.contains("bilibili") {
                    Self::Bilibili
                } else {
                    Self::Mp4
                }
            }
        }
    }

    /// Classify with an optional explicit hint. A recognized hint always wins
    /// over inference; an unrecognized hint is ignored.
    pub fn classify(hint: Option<&str>, url: &str) -> Self {
        hint.and_then(Self::parse_hint)
            .unwrap_or_else(|| Self::infer(url))
    }
}
