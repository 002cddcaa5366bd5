use std::borrow::Cow;

use crate::model::{ActivationEvent, ActivationKind, DownloadRequest, DownloadType};

/// Where a deep link came from. Whether the `silent` flag is honored is a
/// per-source decision: in-app search strings support auto-submission, the
/// native scheme handler never does. The asymmetry is deliberate-looking but
/// unconfirmed upstream; it is kept as configuration instead of unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepLinkSource {
    pub supports_silent: bool,
}

impl DeepLinkSource {
    /// In-app navigation query string (also second-instance forwards).
    pub const SEARCH: Self = Self {
        supports_silent: true,
    };
    /// OS-native scheme activation.
    pub const NATIVE_SCHEME: Self = Self {
        supports_silent: false,
    };
}

/// How a decoded request should be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Submit immediately, bypassing the interactive form.
    Silent,
    /// Pre-fill the interactive form and wait for the operator.
    Interactive,
}

/// A recognized download intent extracted from a deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkIntent {
    pub request: DownloadRequest,
    pub disposition: Disposition,
}

/// Decode an activation event with the decoder variant its source demands.
///
/// OS `open-url` activations go through the restricted native decoder;
/// second-instance forwards carry the full search-string field set.
pub fn decode_activation<F>(event: &ActivationEvent, random: F) -> Option<DeepLinkIntent>
where
    F: FnOnce() -> String,
{
    match event.kind {
        ActivationKind::OpenUrl => {
            decode_scheme(&event.raw_url, DeepLinkSource::NATIVE_SCHEME, random)
        }
        ActivationKind::SecondInstance => {
            let query = event.raw_url.split_once('?').map_or("", |(_, q)| q);
            decode_search(query, DeepLinkSource::SEARCH, random)
        }
    }
}

/// Decode an in-app navigation search string.
///
/// Recognized fields: `n` (intent marker; absent means this is not a download
/// intent), `type` (only accepted when it names a known classified value),
/// `silent`, `encodedURL` (percent-decoded, preferred over `url`), `url`,
/// `name`, `headers` (percent-decoded).
///
/// Quirk preserved from the shipped behavior: a present `name` is
/// concatenated with a freshly generated suffix rather than used verbatim.
pub fn decode_search<F>(query: &str, source: DeepLinkSource, random: F) -> Option<DeepLinkIntent>
where
    F: FnOnce() -> String,
{
    let params = parse_query(query);
    get(&params, "n")?;

    let silent = source.supports_silent && get(&params, "silent").is_some();
    let url = match get(&params, "encodedURL").map(percent_decode) {
        Some(decoded) if !decoded.is_empty() => decoded,
        _ => get(&params, "url").unwrap_or_default().to_string(),
    };
    let name = match get(&params, "name") {
        Some(given) => format!("{given}{}", random()),
        None => random(),
    };
    let kind = DownloadType::classify(get(&params, "type"), &url);
    let headers = get(&params, "headers").map(percent_decode).unwrap_or_default();

    Some(DeepLinkIntent {
        request: DownloadRequest {
            url,
            name: Some(name),
            kind: Some(kind),
            headers,
            folder: None,
        },
        disposition: if silent {
            Disposition::Silent
        } else {
            Disposition::Interactive
        },
    })
}

/// Decode an OS-native scheme activation URL.
///
/// This variant recognizes only `n` (which must be exactly `"true"`), `name`
/// and `url`; the type is always inferred and headers are empty. Its source
/// does not support silent submission, so the result is always interactive.
pub fn decode_scheme<F>(raw_url: &str, source: DeepLinkSource, random: F) -> Option<DeepLinkIntent>
where
    F: FnOnce() -> String,
{
    let query = raw_url.split_once('?').map_or("", |(_, q)| q);
    let params = parse_query(query);
    if get(&params, "n") != Some("true") {
        return None;
    }

    let silent = source.supports_silent && get(&params, "silent").is_some();
    let url = get(&params, "url").unwrap_or_default().to_string();
    let name = match get(&params, "name") {
        Some(given) if !given.is_empty() => given.to_string(),
        _ => random(),
    };
    let kind = DownloadType::infer(&url);

    Some(DeepLinkIntent {
        request: DownloadRequest {
            url,
            name: Some(name),
            kind: Some(kind),
            headers: String::new(),
            folder: None,
        },
        disposition: if silent {
            Disposition::Silent
        } else {
            Disposition::Interactive
        },
    })
}

fn parse_query(query: &str) -> Vec<(Cow<'_, str>, Cow<'_, str>)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes()).collect()
}

fn get<'a>(params: &'a [(Cow<'a, str>, Cow<'a, str>)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_ref())
}

/// Fields such as `encodedURL` and `headers` arrive percent-encoded inside an
/// already percent-encoded query string, so one more decode pass is needed.
fn percent_decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| value.to_string())
}
