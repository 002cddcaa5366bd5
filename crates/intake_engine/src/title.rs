use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::html;
use crate::types::TitleError;

/// Limits for the HTTP title fetch. The pipeline itself imposes no timeout;
/// bounded waits come from the client configured here.
#[derive(Debug, Clone)]
pub struct TitleSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for TitleSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Fetches a human-readable title for a URL. External network dependency;
/// every URL may fail independently.
#[async_trait]
pub trait TitleResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<String, TitleError>;
}

/// Reqwest-backed resolver: fetch the page, decode it, read `<title>`.
#[derive(Debug, Clone)]
pub struct HttpTitleResolver {
    client: reqwest::Client,
    max_bytes: u64,
}

impl HttpTitleResolver {
    pub fn new(settings: TitleSettings) -> Result<Self, TitleError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| TitleError::Network(err.to_string()))?;
        Ok(Self {
            client,
            max_bytes: settings.max_bytes,
        })
    }
}

#[async_trait]
impl TitleResolver for HttpTitleResolver {
    async fn resolve(&self, url: &str) -> Result<String, TitleError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| TitleError::InvalidUrl(err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TitleError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        if let Some(ct) = content_type.as_deref() {
            if !is_html(ct) {
                return Err(TitleError::UnsupportedContentType(ct.to_string()));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            bytes.extend_from_slice(&chunk);
            if bytes.len() as u64 >= self.max_bytes {
                // Titles live in <head>; nothing past the cap is needed.
                break;
            }
        }

        html::page_title(&bytes, content_type.as_deref()).ok_or(TitleError::NoTitle)
    }
}

fn is_html(content_type: &str) -> bool {
    let ct = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    ct.eq_ignore_ascii_case("text/html") || ct.eq_ignore_ascii_case("application/xhtml+xml")
}

fn map_reqwest_error(err: reqwest::Error) -> TitleError {
    if err.is_timeout() {
        TitleError::Timeout
    } else {
        TitleError::Network(err.to_string())
    }
}
