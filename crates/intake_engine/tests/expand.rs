use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use intake_core::DownloadType;
use intake_engine::{expand_batch, BatchDefaults, RandomNamer, TitleError, TitleResolver};
use pretty_assertions::assert_eq;

/// Resolver backed by a fixed url -> title table; anything else fails.
struct TableResolver {
    titles: HashMap<String, String>,
}

impl TableResolver {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            titles: entries
                .iter()
                .map(|(url, title)| (url.to_string(), title.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl TitleResolver for TableResolver {
    async fn resolve(&self, url: &str) -> Result<String, TitleError> {
        self.titles
            .get(url)
            .cloned()
            .ok_or_else(|| TitleError::Network("connection refused".into()))
    }
}

/// Deterministic namer: fallback-1, fallback-2, ...
#[derive(Default)]
struct CountingNamer {
    calls: AtomicUsize,
}

impl RandomNamer for CountingNamer {
    fn random_name(&self) -> String {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        format!("fallback-{n}")
    }
}

#[tokio::test]
async fn expands_lines_in_order_with_custom_name_precedence() {
    let resolver = TableResolver::new(&[
        ("http://a.example/one", "Page One"),
        ("http://a.example/two", "Page Two"),
    ]);
    let namer = CountingNamer::default();
    let block = "http://a.example/one named /tmp/dl\nhttp://a.example/two";

    let items = expand_batch(block, &BatchDefaults::default(), &resolver, &namer).await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].url, "http://a.example/one");
    assert_eq!(items[0].name, "named");
    assert_eq!(items[0].folder.as_deref(), Some("/tmp/dl"));
    assert_eq!(items[1].name, "Page Two");
    assert_eq!(items[1].folder, None);
}

#[tokio::test]
async fn failed_title_fetch_degrades_only_that_line() {
    let resolver = TableResolver::new(&[("http://a.example/ok", "Works")]);
    let namer = CountingNamer::default();
    let block = "http://a.example/dead\nhttp://a.example/ok";

    let items = expand_batch(block, &BatchDefaults::default(), &resolver, &namer).await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "fallback-1");
    assert_eq!(items[1].name, "Works");
}

#[tokio::test]
async fn shared_kind_and_headers_apply_to_every_line() {
    let resolver = TableResolver::new(&[]);
    let namer = CountingNamer::default();
    let defaults = BatchDefaults {
        kind: Some(DownloadType::Bilibili),
        headers: "Referer: http://b.example".to_string(),
    };
    let block = "http://a.example/x.m3u8\nhttp://a.example/y";

    let items = expand_batch(block, &defaults, &resolver, &namer).await;

    // An explicit shared type overrides per-line inference.
    assert_eq!(items[0].kind, DownloadType::Bilibili);
    assert_eq!(items[1].kind, DownloadType::Bilibili);
    assert_eq!(items[0].headers, "Referer: http://b.example");
    assert_eq!(items[1].headers, "Referer: http://b.example");
}

#[tokio::test]
async fn missing_kind_falls_back_to_per_line_inference() {
    let resolver = TableResolver::new(&[]);
    let namer = CountingNamer::default();
    let block = "http://a.example/show.m3u8\nhttps://www.bilibili.com/video/x\nhttp://a.example/v";

    let items = expand_batch(block, &BatchDefaults::default(), &resolver, &namer).await;

    assert_eq!(items[0].kind, DownloadType::M3u8);
    assert_eq!(items[1].kind, DownloadType::Bilibili);
    assert_eq!(items[2].kind, DownloadType::Mp4);
}

#[tokio::test]
async fn blank_block_expands_to_nothing() {
    let resolver = TableResolver::new(&[]);
    let namer = CountingNamer::default();

    let items = expand_batch("\n   \n", &BatchDefaults::default(), &resolver, &namer).await;
    assert!(items.is_empty());
}
