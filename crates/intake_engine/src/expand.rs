use futures_util::future::join_all;
use intake_core::{parse_batch, resolve_name, DownloadType, ResolvedItem};
use intake_logging::intake_warn;

use crate::namer::RandomNamer;
use crate::title::TitleResolver;

/// Shared fields applied to every line of a batch submission.
#[derive(Debug, Clone, Default)]
pub struct BatchDefaults {
    pub kind: Option<DownloadType>,
    pub headers: String,
}

/// Expand a batch block into resolved items, one per valid line.
///
/// Title resolutions are all issued at once (one per line) and joined on a
/// single barrier; a failed fetch degrades only that line's name to the
/// generated fallback and never aborts the batch. Output preserves input
/// line order.
pub async fn expand_batch(
    block: &str,
    defaults: &BatchDefaults,
    resolver: &dyn TitleResolver,
    namer: &dyn RandomNamer,
) -> Vec<ResolvedItem> {
    let lines = parse_batch(block);

    // Fan-out, then a join barrier; results stay keyed by line position.
    let titles = join_all(lines.iter().map(|line| async {
        match resolver.resolve(&line.url).await {
            Ok(title) => Some(title),
            Err(err) => {
                intake_warn!("title resolution failed for {}: {}", line.url, err);
                None
            }
        }
    }))
    .await;

    lines
        .into_iter()
        .zip(titles)
        .map(|(line, title)| {
            let name = resolve_name(line.custom_name.as_deref(), title.as_deref(), || {
                namer.random_name()
            });
            let kind = defaults
                .kind
                .unwrap_or_else(|| DownloadType::infer(&line.url));
            ResolvedItem {
                url: line.url,
                name,
                kind,
                headers: defaults.headers.clone(),
                folder: line.folder,
            }
        })
        .collect()
}
