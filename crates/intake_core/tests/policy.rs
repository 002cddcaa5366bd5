use std::sync::Once;

use intake_core::{resolve_name, DownloadFilter, DownloadStatus, DownloadType};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(intake_logging::initialize_for_tests);
}

#[test]
fn explicit_name_beats_title() {
    init_logging();
    let name = resolve_name(Some("x"), Some("y"), || "z".to_string());
    assert_eq!(name, "x");
}

#[test]
fn title_used_when_no_explicit_name() {
    init_logging();
    let name = resolve_name(None, Some("y"), || "z".to_string());
    assert_eq!(name, "y");
}

#[test]
fn random_fallback_when_nothing_resolves() {
    init_logging();
    let name = resolve_name(None, None, || "generated".to_string());
    assert_eq!(name, "generated");
}

#[test]
fn blank_inputs_count_as_absent() {
    init_logging();
    let name = resolve_name(Some("   "), Some(""), || "generated".to_string());
    assert_eq!(name, "generated");
    // Even a misbehaving generator cannot produce an empty name.
    let name = resolve_name(None, None, || "  ".to_string());
    assert!(!name.trim().is_empty());
}

#[test]
fn classifier_is_total_over_arbitrary_input() {
    init_logging();
    for url in [
        "http://a.example/stream/playlist.m3u8?token=1",
        "https://www.bilibili.com/video/BV1",
        "http://a.example/v.mp4",
        "not a url at all",
        "",
        "file.M3U8",
    ] {
        // Must classify without panicking, hint or not.
        let _ = DownloadType::classify(None, url);
        let _ = DownloadType::classify(Some("nonsense"), url);
    }

    assert_eq!(
        DownloadType::infer("http://a.example/stream/playlist.m3u8?token=1"),
        DownloadType::M3u8
    );
    assert_eq!(
        DownloadType::infer("https://www.bilibili.com/video/BV1"),
        DownloadType::Bilibili
    );
    assert_eq!(DownloadType::infer("http://a.example/page"), DownloadType::Mp4);
    assert_eq!(DownloadType::infer("garbage"), DownloadType::Mp4);
}

#[test]
fn recognized_hint_beats_inference() {
    init_logging();
    assert_eq!(
        DownloadType::classify(Some("bilibili"), "http://a.example/v.m3u8"),
        DownloadType::Bilibili
    );
    assert_eq!(
        DownloadType::classify(Some("M3U8"), "http://a.example/v.mp4"),
        DownloadType::Mp4,
        "hints are case-sensitive; unrecognized casing falls back to inference"
    );
}

#[test]
fn pending_filter_covers_everything_not_completed() {
    init_logging();
    assert!(DownloadFilter::Pending.matches(DownloadStatus::Pending));
    assert!(DownloadFilter::Pending.matches(DownloadStatus::Downloading));
    assert!(DownloadFilter::Pending.matches(DownloadStatus::Failed));
    assert!(!DownloadFilter::Pending.matches(DownloadStatus::Completed));
    assert!(DownloadFilter::Completed.matches(DownloadStatus::Completed));
    assert!(!DownloadFilter::Completed.matches(DownloadStatus::Pending));
}
