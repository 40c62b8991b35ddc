/*!
 * Integration tests for the lookup controller lifecycle
 */

use reqwest::StatusCode;
use std::sync::Arc;

use lyricsync::app_config::{Config, ConfigStore};
use lyricsync::app_controller::{Controller, LookupOutcome, MediaItem};
use lyricsync::lyrics::{LyricTrack, TrackSet};
use lyricsync::notifications::{LookupEvent, MemorySink, Severity};
use lyricsync::providers::mock::MockProvider;

use crate::common::{create_temp_dir, create_test_file, init_test_logging, sample_tracks};

fn setup(provider: MockProvider, config: ConfigStore) -> (Controller, Arc<MockProvider>, Arc<MemorySink>) {
    init_test_logging();
    let provider = Arc::new(provider);
    let sink = Arc::new(MemorySink::new());
    let controller = Controller::new(provider.clone(), config, sink.clone());
    (controller, provider, sink)
}

fn item() -> MediaItem {
    MediaItem::new("Hello World (Live)", "Band")
}

#[tokio::test]
async fn test_lookup_workingProvider_shouldReturnMergedLyrics() {
    let (controller, provider, sink) = setup(MockProvider::working(sample_tracks()), ConfigStore::Fixed(Config::default()));

    let result = controller.lookup(&item()).await;

    let LookupOutcome::Lyrics { text, report } = &result.outcome else {
        panic!("expected lyrics, got {:?}", result.outcome);
    };
    assert!(text.starts_with("[00:00.000]作词：张三\n"));
    assert_eq!(report.matched, 2);

    assert_eq!(result.events, vec![
        LookupEvent::Matching { title: "Hello World (Live)".to_string() },
        LookupEvent::MatchSucceeded { matched: 2, word_lines: 2 },
    ]);
    assert_eq!(sink.messages(), vec![
        (Severity::Success, "Matching: Hello World (Live)".to_string()),
        (Severity::Success, "Lyrics matched (2/2 word-level lines aligned)".to_string()),
    ]);
    assert_eq!(provider.search_count(), 1);
    assert_eq!(provider.fetch_count(), 1);
}

#[tokio::test]
async fn test_lookup_firstSearchMisses_shouldRetryWithCleanedKeyword() {
    let (controller, provider, _) = setup(MockProvider::miss_first_search(sample_tracks()), ConfigStore::Fixed(Config::default()));

    let result = controller.lookup(&item()).await;

    assert!(result.outcome.lyrics().is_some());
    assert_eq!(provider.keywords(), vec![
        "Hello World (Live) Band".to_string(),
        "Hello World Band".to_string(),
    ]);
}

#[tokio::test]
async fn test_lookup_notFound_shouldSearchTwiceAndReport() {
    let (controller, provider, sink) = setup(MockProvider::not_found(), ConfigStore::Fixed(Config::default()));

    let result = controller.lookup(&item()).await;

    assert_eq!(result.outcome, LookupOutcome::SongNotFound);
    assert_eq!(provider.search_count(), 2);
    assert_eq!(provider.fetch_count(), 0);
    assert_eq!(sink.messages().last(), Some(&(Severity::Warning, "Song not found: Hello World (Live)".to_string())));
}

#[tokio::test]
async fn test_lookup_rejectedSearch_shouldRetryAndReportNotFound() {
    let (controller, provider, sink) = setup(
        MockProvider::rejected_search(StatusCode::SERVICE_UNAVAILABLE),
        ConfigStore::Fixed(Config::default()),
    );

    let result = controller.lookup(&item()).await;

    assert_eq!(result.outcome, LookupOutcome::SongNotFound);
    assert_eq!(provider.keywords(), vec![
        "Hello World (Live) Band".to_string(),
        "Hello World Band".to_string(),
    ]);
    assert_eq!(provider.fetch_count(), 0);
    assert!(!result.events.iter().any(|event| matches!(event, LookupEvent::LookupFailed { .. })));
    assert_eq!(sink.messages().last(), Some(&(Severity::Warning, "Song not found: Hello World (Live)".to_string())));
}

#[tokio::test]
async fn test_lookup_cleanKeywordMiss_shouldNotRetry() {
    let (controller, provider, _) = setup(MockProvider::not_found(), ConfigStore::Fixed(Config::default()));

    let result = controller.lookup(&MediaItem::new("Plain", "Band")).await;

    assert_eq!(result.outcome, LookupOutcome::SongNotFound);
    assert_eq!(provider.search_count(), 1);
}

#[tokio::test]
async fn test_lookup_emptyTracks_shouldReportNoLyrics() {
    let tracks = TrackSet::default().with_track(LyricTrack::Plain, "[ti:Instrumental]");
    let (controller, _, sink) = setup(MockProvider::working(tracks), ConfigStore::Fixed(Config::default()));

    let result = controller.lookup(&item()).await;

    assert_eq!(result.outcome, LookupOutcome::NoLyrics);
    assert_eq!(result.events.last(), Some(&LookupEvent::NoLyrics { title: "Hello World (Live)".to_string() }));
    assert_eq!(sink.messages().len(), 2);
}

#[tokio::test]
async fn test_lookup_failingSearch_shouldEmitSingleFailure() {
    let (controller, _, sink) = setup(MockProvider::failing_search(), ConfigStore::Fixed(Config::default()));

    let result = controller.lookup(&item()).await;

    let LookupOutcome::Failed { message } = &result.outcome else {
        panic!("expected failure, got {:?}", result.outcome);
    };
    assert!(message.contains("mock connection refused"));

    let failures: Vec<_> = result.events.iter()
        .filter(|event| matches!(event, LookupEvent::LookupFailed { .. }))
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(sink.messages().last().map(|(severity, _)| *severity), Some(Severity::Error));
}

#[tokio::test]
async fn test_lookup_failingFetch_shouldFail() {
    let (controller, provider, _) = setup(MockProvider::failing_fetch(), ConfigStore::Fixed(Config::default()));

    let result = controller.lookup(&item()).await;

    assert!(matches!(result.outcome, LookupOutcome::Failed { .. }));
    assert_eq!(provider.fetch_count(), 1);
}

#[tokio::test]
async fn test_lookup_configEdits_shouldApplyOnNextLookup() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "conf.json", r#"{"merge": {"enable_plugin": false}}"#).unwrap();
    let (controller, provider, _) = setup(MockProvider::working(sample_tracks()), ConfigStore::file(&path));

    assert_eq!(controller.lookup(&item()).await.outcome, LookupOutcome::Disabled);
    assert_eq!(provider.search_count(), 0);

    create_test_file(dir.path(), "conf.json", r#"{"merge": {"enable_plugin": true, "enable_translation": false}}"#).unwrap();
    let result = controller.lookup(&item()).await;

    let lyrics = result.outcome.lyrics().unwrap();
    assert!(!lyrics.contains("你好世界"));
    assert_eq!(provider.search_count(), 1);
}

#[tokio::test]
async fn test_lookup_brokenConfig_shouldFailAndNotify() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "conf.json", "{ broken").unwrap();
    let (controller, provider, sink) = setup(MockProvider::working(sample_tracks()), ConfigStore::file(&path));

    let result = controller.lookup(&item()).await;

    assert!(matches!(result.outcome, LookupOutcome::Failed { .. }));
    assert_eq!(provider.search_count(), 0);
    assert_eq!(sink.messages().len(), 1);
}

#[test]
fn test_lookup_blockingCaller_shouldCompleteOnTestRuntime() {
    let (controller, _, _) = setup(MockProvider::working(sample_tracks()), ConfigStore::Fixed(Config::default()));

    let result = tokio_test::block_on(async {
        controller.lookup(&MediaItem::new("Hello World", "")).await
    });

    assert!(result.outcome.lyrics().is_some());
}
