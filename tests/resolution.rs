mod helper;

use rstest::rstest;

use helper::{FakeDownloader, FixedInstalled, ScriptedFeed, cached_service, v};
use pim::config::DEFAULT_REFRESH_INTERVAL_MS;
use pim::version::cache::CatalogCache;
use pim::version::error::ResolveError;
use pim::version::fetcher::CatalogFetcher;
use pim::version::installed::InstalledVersionProvider;
use pim::version::resolution::{ResolutionEngine, UpdateResolution};
use pim::version::service::CatalogService;
use pim::version::update::detect_updatable;

/// Tags for 3.9 through 3.14 in the feed's newest-first order, with noise
const TAGS: &[&str] = &[
    "v3.14.0a2", "v3.14.0a1", "v3.13.1", "v3.13.0", "v3.13.0rc3", "legacy-trunk",
    "v3.12.4", "v3.12.3", "v3.11.9", "v3.11.8", "v3.10.11", "v3.10.10", "3.10.9",
    "v3.9.13", "v3.9.12", "v3.8.10", "v2.7.18",
];

#[rstest]
#[case::single_page(&[17])]
#[case::even_split(&[6, 6, 5])]
#[case::one_tag_per_page(&[1; 17])]
#[case::lopsided(&[15, 1, 1])]
#[tokio::test]
async fn fetch_covers_every_line_however_pages_split(#[case] page_sizes: &[usize]) {
    let mut pages: Vec<&[&str]> = Vec::new();
    let mut offset = 0;
    for size in page_sizes {
        pages.push(&TAGS[offset..offset + size]);
        offset += size;
    }
    let feed = ScriptedFeed::new(&pages);
    let requests = feed.requests();

    let catalog = CatalogFetcher::new(Box::new(feed)).fetch_all().await.unwrap();

    for minor in 9..=14 {
        assert!(!catalog.line(minor).is_empty(), "line 3.{} missing", minor);
    }
    assert!(catalog.line(8).is_empty());
    assert!(requests.lock().unwrap().len() <= page_sizes.len() + 1);
}

#[tokio::test]
async fn fetch_stops_on_exhausted_feed_with_gap() {
    let feed = ScriptedFeed::new(&[&["v3.12.1", "v3.10.4"], &["v3.9.2"]]);
    let requests = feed.requests();

    let catalog = CatalogFetcher::new(Box::new(feed)).fetch_all().await.unwrap();

    assert_eq!(*requests.lock().unwrap(), vec![1, 2, 3]);
    assert!(catalog.line(11).is_empty());
    assert_eq!(catalog.len(), 3);
}

#[tokio::test]
async fn latest_install_walks_down_and_records_floor() {
    // Page 1 lists 3.12.4, whose installer was never published
    let feed = ScriptedFeed::new(&[&["v3.12.4", "v3.12.3", "v3.12.2", "v3.11.0", "v3.10.0", "v3.9.0"]]);
    let mut service = CatalogService::new(
        CatalogFetcher::new(Box::new(feed)),
        CatalogCache::in_memory(DEFAULT_REFRESH_INTERVAL_MS).unwrap(),
        false,
    );
    let downloader = FakeDownloader::missing(&["3.12.4"]);
    let attempts = downloader.attempts();

    let resolved = ResolutionEngine::new(&mut service, &downloader)
        .resolve_install(&v("3.12"), true)
        .await
        .unwrap();

    assert_eq!(resolved.version, v("3.12.3"));
    assert_eq!(*attempts.lock().unwrap(), vec![v("3.12.4"), v("3.12.3")]);
    assert_eq!(service.ledger().floor(12), Some(&v("3.12.4")));
}

#[tokio::test]
async fn repeated_failures_only_lower_the_floor() {
    let mut service = cached_service(&["3.13.0", "3.13.1", "3.13.2", "3.13.3"], &[], false);
    let downloader = FakeDownloader::missing(&["3.13.3", "3.13.2", "3.13.1", "3.13.0"]);
    let attempts = downloader.attempts();

    let first = ResolutionEngine::new(&mut service, &downloader)
        .resolve_install(&v("3.13"), true)
        .await;
    assert!(matches!(first, Err(ResolveError::NoInstallableVersion { minor: 13 })));
    assert_eq!(service.ledger().floor(13), Some(&v("3.13.0")));

    // A later failure above the floor must not raise it
    service.record_failure(v("3.13.2"));
    assert_eq!(service.ledger().floor(13), Some(&v("3.13.0")));

    // Walk order is strictly descending and nothing is retried
    let walked = attempts.lock().unwrap().clone();
    assert!(walked.windows(2).all(|pair| pair[0] > pair[1]));

    // Once the floor covers the whole line, nothing is attempted
    let second = ResolutionEngine::new(&mut service, &downloader)
        .resolve_install(&v("3.13"), true)
        .await;
    assert!(matches!(second, Err(ResolveError::NoInstallableVersion { minor: 13 })));
    assert_eq!(attempts.lock().unwrap().len(), walked.len());
}

#[tokio::test]
async fn network_failure_aborts_walk_without_touching_ledger() {
    let mut service = CatalogService::new(
        CatalogFetcher::new(Box::new(helper::FailingFeed)),
        CatalogCache::in_memory(DEFAULT_REFRESH_INTERVAL_MS).unwrap(),
        false,
    );
    let downloader = FakeDownloader::missing(&[]);

    let result = ResolutionEngine::new(&mut service, &downloader)
        .resolve_install(&v("3.12"), true)
        .await;

    assert!(matches!(result, Err(ResolveError::Feed(_))));
    assert!(downloader.attempts().lock().unwrap().is_empty());
    assert!(service.ledger().is_empty());
}

#[tokio::test]
async fn detected_updates_match_resolved_updates() {
    let mut service = cached_service(
        &["3.10.5", "3.10.11", "3.10.12", "3.12.3", "3.12.4", "3.13.1"],
        &[],
        false,
    );
    service.ensure().await.unwrap();
    let installed = FixedInstalled::of(&["3.10.5", "3.12.4", "3.13.1"])
        .list_installed()
        .await;

    let updatable = detect_updatable(&installed, &service);
    assert_eq!(updatable.len(), 1);
    assert_eq!(updatable.get(&10), Some(&v("3.10.11")));

    let downloader = FakeDownloader::missing(&[]);
    let mut engine = ResolutionEngine::new(&mut service, &downloader);
    assert_eq!(
        engine.resolve_update(&v("3.12.4")).await.unwrap(),
        UpdateResolution::AlreadyLatest
    );
    match engine.resolve_update(&v("3.10.5")).await.unwrap() {
        UpdateResolution::Updated(resolved) => assert_eq!(resolved.version, v("3.10.11")),
        other => panic!("expected an update, got {:?}", other),
    }
}

#[tokio::test]
async fn pre_release_lines_follow_configuration() {
    let catalog = ["3.14.0a1", "3.14.0a2", "3.14.0b1"];
    let downloader = FakeDownloader::missing(&[]);

    let mut strict = cached_service(&catalog, &[], false);
    let result = ResolutionEngine::new(&mut strict, &downloader)
        .resolve_install(&v("3.14"), true)
        .await;
    assert!(matches!(result, Err(ResolveError::NoInstallableVersion { minor: 14 })));

    let mut permissive = cached_service(&catalog, &[], true);
    let resolved = ResolutionEngine::new(&mut permissive, &downloader)
        .resolve_install(&v("3.14"), true)
        .await
        .unwrap();
    assert_eq!(resolved.version, v("3.14.0b1"));
}
