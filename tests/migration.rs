mod common;

use std::time::Duration;

use common::{FakeProvider, FakeSearch, FakeSource, auth, track};
use moodlist::migrator::find_playlist;
use moodlist::{AppError, ForeignTrackDescriptor, MigrationOrchestrator, SearchFields};

fn source(titles: &[&str]) -> FakeSource {
    FakeSource {
        descriptors: titles
            .iter()
            .map(|t| ForeignTrackDescriptor::new(*t).with_artist("Band"))
            .collect(),
    }
}

#[tokio::test]
async fn test_end_to_end_counts_and_single_batch() {
    let destination = FakeProvider::new()
        .with_search("Song A", FakeSearch::Hit(track("a", "Song A", "Band")))
        .with_search("Song B", FakeSearch::Miss)
        .with_search("Song C", FakeSearch::Hit(track("c", "Song C", "Band")));

    let result = MigrationOrchestrator::new(&destination)
        .migrate(
            &source(&["Song A", "Song B", "Song C"]),
            &auth(),
            &auth(),
            "src",
            "Migrated",
        )
        .await
        .unwrap();

    assert_eq!(result.matched_count, 2);
    assert_eq!(result.unmatched_titles, vec!["Song B"]);
    assert_eq!(result.error_count, 0);
    assert_eq!(result.destination_playlist_id, "created-1");
    assert_eq!(result.confirmation_token.as_deref(), Some("snapshot-0"));
    assert!(result.low_confidence.is_empty());

    let add_calls = destination.add_calls();
    assert_eq!(add_calls.len(), 1);
    assert_eq!(add_calls[0], vec!["spotify:track:a", "spotify:track:c"]);
}

#[tokio::test]
async fn test_empty_source_creates_nothing() {
    let destination = FakeProvider::new();

    let err = MigrationOrchestrator::new(&destination)
        .migrate(&source(&[]), &auth(), &auth(), "src", "Migrated")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::EmptyPlaylist(_)));
    assert!(destination.created().is_empty());
    assert!(destination.searches().is_empty());
}

#[tokio::test]
async fn test_zero_matches_still_creates_destination() {
    let destination = FakeProvider::new();

    let result = MigrationOrchestrator::new(&destination)
        .migrate(&source(&["Nope", "Nada"]), &auth(), &auth(), "src", "Empty Copy")
        .await
        .unwrap();

    assert_eq!(destination.created(), vec!["Empty Copy"]);
    assert_eq!(result.matched_count, 0);
    assert_eq!(result.unmatched_titles, vec!["Nope", "Nada"]);
    assert!(destination.add_calls().is_empty());
    assert!(result.confirmation_token.is_none());
}

#[tokio::test]
async fn test_search_error_is_isolated() {
    let destination = FakeProvider::new()
        .with_search("D1", FakeSearch::Hit(track("1", "D1", "Band")))
        .with_search("D2", FakeSearch::Fail(503))
        .with_search("D3", FakeSearch::Hit(track("3", "D3", "Band")));

    let result = MigrationOrchestrator::new(&destination)
        .migrate(&source(&["D1", "D2", "D3"]), &auth(), &auth(), "src", "Copy")
        .await
        .unwrap();

    assert_eq!(result.matched_count, 2);
    assert_eq!(result.error_count, 1);
    assert!(result.unmatched_titles.is_empty());
    assert_eq!(destination.searches().len(), 3);
}

#[tokio::test]
async fn test_failed_creation_aborts_before_search() {
    let destination = FakeProvider::new().failing_create();

    let err = MigrationOrchestrator::new(&destination)
        .migrate(&source(&["Song A"]), &auth(), &auth(), "src", "Copy")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::PlaylistCreation(_)));
    assert!(destination.searches().is_empty());
}

#[tokio::test]
async fn test_batch_failure_reports_counts_without_resubmitting() {
    let titles: Vec<String> = (0..5).map(|i| format!("T{}", i)).collect();
    let mut destination = FakeProvider::new().failing_add_on_call(1);
    for (i, title) in titles.iter().enumerate() {
        destination =
            destination.with_search(title, FakeSearch::Hit(track(&i.to_string(), title, "Band")));
    }
    let title_refs: Vec<&str> = titles.iter().map(|t| t.as_str()).collect();

    let err = MigrationOrchestrator::new(&destination)
        .with_chunk_size(2)
        .migrate(&source(&title_refs), &auth(), &auth(), "src", "Copy")
        .await
        .unwrap_err();

    match err {
        AppError::MigrationIncomplete { result, cause } => {
            assert_eq!(result.matched_count, 5);
            assert_eq!(result.summary(), "5 tracks: 5 matched, 0 unmatched, 0 errors");
            match *cause {
                AppError::PartialBatchFailure {
                    succeeded_chunks,
                    committed_items,
                    failed_at_chunk,
                    ..
                } => {
                    assert_eq!(succeeded_chunks, 1);
                    assert_eq!(committed_items, 2);
                    assert_eq!(failed_at_chunk, 1);
                }
                other => panic!("Expected PartialBatchFailure, got {:?}", other),
            }
        }
        other => panic!("Expected MigrationIncomplete, got {:?}", other),
    }

    // chunk 0 applied once, chunk 1 attempted once, nothing after
    assert_eq!(destination.add_calls().len(), 2);
}

#[tokio::test]
async fn test_deadline_after_creation_keeps_partial_counts() {
    let destination = FakeProvider::new()
        .with_search("Fast", FakeSearch::Hit(track("f", "Fast", "Band")))
        .with_search("Slow", FakeSearch::Stall);

    let err = MigrationOrchestrator::new(&destination)
        .with_deadline(Some(Duration::from_millis(100)))
        .migrate(&source(&["Fast", "Slow"]), &auth(), &auth(), "src", "Copy")
        .await
        .unwrap_err();

    match err {
        AppError::MigrationIncomplete { result, cause } => {
            assert_eq!(result.destination_playlist_id, "created-1");
            assert_eq!(result.matched_count, 1);
            assert_eq!(result.total_tracks, 2);
            assert!(result.confirmation_token.is_none());
            assert!(matches!(*cause, AppError::Timeout(_)));
        }
        other => panic!("Expected MigrationIncomplete, got {:?}", other),
    }

    assert_eq!(destination.created(), vec!["Copy"]);
    assert!(destination.add_calls().is_empty());
}

#[tokio::test]
async fn test_title_only_search_drops_artist() {
    let destination = FakeProvider::new();

    MigrationOrchestrator::new(&destination)
        .with_search_fields(SearchFields::TitleOnly)
        .migrate(&source(&["Song A"]), &auth(), &auth(), "src", "Copy")
        .await
        .unwrap();

    let searches = destination.searches();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].title, "Song A");
    assert!(searches[0].artist.is_none());
}

#[tokio::test]
async fn test_low_confidence_hit_is_flagged_but_kept() {
    let destination = FakeProvider::new().with_search(
        "Bohemian Rhapsody",
        FakeSearch::Hit(track("x", "Stairway to Heaven", "Led Zeppelin")),
    );

    let result = MigrationOrchestrator::new(&destination)
        .migrate(
            &source(&["Bohemian Rhapsody"]),
            &auth(),
            &auth(),
            "src",
            "Copy",
        )
        .await
        .unwrap();

    assert_eq!(result.matched_count, 1);
    assert_eq!(result.low_confidence.len(), 1);
    assert_eq!(result.low_confidence[0].matched_title, "Stairway to Heaven");
}

#[tokio::test]
async fn test_migrating_between_playlists_of_one_provider() {
    let provider = FakeProvider::new()
        .with_playlist("pl", vec![track("1", "Song A", "Band")])
        .with_search("Song A", FakeSearch::Hit(track("1", "Song A", "Band")));

    let result = MigrationOrchestrator::new(&provider)
        .with_deadline(Some(Duration::from_secs(5)))
        .migrate(&provider, &auth(), &auth(), "pl", "Copy")
        .await
        .unwrap();

    assert_eq!(result.matched_count, 1);
    assert_eq!(result.source_provider, "Fake");
}

#[tokio::test]
async fn test_find_playlist_by_id_or_name() {
    let provider = FakeProvider::new()
        .with_playlist("p1", Vec::new())
        .with_playlist("p2", Vec::new());

    assert_eq!(find_playlist(&provider, &auth(), "p2").await.unwrap().id, "p2");
    assert_eq!(
        find_playlist(&provider, &auth(), "playlist P1").await.unwrap().id,
        "p1"
    );
    assert!(matches!(
        find_playlist(&provider, &auth(), "missing").await.unwrap_err(),
        AppError::NotFound(_)
    ));
}
