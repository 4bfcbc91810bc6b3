//! SQLite store against the chunked fetcher

use std::time::Duration;

use ranksurge_core::{
    ChunkedFetcher, DelayShaper, MemoryScoreStore, ResourcePool, ScoreStore,
};
use ranksurge_storage::{SeedPlan, SqliteScoreStore};

async fn file_store(dir: &tempfile::TempDir) -> SqliteScoreStore {
    let url = format!("sqlite://{}", dir.path().join("scores.db").display());
    let store = SqliteScoreStore::open(&url).await.unwrap();
    store.migrate().await.unwrap();
    store
}

#[tokio::test]
async fn test_windowed_query_matches_in_memory_ranking() {
    let dir = tempfile::tempdir().unwrap();
    let sqlite = file_store(&dir).await;
    let memory = MemoryScoreStore::new();

    let plan = SeedPlan::for_rows(240);
    assert_eq!(sqlite.seed(&plan).await.unwrap(), 240);
    for row in plan.rows() {
        memory.insert(row.user_id, row.score, row.created_at);
    }

    let pool = ResourcePool::connect(&sqlite, 2, Duration::from_secs(1))
        .await
        .unwrap();
    let fetcher = ChunkedFetcher::new(pool, DelayShaper::default());

    for (requested, chunk_size) in [(10, 10), (35, 10), (60, 7), (500, 50)] {
        let from_sqlite = fetcher.fetch(requested, chunk_size).await.unwrap();
        let expected = memory.top(requested);

        assert_eq!(from_sqlite.len(), expected.len());
        for (got, want) in from_sqlite.iter().zip(&expected) {
            assert_eq!(got.user_id, want.user_id);
            assert_eq!(got.score, want.score);
            assert_eq!(got.timestamp, want.timestamp);
            assert_eq!(got.source, "sqlite");
        }
    }
}

#[tokio::test]
async fn test_seed_skips_populated_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;

    store.insert_score("existing", Some(1), 1).await.unwrap();
    assert_eq!(store.seed(&SeedPlan::for_rows(50)).await.unwrap(), 0);
    assert_eq!(store.row_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_null_scores_rank_last_and_best_row_wins() {
    let store = SqliteScoreStore::open("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();
    store.insert_score("ghost", None, 50).await.unwrap();
    store.insert_score("bob", Some(300), 10).await.unwrap();
    store.insert_score("bob", Some(900), 5).await.unwrap();
    store.insert_score("amy", Some(900), 7).await.unwrap();

    let pool = ResourcePool::connect(&store, 1, Duration::from_secs(1))
        .await
        .unwrap();
    let fetcher = ChunkedFetcher::new(pool, DelayShaper::default());
    let rows = fetcher.fetch(10, 2).await.unwrap();

    let summary: Vec<_> = rows
        .iter()
        .map(|r| (r.user_id.as_str(), r.score, r.timestamp))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("amy", Some(900), 7),
            ("bob", Some(900), 10),
            ("ghost", None, 50),
        ]
    );
}

#[tokio::test]
async fn test_store_reports_backend_and_fills_pool() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    assert_eq!(store.backend(), "sqlite");

    let pool = ResourcePool::connect(&store, 3, Duration::from_millis(100))
        .await
        .unwrap();
    assert_eq!(pool.capacity(), 3);
    assert_eq!(pool.available(), 3);
}
