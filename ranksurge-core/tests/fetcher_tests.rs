//! Chunked fetch behaviour against the in-memory store

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use ranksurge_core::{
    ChunkOutcome, ChunkPlan, ChunkWindow, ChunkedFetcher, DelayProfile, DelayShaper, FetchError,
    MemoryScoreStore, PoolError, RankingObserver, ResourcePool,
};

fn seeded_store(users: usize) -> MemoryScoreStore {
    let store = MemoryScoreStore::new();
    for user in 0..users {
        let id = format!("user-{:03}", user);
        // Several rows per user; the ranking keeps the best one
        let best = ((user * 37) % 2600) as i64;
        store.insert(&id, Some(best / 2), 1_000 + user as i64);
        store.insert(&id, Some(best), 2_000 + user as i64);
    }
    store
}

async fn fetcher_for(
    store: &MemoryScoreStore,
    capacity: usize,
    acquire_timeout: Duration,
    profile: DelayProfile,
) -> ChunkedFetcher {
    let pool = ResourcePool::connect(store, capacity, acquire_timeout)
        .await
        .unwrap();
    ChunkedFetcher::new(pool, DelayShaper::new(profile))
}

#[derive(Default)]
struct ChunkRecorder {
    started: Mutex<Vec<ChunkWindow>>,
    ended: Mutex<Vec<(usize, ChunkOutcome)>>,
}

impl RankingObserver for ChunkRecorder {
    fn on_chunk_start(&self, _plan: &ChunkPlan, window: &ChunkWindow, _hold: Duration) {
        self.started.lock().push(*window);
    }

    fn on_chunk_end(&self, window: &ChunkWindow, outcome: ChunkOutcome, _elapsed: Duration) {
        self.ended.lock().push((window.index, outcome));
    }
}

#[tokio::test(start_paused = true)]
async fn test_chunked_fetch_equals_single_shot_ranking() {
    let store = seeded_store(57);
    let fetcher = fetcher_for(&store, 2, Duration::from_secs(1), DelayProfile::default()).await;

    for (requested, chunk_size) in [(10, 10), (25, 10), (57, 7), (40, 3), (1, 10)] {
        let rows = fetcher.fetch(requested, chunk_size).await.unwrap();
        assert_eq!(
            rows,
            store.top(requested),
            "requested {} in chunks of {}",
            requested,
            chunk_size
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_request_larger_than_store_returns_what_exists() {
    let store = seeded_store(12);
    let fetcher = fetcher_for(&store, 1, Duration::from_secs(1), DelayProfile::default()).await;

    let rows = fetcher.fetch(30, 10).await.unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows, store.top(12));
}

#[tokio::test(start_paused = true)]
async fn test_chunks_run_in_order_and_hold_for_delay() {
    let store = seeded_store(30);
    let profile = DelayProfile {
        base: Duration::from_millis(40),
        ..DelayProfile::default()
    };
    let recorder = Arc::new(ChunkRecorder::default());
    let fetcher = fetcher_for(&store, 1, Duration::from_secs(1), profile)
        .await
        .with_observer(recorder.clone());

    let started = tokio::time::Instant::now();
    let rows = fetcher.fetch(25, 10).await.unwrap();
    assert_eq!(rows.len(), 25);
    assert!(started.elapsed() >= Duration::from_millis(120));

    let windows = recorder.started.lock().clone();
    assert_eq!(
        windows.iter().map(|w| (w.index, w.offset, w.limit)).collect::<Vec<_>>(),
        vec![(0, 0, 10), (1, 10, 10), (2, 20, 5)]
    );
    assert_eq!(
        *recorder.ended.lock(),
        vec![
            (0, ChunkOutcome::Completed { rows: 10 }),
            (1, ChunkOutcome::Completed { rows: 10 }),
            (2, ChunkOutcome::Completed { rows: 5 }),
        ]
    );
    assert_eq!(fetcher.pool().in_use(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failing_chunk_aborts_fetch_and_releases_connection() {
    let store = seeded_store(50).with_failure_at_offset(20);
    let recorder = Arc::new(ChunkRecorder::default());
    let fetcher = fetcher_for(&store, 1, Duration::from_millis(50), DelayProfile::default())
        .await
        .with_observer(recorder.clone());

    let err = fetcher.fetch(50, 10).await.unwrap_err();
    assert!(matches!(err, FetchError::Chunk { chunk_index: 2, .. }));
    assert!(err.to_string().starts_with("chunk 2:"));

    // Chunks after the failure never start
    assert_eq!(recorder.started.lock().len(), 3);
    assert_eq!(
        recorder.ended.lock().last().copied(),
        Some((2, ChunkOutcome::ReadFailed))
    );

    assert_eq!(fetcher.pool().in_use(), 0);
    assert_eq!(fetcher.pool().available(), 1);
    // The single connection is usable again
    assert_eq!(fetcher.fetch(10, 10).await.unwrap().len(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_fetches_beyond_capacity_exhaust_pool() {
    let capacity = 2;
    let store = seeded_store(40);
    let profile = DelayProfile {
        base: Duration::from_millis(200),
        ..DelayProfile::default()
    };
    let fetcher = Arc::new(fetcher_for(&store, capacity, Duration::from_millis(50), profile).await);

    let tasks: Vec<_> = (0..capacity + 1)
        .map(|_| {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.fetch(10, 10).await })
        })
        .collect();

    let results = futures::future::join_all(tasks).await;
    let exhausted = results
        .iter()
        .filter(|result| match result.as_ref().unwrap() {
            Err(err) => err.is_pool_exhausted(),
            Ok(_) => false,
        })
        .count();

    assert!(exhausted >= 1);
    assert_eq!(fetcher.pool().in_use(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_error_names_the_waiting_chunk() {
    let store = seeded_store(10);
    let fetcher = fetcher_for(&store, 1, Duration::from_millis(10), DelayProfile::default()).await;

    let _held = fetcher.pool().acquire_default().await.unwrap();
    let err = fetcher.fetch(10, 10).await.unwrap_err();

    match err {
        FetchError::Acquire {
            chunk_index,
            source: PoolError::Exhausted { capacity, timeout },
        } => {
            assert_eq!(chunk_index, 0);
            assert_eq!(capacity, 1);
            assert_eq!(timeout, Duration::from_millis(10));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_fetch_returns_its_connection() {
    let store = seeded_store(30);
    let profile = DelayProfile {
        base: Duration::from_secs(5),
        ..DelayProfile::default()
    };
    let fetcher = fetcher_for(&store, 1, Duration::from_millis(10), profile).await;

    let cancelled = tokio::time::timeout(Duration::from_millis(100), fetcher.fetch(30, 10)).await;
    assert!(cancelled.is_err());

    assert_eq!(fetcher.pool().in_use(), 0);
    assert_eq!(fetcher.pool().available(), 1);
}

#[tokio::test]
async fn test_zero_chunk_size_is_rejected_before_touching_pool() {
    let store = seeded_store(5);
    let fetcher = fetcher_for(&store, 1, Duration::from_millis(10), DelayProfile::default()).await;

    assert!(matches!(
        fetcher.fetch(5, 0).await,
        Err(FetchError::InvalidChunkSize)
    ));
    assert!(fetcher.fetch(0, 10).await.unwrap().is_empty());
}
