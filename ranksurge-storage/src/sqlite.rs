use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::{debug, info};

use ranksurge_core::{ChunkWindow, Record, ScoreConnection, ScoreStore, StoreError, StoreResult};

use crate::seed::SeedPlan;

const BACKEND: &str = "sqlite";

const CREATE_SCORES: &str = "CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    high_score INTEGER,
    created_at INTEGER NOT NULL
)";

const CREATE_SCORES_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_scores_user_id ON scores (user_id)";

const INSERT_SCORE: &str = "INSERT INTO scores (user_id, high_score, created_at) VALUES (?, ?, ?)";

const COUNT_SCORES: &str = "SELECT COUNT(*) FROM scores";

/// Best score and latest timestamp per user, one window at a time
const TOP_SCORES_WINDOW: &str = "SELECT user_id, MAX(high_score) AS score, MAX(created_at) AS ts
    FROM scores
    GROUP BY user_id
    ORDER BY score DESC, user_id ASC
    LIMIT ? OFFSET ?";

/// Score store over a SQLite database.
///
/// The store keeps one administrative connection open for schema and seed
/// work. For `sqlite::memory:` URLs that connection also keeps the shared
/// in-memory database alive for every pooled connection opened afterwards.
pub struct SqliteScoreStore {
    options: SqliteConnectOptions,
    admin: Mutex<SqliteConnection>,
}

impl SqliteScoreStore {
    /// Open the database at `url`, creating the file if it is missing
    pub async fn open(url: &str) -> StoreResult<Self> {
        info!("Opening score store: {}", url);

        let options = SqliteConnectOptions::from_str(url)
            .map_err(connection_error)?
            .create_if_missing(true);
        let admin = options.connect().await.map_err(connection_error)?;

        Ok(Self {
            options,
            admin: Mutex::new(admin),
        })
    }

    /// Create the scores table and its index if they do not exist
    pub async fn migrate(&self) -> StoreResult<()> {
        let mut admin = self.admin.lock().await;
        for statement in [CREATE_SCORES, CREATE_SCORES_USER_INDEX] {
            sqlx::query(statement)
                .execute(&mut *admin)
                .await
                .map_err(schema_error)?;
        }
        debug!("Score schema ready");
        Ok(())
    }

    /// Insert one raw score row
    pub async fn insert_score(
        &self,
        user_id: &str,
        score: Option<i64>,
        created_at: i64,
    ) -> StoreResult<()> {
        let mut admin = self.admin.lock().await;
        sqlx::query(INSERT_SCORE)
            .bind(user_id)
            .bind(score)
            .bind(created_at)
            .execute(&mut *admin)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    /// Number of raw score rows
    pub async fn row_count(&self) -> StoreResult<u64> {
        let mut admin = self.admin.lock().await;
        let (count,): (i64,) = sqlx::query_as(COUNT_SCORES)
            .fetch_one(&mut *admin)
            .await
            .map_err(query_error)?;
        Ok(count.max(0) as u64)
    }

    /// Insert the plan's synthetic rows in one transaction, unless the table
    /// already holds data. Returns the number of rows inserted.
    pub async fn seed(&self, plan: &SeedPlan) -> StoreResult<u64> {
        let existing = self.row_count().await?;
        if existing > 0 {
            info!(existing, "Score table already populated, skipping seed");
            return Ok(0);
        }

        let rows = plan.rows();
        let mut admin = self.admin.lock().await;
        let mut tx = admin.begin().await.map_err(query_error)?;
        for row in &rows {
            sqlx::query(INSERT_SCORE)
                .bind(&row.user_id)
                .bind(row.score)
                .bind(row.created_at)
                .execute(&mut *tx)
                .await
                .map_err(query_error)?;
        }
        tx.commit().await.map_err(query_error)?;

        info!(rows = rows.len(), users = plan.users, "Seeded score table");
        Ok(rows.len() as u64)
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn connect(&self) -> StoreResult<Box<dyn ScoreConnection>> {
        let conn = self.options.connect().await.map_err(connection_error)?;
        Ok(Box::new(SqliteScoreConnection { conn }))
    }
}

struct SqliteScoreConnection {
    conn: SqliteConnection,
}

#[async_trait]
impl ScoreConnection for SqliteScoreConnection {
    async fn fetch_window(&mut self, window: ChunkWindow) -> StoreResult<Vec<Record>> {
        let limit = i64::try_from(window.limit)
            .map_err(|_| StoreError::query(format!("limit {} out of range", window.limit)))?;
        let offset = i64::try_from(window.offset)
            .map_err(|_| StoreError::query(format!("offset {} out of range", window.offset)))?;

        let rows: Vec<(String, Option<i64>, Option<i64>)> = sqlx::query_as(TOP_SCORES_WINDOW)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut self.conn)
            .await
            .map_err(query_error)?;

        Ok(rows
            .into_iter()
            .map(|(user_id, score, ts)| {
                Record::new(user_id, score, ts.unwrap_or_default(), BACKEND)
            })
            .collect())
    }
}

fn connection_error(err: sqlx::Error) -> StoreError {
    StoreError::connection(err.to_string())
}

fn query_error(err: sqlx::Error) -> StoreError {
    StoreError::query(err.to_string())
}

fn schema_error(err: sqlx::Error) -> StoreError {
    StoreError::schema(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_shared_with_pooled_connections() {
        let store = SqliteScoreStore::open("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();
        store.insert_score("alice", Some(10), 1).await.unwrap();

        let mut conn = store.connect().await.unwrap();
        let window = ChunkWindow {
            index: 0,
            offset: 0,
            limit: 10,
        };
        let rows = conn.fetch_window(window).await.unwrap();
        assert_eq!(rows, vec![Record::new("alice", Some(10), 1, "sqlite")]);
    }

    #[tokio::test]
    async fn test_query_without_schema_is_a_query_error() {
        let store = SqliteScoreStore::open("sqlite::memory:").await.unwrap();
        let mut conn = store.connect().await.unwrap();
        let err = conn
            .fetch_window(ChunkWindow {
                index: 0,
                offset: 0,
                limit: 10,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Query { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_connection_error() {
        let err = SqliteScoreStore::open("postgres://nowhere").await.err().unwrap();
        assert!(matches!(err, StoreError::Connection { .. }));
    }
}
