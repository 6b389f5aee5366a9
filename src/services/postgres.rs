use crate::models::{canonical_pair, ExclusionSnapshot, MatchRecord, SwipeAction, SwipeDecision};
use crate::repo::{
    ChatRepository, InteractionRepository, RepoError, SwipeWrite,
};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when setting up the PostgreSQL store
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Swipe decision as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "swipe_decision", rename_all = "lowercase")]
enum Decision {
    Like,
    Pass,
}

impl From<SwipeDecision> for Decision {
    fn from(value: SwipeDecision) -> Self {
        match value {
            SwipeDecision::Like => Decision::Like,
            SwipeDecision::Pass => Decision::Pass,
        }
    }
}

impl From<Decision> for SwipeDecision {
    fn from(value: Decision) -> Self {
        match value {
            Decision::Like => SwipeDecision::Like,
            Decision::Pass => SwipeDecision::Pass,
        }
    }
}

fn repo_err(e: sqlx::Error) -> RepoError {
    match e {
        sqlx::Error::RowNotFound => RepoError::NotFound("row not found".to_string()),
        other => RepoError::Transient(other.to_string()),
    }
}

/// PostgreSQL store for swipes, matches, blocks, and message read-state
///
/// The matches table carries a UNIQUE constraint on the canonical
/// (user_low, user_high) pair; match creation is `INSERT .. ON CONFLICT DO
/// NOTHING` followed by a read, so two racing reciprocal swipes converge on
/// one row.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string, running migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    fn row_to_match(row: &sqlx::postgres::PgRow) -> MatchRecord {
        MatchRecord {
            id: row.get("id"),
            user_low: row.get("user_low"),
            user_high: row.get("user_high"),
            compatibility_score: row.get::<i16, _>("compatibility_score") as u8,
            created_at: row.get("created_at"),
        }
    }

    async fn fetch_match(
        &self,
        low: &str,
        high: &str,
    ) -> Result<Option<MatchRecord>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_low, user_high, compatibility_score, created_at
            FROM matches
            WHERE user_low = $1 AND user_high = $2
            "#,
        )
        .bind(low)
        .bind(high)
        .fetch_optional(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(row.as_ref().map(Self::row_to_match))
    }

    async fn swiped_targets_in(
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let rows = sqlx::query("SELECT target_id FROM swipes WHERE actor_id = $1")
            .bind(user_id)
            .fetch_all(&mut **tx)
            .await?;
        Ok(rows.iter().map(|row| row.get("target_id")).collect())
    }

    async fn matched_ids_in(
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT user_low, user_high FROM matches WHERE user_low = $1 OR user_high = $1",
        )
        .bind(user_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows
            .iter()
            .map(|row| {
                let low: String = row.get("user_low");
                if low == user_id {
                    row.get("user_high")
                } else {
                    low
                }
            })
            .collect())
    }

    async fn blocked_ids_in(
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT blocked_id AS other FROM blocks WHERE blocker_id = $1
            UNION
            SELECT blocker_id AS other FROM blocks WHERE blocked_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows.iter().map(|row| row.get("other")).collect())
    }
}

#[async_trait]
impl InteractionRepository for PostgresStore {
    async fn record_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        decision: SwipeDecision,
    ) -> Result<SwipeWrite, RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO swipes (actor_id, target_id, decision, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (actor_id, target_id) DO NOTHING
            "#,
        )
        .bind(actor_id)
        .bind(target_id)
        .bind(Decision::from(decision))
        .execute(&self.pool)
        .await
        .map_err(repo_err)?;

        if result.rows_affected() > 0 {
            tracing::debug!(
                "Recorded swipe: {} -> {} ({:?})",
                actor_id,
                target_id,
                decision
            );
            Ok(SwipeWrite::Recorded)
        } else {
            Ok(SwipeWrite::AlreadyRecorded)
        }
    }

    async fn find_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeAction>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT actor_id, target_id, decision, created_at
            FROM swipes
            WHERE actor_id = $1 AND target_id = $2
            "#,
        )
        .bind(actor_id)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(row.map(|row| SwipeAction {
            actor_id: row.get("actor_id"),
            target_id: row.get("target_id"),
            decision: row.get::<Decision, _>("decision").into(),
            created_at: row.get("created_at"),
        }))
    }

    async fn list_swiped_targets(&self, user_id: &str) -> Result<HashSet<String>, RepoError> {
        let rows = sqlx::query("SELECT target_id FROM swipes WHERE actor_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(repo_err)?;
        Ok(rows.iter().map(|row| row.get("target_id")).collect())
    }

    async fn list_matched_ids(&self, user_id: &str) -> Result<HashSet<String>, RepoError> {
        let rows = sqlx::query(
            "SELECT user_low, user_high FROM matches WHERE user_low = $1 OR user_high = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(repo_err)?;
        Ok(rows
            .iter()
            .map(|row| {
                let low: String = row.get("user_low");
                if low == user_id {
                    row.get("user_high")
                } else {
                    low
                }
            })
            .collect())
    }

    async fn list_blocked_ids(&self, user_id: &str) -> Result<HashSet<String>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT blocked_id AS other FROM blocks WHERE blocker_id = $1
            UNION
            SELECT blocker_id AS other FROM blocks WHERE blocked_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(repo_err)?;
        Ok(rows.iter().map(|row| row.get("other")).collect())
    }

    async fn exclusion_snapshot(&self, user_id: &str) -> Result<ExclusionSnapshot, RepoError> {
        // One repeatable-read transaction so the three sets describe the
        // same moment in time
        let mut tx = self.pool.begin().await.map_err(repo_err)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await
            .map_err(repo_err)?;

        let swiped = Self::swiped_targets_in(&mut tx, user_id)
            .await
            .map_err(repo_err)?;
        let matched = Self::matched_ids_in(&mut tx, user_id)
            .await
            .map_err(repo_err)?;
        let blocked = Self::blocked_ids_in(&mut tx, user_id)
            .await
            .map_err(repo_err)?;

        tx.commit().await.map_err(repo_err)?;

        Ok(ExclusionSnapshot {
            swiped,
            matched,
            blocked,
        })
    }

    async fn create_match_if_absent(
        &self,
        user_a: &str,
        user_b: &str,
        score: u8,
    ) -> Result<MatchRecord, RepoError> {
        let (low, high) = canonical_pair(user_a, user_b);

        sqlx::query(
            r#"
            INSERT INTO matches (id, user_low, user_high, compatibility_score, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (user_low, user_high) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&low)
        .bind(&high)
        .bind(score as i16)
        .execute(&self.pool)
        .await
        .map_err(repo_err)?;

        // Either our insert or the one that beat us to it
        self.fetch_match(&low, &high).await?.ok_or_else(|| {
            RepoError::Transient(format!("match row missing for pair ({}, {})", low, high))
        })
    }

    async fn find_match(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<MatchRecord>, RepoError> {
        let (low, high) = canonical_pair(user_a, user_b);
        self.fetch_match(&low, &high).await
    }

    async fn list_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_low, user_high, compatibility_score, created_at
            FROM matches
            WHERE user_low = $1 OR user_high = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(rows.iter().map(Self::row_to_match).collect())
    }
}

#[async_trait]
impl ChatRepository for PostgresStore {
    async fn count_unread(&self, user_id: &str, match_ids: &[Uuid]) -> Result<u64, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS unread
            FROM messages
            WHERE match_id = ANY($1)
              AND sender_id <> $2
              AND is_read = FALSE
            "#,
        )
        .bind(match_ids)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(row.get::<i64, _>("unread") as u64)
    }
}
