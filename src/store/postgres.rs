// src/store/postgres.rs

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    PgPool, Postgres, QueryBuilder,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};

use super::{QuestionStore, StoreError, StoreResult, check_count};
use crate::{
    config::DatabaseConfig,
    models::question::{NewQuestion, Question},
};

const SELECT_COLUMNS: &str =
    "id, question, answer_a, answer_b, answer_c, answer_d, correct_answer";

const FIELDS_PER_ROW: usize = 6;

/// PostgreSQL caps a statement at 65535 bind parameters.
const MAX_ROWS_PER_INSERT: usize = u16::MAX as usize / FIELDS_PER_ROW;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// PostgreSQL-backed question store.
///
/// Starts Closed. [`PgStore::open`] connects the pool and creates the
/// `questions` table if it does not exist yet; every other operation fails
/// with [`StoreError::NotConnected`] until then.
pub struct PgStore {
    options: PgConnectOptions,
    max_connections: u32,
    pool: Option<PgPool>,
}

impl PgStore {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self::from_options(Self::connect_options(config), config.max_connections)
    }

    pub fn from_options(options: PgConnectOptions, max_connections: u32) -> Self {
        Self {
            options,
            max_connections,
            pool: None,
        }
    }

    /// Builds the connection descriptor. Field contents are left to the driver
    /// to reject.
    pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
        let ssl_mode = if config.sslmode {
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        };

        PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database_name)
            .ssl_mode(ssl_mode)
    }

    pub fn is_open(&self) -> bool {
        self.pool.is_some()
    }

    /// Connects to the database and syncs the schema.
    pub async fn open(&mut self) -> StoreResult<()> {
        if self.pool.is_some() {
            return Ok(());
        }

        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(self.options.clone())
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to the database: {:?}", e);
                StoreError::ConnectionFailed(e.to_string())
            })?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to sync the questions table: {:?}", e);
                StoreError::ConnectionFailed(format!("schema sync failed: {e}"))
            })?;

        self.pool = Some(pool);
        Ok(())
    }

    fn pool(&self) -> StoreResult<&PgPool> {
        self.pool.as_ref().ok_or(StoreError::NotConnected)
    }
}

fn write_failed(e: sqlx::Error) -> StoreError {
    tracing::error!("Error while adding to the database: {:?}", e);
    StoreError::WriteFailed(e.to_string())
}

fn read_failed(e: sqlx::Error) -> StoreError {
    tracing::error!("Error while reading from the database: {:?}", e);
    StoreError::ReadFailed(e.to_string())
}

#[async_trait]
impl QuestionStore for PgStore {
    async fn create(&self, question: NewQuestion) -> StoreResult<Question> {
        let pool = self.pool()?;

        let sql = format!(
            r#"
            INSERT INTO questions (question, answer_a, answer_b, answer_c, answer_d, correct_answer)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SELECT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Question>(&sql)
            .bind(question.question)
            .bind(question.answer_a)
            .bind(question.answer_b)
            .bind(question.answer_c)
            .bind(question.answer_d)
            .bind(question.correct_answer)
            .fetch_one(pool)
            .await
            .map_err(write_failed)
    }

    async fn create_many(&self, questions: Vec<NewQuestion>) -> StoreResult<Vec<Question>> {
        let pool = self.pool()?;

        if questions.is_empty() {
            return Ok(Vec::new());
        }

        // One transaction across all chunks keeps the batch all-or-nothing.
        let mut tx = pool.begin().await.map_err(write_failed)?;
        let mut created = Vec::with_capacity(questions.len());

        for chunk in questions.chunks(MAX_ROWS_PER_INSERT) {
            let mut query_builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO questions (question, answer_a, answer_b, answer_c, answer_d, correct_answer) ",
            );
            query_builder.push_values(chunk, |mut row, q| {
                row.push_bind(q.question.clone())
                    .push_bind(q.answer_a.clone())
                    .push_bind(q.answer_b.clone())
                    .push_bind(q.answer_c.clone())
                    .push_bind(q.answer_d.clone())
                    .push_bind(q.correct_answer.clone());
            });
            query_builder.push(" RETURNING ");
            query_builder.push(SELECT_COLUMNS);

            let rows: Vec<Question> = query_builder
                .build_query_as()
                .fetch_all(&mut *tx)
                .await
                .map_err(write_failed)?;
            created.extend(rows);
        }

        tx.commit().await.map_err(write_failed)?;

        Ok(created)
    }

    async fn get_many(&self, count: i64) -> StoreResult<Vec<Question>> {
        check_count(count)?;
        let pool = self.pool()?;

        let sql = format!("SELECT {SELECT_COLUMNS} FROM questions ORDER BY id LIMIT $1");

        sqlx::query_as::<_, Question>(&sql)
            .bind(count)
            .fetch_all(pool)
            .await
            .map_err(read_failed)
    }

    async fn get_single(&self) -> StoreResult<Question> {
        let pool = self.pool()?;

        let sql = format!("SELECT {SELECT_COLUMNS} FROM questions ORDER BY id LIMIT 1");

        sqlx::query_as::<_, Question>(&sql)
            .fetch_optional(pool)
            .await
            .map_err(read_failed)?
            .ok_or(StoreError::NotFound)
    }

    /// Sorts the whole table by a random key, fine at the expected table size.
    async fn get_random(&self) -> StoreResult<Question> {
        let pool = self.pool()?;

        let sql = format!("SELECT {SELECT_COLUMNS} FROM questions ORDER BY RANDOM() LIMIT 1");

        sqlx::query_as::<_, Question>(&sql)
            .fetch_optional(pool)
            .await
            .map_err(read_failed)?
            .ok_or(StoreError::NotFound)
    }

    async fn count(&self) -> StoreResult<i64> {
        let pool = self.pool()?;

        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
            .fetch_one(pool)
            .await
            .map_err(read_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_store() -> PgStore {
        PgStore::new(&DatabaseConfig::default())
    }

    #[test]
    fn connect_options_follow_config() {
        let config = DatabaseConfig {
            database_name: "quiz".to_string(),
            host: "db.internal".to_string(),
            port: 6543,
            user: "quizmaster".to_string(),
            password: "secret".to_string(),
            sslmode: false,
            max_connections: 2,
        };

        let options = PgStore::connect_options(&config);
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "quizmaster");
        assert_eq!(options.get_database(), Some("quiz"));
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Disable));
    }

    #[test]
    fn sslmode_flag_requires_tls() {
        let config = DatabaseConfig {
            sslmode: true,
            ..DatabaseConfig::default()
        };
        let options = PgStore::connect_options(&config);
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn insert_chunks_stay_under_bind_limit() {
        assert!(MAX_ROWS_PER_INSERT * FIELDS_PER_ROW <= u16::MAX as usize);
    }

    #[tokio::test]
    async fn closed_store_rejects_operations() {
        let store = closed_store();
        assert!(!store.is_open());

        assert!(matches!(
            store.create(NewQuestion::default()).await,
            Err(StoreError::NotConnected)
        ));
        assert!(matches!(
            store.create_many(vec![NewQuestion::default()]).await,
            Err(StoreError::NotConnected)
        ));
        assert!(matches!(store.get_many(3).await, Err(StoreError::NotConnected)));
        assert!(matches!(store.get_single().await, Err(StoreError::NotConnected)));
        assert!(matches!(store.get_random().await, Err(StoreError::NotConnected)));
        assert!(matches!(store.count().await, Err(StoreError::NotConnected)));
    }

    #[tokio::test]
    async fn invalid_count_is_checked_before_connection_state() {
        let store = closed_store();
        assert!(matches!(
            store.get_many(0).await,
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.get_many(-1).await,
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn open_surfaces_connection_failure() {
        // Nothing listens on port 1.
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..DatabaseConfig::default()
        };
        let mut store = PgStore::new(&config);

        let result = store.open().await;
        assert!(matches!(result, Err(StoreError::ConnectionFailed(_))));
        assert!(!store.is_open());
    }
}
