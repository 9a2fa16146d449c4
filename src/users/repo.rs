use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tracing::{debug, info};

use crate::{
    config::DbConfig,
    error::StoreError,
    users::{password::PasswordScheme, repo_types::User},
};

/// Durable user table. Implementations must be safe to share across requests.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Append a record; the store assigns `id`.
    async fn insert(&self, username: &str, email: &str, password: &str) -> Result<User, StoreError>;

    /// The record matching both fields, or `StoreError::NotFound`.
    /// With duplicate usernames the lowest matching `id` wins.
    async fn find_by_credentials(&self, username: &str, password: &str) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
    scheme: PasswordScheme,
}

impl SqliteUserStore {
    /// Open (creating if absent) the database file and ensure the schema.
    pub async fn connect(cfg: &DbConfig, scheme: PasswordScheme) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::from_str(&cfg.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let mut pool_opts = SqlitePoolOptions::new().max_connections(cfg.max_connections);
        if cfg.url.contains(":memory:") {
            // each connection to :memory: is its own database
            pool_opts = pool_opts
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_opts.connect_with(opts).await?;

        let store = Self::from_pool(pool, scheme);
        store.initialize().await?;
        info!(url = %cfg.url, scheme = ?scheme, "user store ready");
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool, scheme: PasswordScheme) -> Self {
        Self { pool, scheme }
    }

    /// Idempotent.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT,
                email TEXT,
                password TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserRepository for SqliteUserStore {
    async fn insert(&self, username: &str, email: &str, password: &str) -> Result<User, StoreError> {
        let stored = self.scheme.encode(password)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password)
            VALUES (?, ?, ?)
            RETURNING id, username, email, password
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(stored)
        // stepped to completion so the autocommit is done before we return
        .fetch_all(&self.pool)
        .await?
        .pop()
        .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        debug!(user_id = user.id, "user row inserted");
        Ok(user)
    }

    async fn find_by_credentials(&self, username: &str, password: &str) -> Result<User, StoreError> {
        match self.scheme {
            PasswordScheme::Plaintext => sqlx::query_as::<_, User>(
                r#"
                SELECT id, username, email, password
                FROM users
                WHERE username = ? AND password = ?
                ORDER BY id
                LIMIT 1
                "#,
            )
            .bind(username)
            .bind(password)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound),
            PasswordScheme::Argon2 => {
                let candidates = sqlx::query_as::<_, User>(
                    r#"
                    SELECT id, username, email, password
                    FROM users
                    WHERE username = ?
                    ORDER BY id
                    "#,
                )
                .bind(username)
                .fetch_all(&self.pool)
                .await?;

                candidates
                    .into_iter()
                    .find(|u| self.scheme.matches(password, &u.password))
                    .ok_or(StoreError::NotFound)
            }
        }
    }
}
