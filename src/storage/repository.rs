use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::domain::Account;

use super::{AccountStore, MIGRATION_001_ACCOUNTS, MIGRATION_002_TRANSACTION_HISTORY};

/// Connection pool tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub max_connections: u32,
    /// How long a writer waits for another writer's lock before giving up
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_connections: 8,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Accounts present on first initialization.
pub fn seed_accounts() -> Vec<Account> {
    vec![
        Account::new(123, "lok", "chandra", "SAVING", 500000),
        Account::new(234, "pawan", "sai", "SAVING", 1000000),
        Account::new(135, "Surendra", "Goud", "SAVINGS", 500000),
    ]
}

/// Owner of the SQLite pool. Hands out connections and transactions scoped to
/// a single request; both are returned to the pool when dropped.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database.
    /// With `create` set the database file is created if it doesn't exist.
    pub async fn connect(database_url: &str, options: StoreOptions, create: bool) -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(create)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(options.busy_timeout)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .connect_with(connect_options)
            .await
            .context("Failed to connect to database")?;

        tracing::debug!(url = database_url, "connected to database");
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_ACCOUNTS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        sqlx::query(MIGRATION_002_TRANSACTION_HISTORY)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 002")?;

        Ok(())
    }

    /// Insert the seed accounts when the accounts table is empty.
    /// Returns the number of accounts inserted.
    pub async fn seed(&self) -> Result<usize> {
        let mut tx = self.begin().await?;
        let mut accounts = AccountStore::new(&mut tx);

        if accounts.count().await? > 0 {
            return Ok(0);
        }

        let seed = seed_accounts();
        for account in &seed {
            accounts.insert(account).await?;
        }
        tx.commit().await.context("Failed to commit seed accounts")?;

        tracing::info!(accounts = seed.len(), "seeded accounts");
        Ok(seed.len())
    }

    /// Initialize a database (connect + migrate + seed).
    pub async fn init(database_url: &str, options: StoreOptions) -> Result<Self> {
        let repo = Self::connect(database_url, options, true).await?;
        repo.migrate().await?;
        repo.seed().await?;
        Ok(repo)
    }

    /// Acquire a pooled connection for a single request.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .context("Failed to acquire database connection")
    }

    /// Begin a transaction. Rolled back on drop unless committed.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .context("Failed to begin transaction")
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
