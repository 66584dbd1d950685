use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::PgConnection;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Transaction;

use crate::domain::errors::StorageError;
use crate::domain::transaction::UnitOfWork;

/// Postgres-backed unit of work.
///
/// Every storage call issued through its sessions, including begin, commit
/// and rollback, is bounded by `statement_timeout`.
#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    statement_timeout: Duration,
}

impl PostgresDatabase {
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }
}

enum Handle {
    Pooled(PoolConnection<Postgres>),
    Transaction(Transaction<'static, Postgres>),
}

/// A pooled connection or an open transaction.
pub struct PgSession {
    handle: Handle,
    statement_timeout: Duration,
}

impl PgSession {
    /// Connection that statements of this session run on.
    pub fn connection(&mut self) -> &mut PgConnection {
        match &mut self.handle {
            Handle::Pooled(connection) => &mut **connection,
            Handle::Transaction(transaction) => &mut **transaction,
        }
    }

    pub fn statement_timeout(&self) -> Duration {
        self.statement_timeout
    }
}

/// Await `statement`, failing with `Timeout` once `timeout` elapses.
pub(crate) async fn with_deadline<T, Fut>(
    timeout: Duration,
    statement: Fut,
) -> Result<T, StorageError>
where
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, statement).await {
        Ok(result) => result.map_err(storage_error),
        Err(_) => {
            tracing::warn!(timeout = ?timeout, "storage call exceeded its deadline");
            Err(StorageError::Timeout(timeout))
        }
    }
}

/// Translate a driver error, keeping constraint names of integrity violations.
pub(crate) fn storage_error(error: sqlx::Error) -> StorageError {
    if let Some(db_err) = error.as_database_error() {
        let constraint = db_err.constraint().unwrap_or_default().to_string();
        if db_err.is_unique_violation() {
            return StorageError::UniqueViolation { constraint };
        }
        if db_err.is_foreign_key_violation() {
            return StorageError::ForeignKeyViolation { constraint };
        }
    }
    StorageError::Database(error.to_string())
}

#[async_trait]
impl UnitOfWork for PostgresDatabase {
    type Session = PgSession;

    async fn session(&self) -> Result<PgSession, StorageError> {
        let connection = with_deadline(self.statement_timeout, self.pool.acquire()).await?;
        Ok(PgSession {
            handle: Handle::Pooled(connection),
            statement_timeout: self.statement_timeout,
        })
    }

    async fn begin(&self) -> Result<PgSession, StorageError> {
        let transaction = with_deadline(self.statement_timeout, self.pool.begin()).await?;
        Ok(PgSession {
            handle: Handle::Transaction(transaction),
            statement_timeout: self.statement_timeout,
        })
    }

    async fn commit(&self, session: PgSession) -> Result<(), StorageError> {
        match session.handle {
            Handle::Transaction(transaction) => {
                with_deadline(self.statement_timeout, transaction.commit()).await
            }
            Handle::Pooled(_) => Ok(()),
        }
    }

    async fn rollback(&self, session: PgSession) -> Result<(), StorageError> {
        match session.handle {
            Handle::Transaction(transaction) => {
                with_deadline(self.statement_timeout, transaction.rollback()).await
            }
            Handle::Pooled(_) => Ok(()),
        }
    }
}
