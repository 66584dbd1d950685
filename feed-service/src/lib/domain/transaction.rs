use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::domain::errors::StorageError;

/// Source of storage sessions.
///
/// A session is either a plain pooled connection or an open transaction. Both
/// have the same type, so repositories accept one handle and never care which
/// of the two they were given.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    type Session: Send;

    /// Open a session outside any transaction.
    async fn session(&self) -> Result<Self::Session, StorageError>;

    /// Open a session inside a new transaction.
    async fn begin(&self) -> Result<Self::Session, StorageError>;

    /// Commit the session's transaction. Plain sessions are released.
    async fn commit(&self, session: Self::Session) -> Result<(), StorageError>;

    /// Roll the session's transaction back. Plain sessions are released.
    async fn rollback(&self, session: Self::Session) -> Result<(), StorageError>;
}

/// Workflow error that can absorb storage failures and rollback failures.
pub trait TransactionalError: From<StorageError> + Send {
    /// Wrap `self` (the failure that aborted the transaction) together with
    /// the error raised while rolling back.
    fn rollback_failed(self, rollback: StorageError) -> Self;
}

/// Run `operation` inside one transaction.
///
/// Commits when the operation succeeds. On failure the transaction is rolled
/// back and the operation's error is returned; if the rollback fails too, both
/// errors are returned through [`TransactionalError::rollback_failed`]. A
/// failure to begin is returned without invoking the operation.
pub async fn run_in_transaction<U, T, E, F>(unit_of_work: &U, operation: F) -> Result<T, E>
where
    U: UnitOfWork,
    T: Send,
    E: TransactionalError,
    F: for<'s> FnOnce(&'s mut U::Session) -> BoxFuture<'s, Result<T, E>> + Send,
{
    let mut session = unit_of_work.begin().await.map_err(|e| {
        tracing::error!(error = %e, "failed to begin transaction");
        E::from(e)
    })?;

    match operation(&mut session).await {
        Ok(value) => {
            unit_of_work.commit(session).await.map_err(|e| {
                tracing::error!(error = %e, "failed to commit transaction");
                E::from(e)
            })?;
            Ok(value)
        }
        Err(error) => match unit_of_work.rollback(session).await {
            Ok(()) => Err(error),
            Err(rollback) => {
                tracing::error!(error = %rollback, "failed to rollback transaction");
                Err(error.rollback_failed(rollback))
            }
        },
    }
}
