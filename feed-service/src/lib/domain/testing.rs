//! In-memory unit of work shared by the workflow tests.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::errors::StorageError;
use crate::domain::transaction::UnitOfWork;

/// Session handed to mocked repositories.
#[derive(Debug, Default)]
pub struct FakeSession {
    transactional: bool,
    work: Vec<String>,
}

impl FakeSession {
    pub fn record(&mut self, entry: &str) {
        self.work.push(entry.to_string());
    }

    pub fn is_transactional(&self) -> bool {
        self.transactional
    }
}

/// Unit of work that counts transaction outcomes.
#[derive(Debug, Default)]
pub struct FakeUnitOfWork {
    begins: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    committed: Mutex<Vec<String>>,
    fail_begin: bool,
    fail_commit: bool,
    fail_rollback: bool,
}

impl FakeUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_begin(mut self) -> Self {
        self.fail_begin = true;
        self
    }

    pub fn failing_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub fn failing_rollback(mut self) -> Self {
        self.fail_rollback = true;
        self
    }

    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    pub fn committed_work(&self) -> Vec<String> {
        self.committed.lock().unwrap().clone()
    }
}

#[async_trait]
impl UnitOfWork for FakeUnitOfWork {
    type Session = FakeSession;

    async fn session(&self) -> Result<FakeSession, StorageError> {
        Ok(FakeSession::default())
    }

    async fn begin(&self) -> Result<FakeSession, StorageError> {
        if self.fail_begin {
            return Err(StorageError::Database("begin refused".to_string()));
        }
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(FakeSession {
            transactional: true,
            work: Vec::new(),
        })
    }

    async fn commit(&self, session: FakeSession) -> Result<(), StorageError> {
        if self.fail_commit {
            return Err(StorageError::Database("commit refused".to_string()));
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.committed.lock().unwrap().extend(session.work);
        Ok(())
    }

    async fn rollback(&self, _session: FakeSession) -> Result<(), StorageError> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        if self.fail_rollback {
            return Err(StorageError::Database("rollback refused".to_string()));
        }
        Ok(())
    }
}
