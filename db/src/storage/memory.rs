//! In-memory storage backend.
//!
//! Keeps every record in a map keyed by owner. Suitable for development
//! and tests; data is lost on restart.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    models::{DbCert, RecordId},
    storage::{CertStore, Storage, StoreError},
};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// Records per owner, in write order.
    certs: RwLock<HashMap<String, Vec<DbCert>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records held, across all owners.
    pub fn len(&self) -> usize {
        self.certs
            .read()
            .map(|certs| certs.values().map(Vec::len).sum())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Internal("certificate map lock poisoned".into())
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        self.certs.read().map(|_| ()).map_err(poisoned)
    }
}

#[async_trait]
impl CertStore for MemoryStorage {
    async fn append(
        &self,
        owner: &str,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, StoreError> {
        let cert = DbCert::new(owner, content, created_at);
        let id = cert.id;

        let mut certs = self.certs.write().map_err(poisoned)?;
        certs.entry(owner.to_string()).or_default().push(cert);

        debug!(%owner, %id, "Stored certificate");
        Ok(id)
    }

    async fn most_recent(&self, owner: &str, limit: usize) -> Result<Vec<DbCert>, StoreError> {
        let certs = self.certs.read().map_err(poisoned)?;
        let Some(owned) = certs.get(owner) else {
            return Ok(Vec::new());
        };

        // Newest writes first, then a stable sort keeps that order for ties.
        let mut recent: Vec<DbCert> = owned.iter().rev().cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }
}
