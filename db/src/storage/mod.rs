use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{DbCert, RecordId};

pub mod memory;
pub mod mongodb;

/// Number of records the certificate endpoint considers when picking the
/// latest certificate for an account.
pub const RECENT_CERT_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query Error: {0}")]
    MongoDB(#[from] ::mongodb::error::Error),

    #[error(transparent)]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait Storage: CertStore + Send + Sync + 'static {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Append-only certificate storage partitioned by owner.
#[async_trait]
pub trait CertStore {
    /// Write a new record for `owner`. Existing records are never replaced.
    async fn append(
        &self,
        owner: &str,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, StoreError>;

    /// Up to `limit` records owned by `owner`, newest `created_at` first.
    ///
    /// Records sharing a timestamp come back most recently written first.
    async fn most_recent(&self, owner: &str, limit: usize) -> Result<Vec<DbCert>, StoreError>;
}
