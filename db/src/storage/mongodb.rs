use async_trait::async_trait;
use bson::{Document, doc};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{Client, Collection, Database, IndexModel, options::FindOptions};
use tracing::{debug, info, instrument};

use crate::{
    models::{DbCert, RecordId},
    storage::{CertStore, Storage, StoreError},
};

#[derive(Debug)]
pub struct MongoDBStorage(Client);

impl MongoDBStorage {
    pub async fn new(uri: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self(client))
    }

    fn get_db(&self) -> Database {
        self.0
            .default_database()
            .unwrap_or_else(|| self.0.database("certbox"))
    }

    fn certs(&self) -> Collection<DbCert> {
        self.get_db().collection::<DbCert>(MONGODB_COLLECTION_CERTS)
    }

    /// Create the owner/time index used by [`CertStore::most_recent`].
    ///
    /// Safe to call on every start; MongoDB ignores an identical index.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(owner_newest_first())
            .build();

        let created = self.certs().create_index(index).await?;
        info!(index = %created.index_name, "Ensured certificate index");
        Ok(())
    }
}

pub const MONGODB_COLLECTION_CERTS: &str = "certs";

/// Newest records first. Records written in the same millisecond share a
/// `created_at`, so the monotonic `_id` decides between them.
fn newest_first() -> Document {
    doc! { "created_at": -1, "_id": -1 }
}

fn owner_newest_first() -> Document {
    let mut keys = doc! { "owner": 1 };
    for (key, order) in newest_first() {
        keys.insert(key, order);
    }
    keys
}

#[async_trait]
impl Storage for MongoDBStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        self.get_db().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[async_trait]
impl CertStore for MongoDBStorage {
    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn append(
        &self,
        owner: &str,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, StoreError> {
        let cert = DbCert::new(owner, content, created_at);
        self.certs().insert_one(&cert).await?;

        debug!(id = %cert.id, "Stored certificate");
        Ok(cert.id)
    }

    #[instrument(skip(self))]
    async fn most_recent(&self, owner: &str, limit: usize) -> Result<Vec<DbCert>, StoreError> {
        let find_options = FindOptions::builder()
            .sort(newest_first())
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        self.certs()
            .find(doc! { "owner": owner })
            .with_options(find_options)
            .await?
            .try_collect()
            .await
            .map_err(StoreError::MongoDB)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn sort_breaks_time_ties_by_id() {
        let sort = newest_first();
        let keys: Vec<(&str, i32)> = sort
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_i32().unwrap()))
            .collect();
        assert_eq!(keys, vec![("created_at", -1), ("_id", -1)]);
    }

    #[test]
    fn index_leads_with_owner_then_sort_keys() {
        let index = owner_newest_first();
        let keys: Vec<&str> = index.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["owner", "created_at", "_id"]);
    }

    #[test]
    fn same_millisecond_writes_order_by_id() {
        // What the store keeps: millisecond time, binary id.
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let first = bson::to_document(&DbCert::new("alice@example.com", "one", at)).unwrap();
        let second = bson::to_document(&DbCert::new("alice@example.com", "two", at)).unwrap();

        assert_eq!(first.get("created_at"), second.get("created_at"));
        let (Some(bson::Bson::Binary(a)), Some(bson::Bson::Binary(b))) =
            (first.get("_id"), second.get("_id"))
        else {
            panic!("ids are not stored as binary");
        };
        assert!(b.bytes > a.bytes);
    }
}
