use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::RecordId;

/// One uploaded certificate. Records are written once and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbCert {
    #[serde(rename = "_id")]
    pub id: RecordId,

    /// Account identifier of the uploader.
    pub owner: String,

    /// Server time at which the record was written
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    /// Certificate body exactly as uploaded (not parsed)
    pub content: String,
}

impl DbCert {
    pub fn new(
        owner: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            owner: owner.into(),
            created_at,
            content: content.into(),
        }
    }
}
