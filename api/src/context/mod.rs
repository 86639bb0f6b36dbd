use std::sync::Arc;

use certbox_db::storage::Storage;

use crate::auth::Authenticator;

/// Services shared by every request handler.
#[derive(Clone)]
pub struct ApiContext {
    pub db: Arc<dyn Storage>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl ApiContext {
    pub fn new(db: Arc<dyn Storage>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self { db, authenticator }
    }
}
