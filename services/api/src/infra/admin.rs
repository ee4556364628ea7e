use std::sync::Arc;

use crate::domain::repository::AdminDirectory;
use crate::domain::types::AdminAccount;
use crate::error::ApiError;

/// Admin accounts fixed at startup from configuration.
#[derive(Clone, Default)]
pub struct StaticAdminDirectory {
    accounts: Arc<Vec<AdminAccount>>,
}

impl StaticAdminDirectory {
    pub fn new(accounts: Vec<AdminAccount>) -> Self {
        Self {
            accounts: Arc::new(accounts),
        }
    }
}

impl AdminDirectory for StaticAdminDirectory {
    async fn find(&self, username: &str) -> Result<Option<AdminAccount>, ApiError> {
        Ok(self
            .accounts
            .iter()
            .find(|account| account.username == username)
            .cloned())
    }
}
