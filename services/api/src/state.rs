use std::sync::Arc;

use sea_orm::DatabaseConnection;

use tempmail_core::health::ReadinessProbe;

use crate::infra::admin::StaticAdminDirectory;
use crate::infra::db::{
    DbAccessCodeRepository, DbAddressRepository, DbMessageRepository, DbSessionRepository,
    DbStatsRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub jwt_secret: String,
    pub mail_domain: String,
    pub admins: StaticAdminDirectory,
    /// Take the client IP from `x-forwarded-for` instead of the peer address.
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn access_code_repo(&self) -> DbAccessCodeRepository {
        DbAccessCodeRepository {
            db: Arc::clone(&self.db),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: Arc::clone(&self.db),
        }
    }

    pub fn address_repo(&self) -> DbAddressRepository {
        DbAddressRepository {
            db: Arc::clone(&self.db),
        }
    }

    pub fn message_repo(&self) -> DbMessageRepository {
        DbMessageRepository {
            db: Arc::clone(&self.db),
        }
    }

    pub fn stats_repo(&self) -> DbStatsRepository {
        DbStatsRepository {
            db: Arc::clone(&self.db),
        }
    }
}

impl ReadinessProbe for AppState {
    async fn is_ready(&self) -> bool {
        self.db.ping().await.is_ok()
    }
}
