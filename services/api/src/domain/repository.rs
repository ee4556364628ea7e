#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use tempmail_domain::id::{CodeId, MessageId, SessionId};

use crate::domain::types::{
    AccessCode, AdminAccount, Message, RedeemOutcome, Session, Stats, TempAddress,
};
use crate::error::ApiError;

/// Repository for admin-issued access codes.
pub trait AccessCodeRepository: Send + Sync {
    /// Insert a new code. Returns `false` if the code string is already taken.
    async fn create(&self, code: &AccessCode) -> Result<bool, ApiError>;

    /// Find a code by its (normalized) string, regardless of state.
    async fn find_by_code(&self, code: &str) -> Result<Option<AccessCode>, ApiError>;

    /// All codes, newest first.
    async fn list(&self) -> Result<Vec<AccessCode>, ApiError>;

    /// Delete a code. Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: CodeId) -> Result<bool, ApiError>;

    /// Claim the code and create its session plus initial address atomically.
    ///
    /// The claim is a compare-and-set on "unused and unexpired at
    /// `session.created_at`"; at most one caller per code sees `Redeemed`.
    async fn redeem(
        &self,
        code_id: CodeId,
        session: &Session,
        address: &TempAddress,
    ) -> Result<RedeemOutcome, ApiError>;
}

/// Repository for user sessions and their IP bindings.
pub trait SessionRepository: Send + Sync {
    async fn find(&self, id: SessionId) -> Result<Option<Session>, ApiError>;

    /// Bind `ip` to the session. Returns `true` if the IP is (now) bound,
    /// `false` if the session already holds `limit` other IPs.
    async fn bind_ip(&self, id: SessionId, ip: &str, limit: u64) -> Result<bool, ApiError>;
}

/// Repository for temporary addresses.
pub trait AddressRepository: Send + Sync {
    /// Insert a new address. Returns `false` if the address is already taken.
    async fn create(&self, address: &TempAddress) -> Result<bool, ApiError>;

    /// Addresses owned by a session, oldest first.
    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<TempAddress>, ApiError>;

    async fn find_by_address(&self, email_address: &str)
    -> Result<Option<TempAddress>, ApiError>;
}

/// Repository for received messages.
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> Result<(), ApiError>;

    /// Messages addressed to any address owned by the session, newest first.
    async fn list_for_session(&self, session_id: SessionId) -> Result<Vec<Message>, ApiError>;

    async fn find(&self, id: MessageId) -> Result<Option<Message>, ApiError>;

    async fn mark_read(&self, id: MessageId) -> Result<(), ApiError>;

    /// Delete a message. Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: MessageId) -> Result<bool, ApiError>;
}

/// Derived counts over codes, addresses and messages.
pub trait StatsRepository: Send + Sync {
    async fn snapshot(&self, now: DateTime<Utc>) -> Result<Stats, ApiError>;
}

/// Source of administrator credentials.
pub trait AdminDirectory: Send + Sync {
    async fn find(&self, username: &str) -> Result<Option<AdminAccount>, ApiError>;
}
