use chrono::{DateTime, Duration, Utc};

use tempmail_domain::access_code::CodeStatus;
use tempmail_domain::id::{AddressId, CodeId, MessageId, SessionId};

/// Admin-issued single-use access code.
#[derive(Debug, Clone)]
pub struct AccessCode {
    pub id: CodeId,
    pub code: String,
    /// Lifetime of the session created by redeeming this code.
    pub duration_hours: u32,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub session_id: Option<SessionId>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl AccessCode {
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn status(&self, now: DateTime<Utc>) -> CodeStatus {
        CodeStatus::at(self.is_used(), self.expires_at, now)
    }

    pub fn session_duration(&self) -> Duration {
        Duration::hours(i64::from(self.duration_hours))
    }
}

/// Session created by redeeming an access code.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub code_id: CodeId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// A session that passed token, expiry and IP-binding checks for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub session_id: SessionId,
    pub expires_at: DateTime<Utc>,
}

/// Disposable address owned by one session.
#[derive(Debug, Clone)]
pub struct TempAddress {
    pub id: AddressId,
    pub email_address: String,
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Inbound message delivered to a temporary address.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub to_email: String,
    pub from_email: String,
    pub subject: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Administrator credential as held by an [`AdminDirectory`](super::repository::AdminDirectory).
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    /// bcrypt hash.
    pub password_hash: String,
}

/// Live counts for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total_codes: u64,
    pub active_codes: u64,
    pub used_codes: u64,
    /// Unused codes whose `expires_at` has passed.
    pub expired_codes: u64,
    pub total_emails: u64,
    pub total_messages: u64,
}

impl Stats {
    /// Build from raw counts; `active_codes` is derived.
    pub fn from_counts(
        total_codes: u64,
        used_codes: u64,
        expired_codes: u64,
        total_emails: u64,
        total_messages: u64,
    ) -> Self {
        Self {
            total_codes,
            active_codes: total_codes.saturating_sub(used_codes + expired_codes),
            used_codes,
            expired_codes,
            total_emails,
            total_messages,
        }
    }
}

/// Result of the redemption transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// Code claimed; session and initial address written.
    Redeemed,
    /// The compare-and-set matched no row: used, expired or deleted meanwhile.
    Lost,
    /// The generated initial address collided; nothing was written.
    AddressTaken,
}

/// Maximum number of distinct client IPs per session.
pub const MAX_SESSION_IPS: u64 = 2;

/// Admin token time-to-live in seconds.
pub const ADMIN_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Attempts at drawing a fresh random code or address before giving up.
pub const MAX_GENERATE_ATTEMPTS: usize = 5;
