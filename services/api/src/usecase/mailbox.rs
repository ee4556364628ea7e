use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tracing::info;

use tempmail_domain::address::{LOCAL_PART_CHARSET, LOCAL_PART_LEN, compose_address};
use tempmail_domain::id::{AddressId, SessionId};

use crate::domain::repository::AddressRepository;
use crate::domain::types::{AuthenticatedSession, MAX_GENERATE_ATTEMPTS, TempAddress};
use crate::error::ApiError;
use crate::usecase::random_string;

/// Draw a fresh random address owned by `session_id`. Not yet persisted.
pub(crate) fn new_address(
    session_id: SessionId,
    expires_at: DateTime<Utc>,
    domain: &str,
    now: DateTime<Utc>,
) -> TempAddress {
    let local = random_string(LOCAL_PART_CHARSET, LOCAL_PART_LEN);
    TempAddress {
        id: AddressId::new(),
        email_address: compose_address(&local, domain),
        session_id,
        created_at: now,
        expires_at,
    }
}

// ── GenerateAddress ──────────────────────────────────────────────────────────

pub struct GenerateAddressUseCase<A: AddressRepository> {
    pub addresses: A,
    pub mail_domain: String,
}

impl<A: AddressRepository> GenerateAddressUseCase<A> {
    /// The new address expires together with the session.
    pub async fn execute(&self, session: AuthenticatedSession) -> Result<TempAddress, ApiError> {
        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let address = new_address(
                session.session_id,
                session.expires_at,
                &self.mail_domain,
                Utc::now(),
            );
            if self.addresses.create(&address).await? {
                info!(session_id = %session.session_id, address_id = %address.id, "address generated");
                return Ok(address);
            }
        }

        Err(ApiError::Internal(anyhow!(
            "no unique address after {MAX_GENERATE_ATTEMPTS} attempts"
        )))
    }
}

// ── ListAddresses ────────────────────────────────────────────────────────────

pub struct ListAddressesUseCase<A: AddressRepository> {
    pub addresses: A,
}

impl<A: AddressRepository> ListAddressesUseCase<A> {
    pub async fn execute(&self, session: AuthenticatedSession) -> Result<Vec<TempAddress>, ApiError> {
        self.addresses.list_by_session(session.session_id).await
    }
}
