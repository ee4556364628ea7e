use chrono::Utc;
use tracing::{info, warn};

use tempmail_domain::address::normalize_address;
use tempmail_domain::id::MessageId;

use crate::domain::repository::{AddressRepository, MessageRepository};
use crate::domain::types::{AuthenticatedSession, Message};
use crate::error::ApiError;

/// Load a message and require that its recipient address belongs to `session`.
async fn load_owned<M: MessageRepository, A: AddressRepository>(
    messages: &M,
    addresses: &A,
    id: MessageId,
    session: AuthenticatedSession,
) -> Result<Message, ApiError> {
    let message = messages.find(id).await?.ok_or(ApiError::MessageNotFound)?;
    let owner = addresses.find_by_address(&message.to_email).await?;
    match owner {
        Some(address) if address.session_id == session.session_id => Ok(message),
        _ => {
            warn!(message_id = %id, session_id = %session.session_id, "message access denied");
            Err(ApiError::Forbidden)
        }
    }
}

// ── ListMessages ─────────────────────────────────────────────────────────────

pub struct ListMessagesUseCase<M: MessageRepository> {
    pub messages: M,
}

impl<M: MessageRepository> ListMessagesUseCase<M> {
    pub async fn execute(&self, session: AuthenticatedSession) -> Result<Vec<Message>, ApiError> {
        self.messages.list_for_session(session.session_id).await
    }
}

// ── GetMessage ───────────────────────────────────────────────────────────────

pub struct GetMessageUseCase<M: MessageRepository, A: AddressRepository> {
    pub messages: M,
    pub addresses: A,
}

impl<M: MessageRepository, A: AddressRepository> GetMessageUseCase<M, A> {
    /// Fetching a message marks it read.
    pub async fn execute(
        &self,
        id: MessageId,
        session: AuthenticatedSession,
    ) -> Result<Message, ApiError> {
        let mut message = load_owned(&self.messages, &self.addresses, id, session).await?;
        if !message.is_read {
            self.messages.mark_read(id).await?;
            message.is_read = true;
        }
        Ok(message)
    }
}

// ── DeleteMessage ────────────────────────────────────────────────────────────

pub struct DeleteMessageUseCase<M: MessageRepository, A: AddressRepository> {
    pub messages: M,
    pub addresses: A,
}

impl<M: MessageRepository, A: AddressRepository> DeleteMessageUseCase<M, A> {
    pub async fn execute(&self, id: MessageId, session: AuthenticatedSession) -> Result<(), ApiError> {
        load_owned(&self.messages, &self.addresses, id, session).await?;
        // A concurrent delete may win between the ownership check and here.
        if !self.messages.delete(id).await? {
            return Err(ApiError::MessageNotFound);
        }
        info!(message_id = %id, session_id = %session.session_id, "message deleted");
        Ok(())
    }
}

// ── IngestMessage ────────────────────────────────────────────────────────────

pub struct IngestMessageInput {
    pub to_email: String,
    pub from_email: String,
    pub subject: String,
    pub body: String,
}

pub struct IngestMessageUseCase<M: MessageRepository, A: AddressRepository> {
    pub messages: M,
    pub addresses: A,
}

impl<M: MessageRepository, A: AddressRepository> IngestMessageUseCase<M, A> {
    pub async fn execute(&self, input: IngestMessageInput) -> Result<Message, ApiError> {
        let to_email = normalize_address(&input.to_email);
        let address = self
            .addresses
            .find_by_address(&to_email)
            .await?
            .ok_or(ApiError::AddressNotFound)?;

        let now = Utc::now();
        if address.expires_at <= now {
            return Err(ApiError::AddressExpired);
        }

        let message = Message {
            id: MessageId::new(),
            to_email,
            from_email: input.from_email,
            subject: input.subject,
            body: input.body,
            received_at: now,
            is_read: false,
        };
        self.messages.create(&message).await?;
        info!(message_id = %message.id, address_id = %address.id, "message ingested");
        Ok(message)
    }
}
