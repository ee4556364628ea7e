use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionError, TransactionTrait,
};

use tempmail_api_schema::{access_codes, email_messages, session_ips, sessions, temp_addresses};
use tempmail_domain::id::{CodeId, MessageId, SessionId};

use crate::domain::repository::{
    AccessCodeRepository, AddressRepository, MessageRepository, SessionRepository,
    StatsRepository,
};
use crate::domain::types::{AccessCode, Message, RedeemOutcome, Session, Stats, TempAddress};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── AccessCode repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccessCodeRepository {
    pub db: Arc<DatabaseConnection>,
}

/// Reasons the redemption transaction rolls back.
#[derive(Debug, thiserror::Error)]
enum RedeemAbort {
    #[error("code no longer redeemable")]
    Lost,
    #[error("initial address already taken")]
    AddressTaken,
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl AccessCodeRepository for DbAccessCodeRepository {
    async fn create(&self, code: &AccessCode) -> Result<bool, ApiError> {
        let duration_hours =
            i32::try_from(code.duration_hours).context("access code duration out of range")?;
        let result = access_codes::Entity::insert(access_codes::ActiveModel {
            id: Set(code.id.0),
            code: Set(code.code.clone()),
            duration_hours: Set(duration_hours),
            expires_at: Set(code.expires_at),
            used_at: Set(None),
            session_id: Set(None),
            created_by: Set(code.created_by.clone()),
            created_at: Set(code.created_at),
        })
        .exec_without_returning(self.db.as_ref())
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if is_unique_violation(&err) => Ok(false),
            Err(err) => Err(anyhow::Error::new(err).context("create access code").into()),
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<AccessCode>, ApiError> {
        let model = access_codes::Entity::find()
            .filter(access_codes::Column::Code.eq(code))
            .one(self.db.as_ref())
            .await
            .context("find access code")?;
        Ok(model.map(access_code_from_model))
    }

    async fn list(&self) -> Result<Vec<AccessCode>, ApiError> {
        let models = access_codes::Entity::find()
            .order_by_desc(access_codes::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .context("list access codes")?;
        Ok(models.into_iter().map(access_code_from_model).collect())
    }

    async fn delete(&self, id: CodeId) -> Result<bool, ApiError> {
        let result = access_codes::Entity::delete_by_id(id.0)
            .exec(self.db.as_ref())
            .await
            .context("delete access code")?;
        Ok(result.rows_affected > 0)
    }

    async fn redeem(
        &self,
        code_id: CodeId,
        session: &Session,
        address: &TempAddress,
    ) -> Result<RedeemOutcome, ApiError> {
        let result = self
            .db
            .transaction::<_, (), RedeemAbort>(|txn| {
                let session = session.clone();
                let address = address.clone();
                Box::pin(async move {
                    claim_code(txn, code_id, &session).await?;
                    insert_session(txn, &session).await?;
                    insert_address(txn, &address).await.map_err(|err| {
                        if is_unique_violation(&err) {
                            RedeemAbort::AddressTaken
                        } else {
                            RedeemAbort::Db(err)
                        }
                    })?;
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(RedeemOutcome::Redeemed),
            Err(TransactionError::Transaction(RedeemAbort::Lost)) => Ok(RedeemOutcome::Lost),
            Err(TransactionError::Transaction(RedeemAbort::AddressTaken)) => {
                Ok(RedeemOutcome::AddressTaken)
            }
            Err(TransactionError::Transaction(RedeemAbort::Db(err)))
            | Err(TransactionError::Connection(err)) => {
                Err(anyhow::Error::new(err).context("redeem access code").into())
            }
        }
    }
}

/// Compare-and-set `unused and unexpired` to `used`. Exactly one row or [`RedeemAbort::Lost`].
async fn claim_code(
    txn: &DatabaseTransaction,
    code_id: CodeId,
    session: &Session,
) -> Result<(), RedeemAbort> {
    let result = access_codes::Entity::update_many()
        .col_expr(access_codes::Column::UsedAt, Expr::value(session.created_at))
        .col_expr(access_codes::Column::SessionId, Expr::value(session.id.0))
        .filter(access_codes::Column::Id.eq(code_id.0))
        .filter(access_codes::Column::UsedAt.is_null())
        .filter(access_codes::Column::ExpiresAt.gt(session.created_at))
        .exec(txn)
        .await?;
    if result.rows_affected != 1 {
        return Err(RedeemAbort::Lost);
    }
    Ok(())
}

async fn insert_session(txn: &DatabaseTransaction, session: &Session) -> Result<(), DbErr> {
    sessions::Entity::insert(sessions::ActiveModel {
        id: Set(session.id.0),
        code_id: Set(session.code_id.0),
        expires_at: Set(session.expires_at),
        created_at: Set(session.created_at),
    })
    .exec_without_returning(txn)
    .await?;
    Ok(())
}

async fn insert_address<C: sea_orm::ConnectionTrait>(
    conn: &C,
    address: &TempAddress,
) -> Result<(), DbErr> {
    temp_addresses::Entity::insert(temp_addresses::ActiveModel {
        id: Set(address.id.0),
        email_address: Set(address.email_address.clone()),
        session_id: Set(address.session_id.0),
        created_at: Set(address.created_at),
        expires_at: Set(address.expires_at),
    })
    .exec_without_returning(conn)
    .await?;
    Ok(())
}

fn access_code_from_model(model: access_codes::Model) -> AccessCode {
    AccessCode {
        id: model.id.into(),
        code: model.code,
        duration_hours: u32::try_from(model.duration_hours).unwrap_or_default(),
        expires_at: model.expires_at,
        used_at: model.used_at,
        session_id: model.session_id.map(SessionId::from),
        created_by: model.created_by,
        created_at: model.created_at,
    }
}

// ── Session repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: Arc<DatabaseConnection>,
}

impl SessionRepository for DbSessionRepository {
    async fn find(&self, id: SessionId) -> Result<Option<Session>, ApiError> {
        let model = sessions::Entity::find_by_id(id.0)
            .one(self.db.as_ref())
            .await
            .context("find session")?;
        Ok(model.map(|m| Session {
            id: m.id.into(),
            code_id: m.code_id.into(),
            expires_at: m.expires_at,
            created_at: m.created_at,
        }))
    }

    async fn bind_ip(&self, id: SessionId, ip: &str, limit: u64) -> Result<bool, ApiError> {
        let ip = ip.to_owned();
        let bound = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    // Row lock serializes concurrent binds for this session.
                    let locked = sessions::Entity::find_by_id(id.0)
                        .lock_exclusive()
                        .one(txn)
                        .await?;
                    if locked.is_none() {
                        return Ok(false);
                    }

                    let bound = session_ips::Entity::find()
                        .filter(session_ips::Column::SessionId.eq(id.0))
                        .all(txn)
                        .await?;
                    if bound.iter().any(|row| row.ip == ip) {
                        return Ok(true);
                    }
                    if bound.len() as u64 >= limit {
                        return Ok(false);
                    }

                    session_ips::Entity::insert(session_ips::ActiveModel {
                        session_id: Set(id.0),
                        ip: Set(ip.clone()),
                        bound_at: Set(Utc::now()),
                    })
                    .exec_without_returning(txn)
                    .await?;
                    tracing::info!(session_id = %id, ip = %ip, "session bound to ip");
                    Ok(true)
                })
            })
            .await
            .context("bind session ip")?;
        Ok(bound)
    }
}

// ── Address repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAddressRepository {
    pub db: Arc<DatabaseConnection>,
}

impl AddressRepository for DbAddressRepository {
    async fn create(&self, address: &TempAddress) -> Result<bool, ApiError> {
        match insert_address(self.db.as_ref(), address).await {
            Ok(()) => Ok(true),
            Err(err) if is_unique_violation(&err) => Ok(false),
            Err(err) => Err(anyhow::Error::new(err).context("create address").into()),
        }
    }

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<TempAddress>, ApiError> {
        let models = temp_addresses::Entity::find()
            .filter(temp_addresses::Column::SessionId.eq(session_id.0))
            .order_by_asc(temp_addresses::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .context("list addresses by session")?;
        Ok(models.into_iter().map(address_from_model).collect())
    }

    async fn find_by_address(
        &self,
        email_address: &str,
    ) -> Result<Option<TempAddress>, ApiError> {
        let model = temp_addresses::Entity::find()
            .filter(temp_addresses::Column::EmailAddress.eq(email_address))
            .one(self.db.as_ref())
            .await
            .context("find address")?;
        Ok(model.map(address_from_model))
    }
}

fn address_from_model(model: temp_addresses::Model) -> TempAddress {
    TempAddress {
        id: model.id.into(),
        email_address: model.email_address,
        session_id: model.session_id.into(),
        created_at: model.created_at,
        expires_at: model.expires_at,
    }
}

// ── Message repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMessageRepository {
    pub db: Arc<DatabaseConnection>,
}

impl MessageRepository for DbMessageRepository {
    async fn create(&self, message: &Message) -> Result<(), ApiError> {
        email_messages::Entity::insert(email_messages::ActiveModel {
            id: Set(message.id.0),
            to_email: Set(message.to_email.clone()),
            from_email: Set(message.from_email.clone()),
            subject: Set(message.subject.clone()),
            body: Set(message.body.clone()),
            received_at: Set(message.received_at),
            is_read: Set(message.is_read),
        })
        .exec_without_returning(self.db.as_ref())
        .await
        .context("create message")?;
        Ok(())
    }

    async fn list_for_session(&self, session_id: SessionId) -> Result<Vec<Message>, ApiError> {
        let addresses: Vec<String> = temp_addresses::Entity::find()
            .select_only()
            .column(temp_addresses::Column::EmailAddress)
            .filter(temp_addresses::Column::SessionId.eq(session_id.0))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .context("list session addresses")?;
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        let models = email_messages::Entity::find()
            .filter(email_messages::Column::ToEmail.is_in(addresses))
            .order_by_desc(email_messages::Column::ReceivedAt)
            .all(self.db.as_ref())
            .await
            .context("list messages for session")?;
        Ok(models.into_iter().map(message_from_model).collect())
    }

    async fn find(&self, id: MessageId) -> Result<Option<Message>, ApiError> {
        let model = email_messages::Entity::find_by_id(id.0)
            .one(self.db.as_ref())
            .await
            .context("find message")?;
        Ok(model.map(message_from_model))
    }

    async fn mark_read(&self, id: MessageId) -> Result<(), ApiError> {
        email_messages::Entity::update_many()
            .col_expr(email_messages::Column::IsRead, Expr::value(true))
            .filter(email_messages::Column::Id.eq(id.0))
            .exec(self.db.as_ref())
            .await
            .context("mark message read")?;
        Ok(())
    }

    async fn delete(&self, id: MessageId) -> Result<bool, ApiError> {
        let result = email_messages::Entity::delete_by_id(id.0)
            .exec(self.db.as_ref())
            .await
            .context("delete message")?;
        Ok(result.rows_affected > 0)
    }
}

fn message_from_model(model: email_messages::Model) -> Message {
    Message {
        id: model.id.into(),
        to_email: model.to_email,
        from_email: model.from_email,
        subject: model.subject,
        body: model.body,
        received_at: model.received_at,
        is_read: model.is_read,
    }
}

// ── Stats repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStatsRepository {
    pub db: Arc<DatabaseConnection>,
}

impl StatsRepository for DbStatsRepository {
    async fn snapshot(&self, now: DateTime<Utc>) -> Result<Stats, ApiError> {
        // All five counts from one snapshot.
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await
            .context("begin stats snapshot")?;

        let total_codes = access_codes::Entity::find()
            .count(&txn)
            .await
            .context("count codes")?;
        let used_codes = access_codes::Entity::find()
            .filter(access_codes::Column::UsedAt.is_not_null())
            .count(&txn)
            .await
            .context("count used codes")?;
        let expired_codes = access_codes::Entity::find()
            .filter(access_codes::Column::UsedAt.is_null())
            .filter(access_codes::Column::ExpiresAt.lte(now))
            .count(&txn)
            .await
            .context("count expired codes")?;
        let total_emails = temp_addresses::Entity::find()
            .count(&txn)
            .await
            .context("count addresses")?;
        let total_messages = email_messages::Entity::find()
            .count(&txn)
            .await
            .context("count messages")?;

        txn.commit().await.context("end stats snapshot")?;
        Ok(Stats::from_counts(
            total_codes,
            used_codes,
            expired_codes,
            total_emails,
            total_messages,
        ))
    }
}
