use chrono::Duration;

use tempmail_api::error::ApiError;
use tempmail_api::usecase::message::{
    DeleteMessageUseCase, GetMessageUseCase, IngestMessageInput, IngestMessageUseCase,
    ListMessagesUseCase,
};
use tempmail_domain::id::MessageId;

use crate::helpers::{
    MemoryStore, authenticated, test_address, test_message, test_session,
};

fn ingest_input(to_email: &str) -> IngestMessageInput {
    IngestMessageInput {
        to_email: to_email.to_owned(),
        from_email: "sender@example.com".to_owned(),
        subject: "Welcome".to_owned(),
        body: "Your verification link".to_owned(),
    }
}

// ── Ingest ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_ingest_message_for_live_address() {
    let store = MemoryStore::new();
    let session = test_session(Duration::hours(1));
    store.insert_address(test_address(&session, "inbox00001"));

    let message = IngestMessageUseCase {
        messages: store.clone(),
        addresses: store.clone(),
    }
    .execute(ingest_input("  INBOX00001@TempMail.Local "))
    .await
    .unwrap();

    assert_eq!(message.to_email, "inbox00001@tempmail.local");
    assert!(!message.is_read);
    assert_eq!(store.lock().messages.len(), 1);
}

#[tokio::test]
async fn should_reject_ingest_for_unknown_address() {
    let store = MemoryStore::new();
    let result = IngestMessageUseCase {
        messages: store.clone(),
        addresses: store,
    }
    .execute(ingest_input("nobody0000@tempmail.local"))
    .await;

    assert!(
        matches!(result, Err(ApiError::AddressNotFound)),
        "expected AddressNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_ingest_for_expired_address() {
    let store = MemoryStore::new();
    let session = test_session(Duration::seconds(-1));
    store.insert_address(test_address(&session, "expired000"));

    let result = IngestMessageUseCase {
        messages: store.clone(),
        addresses: store.clone(),
    }
    .execute(ingest_input("expired000@tempmail.local"))
    .await;

    assert!(
        matches!(result, Err(ApiError::AddressExpired)),
        "expected AddressExpired, got {result:?}"
    );
    assert!(store.lock().messages.is_empty());
}

// ── List ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_messages_across_own_addresses_newest_first() {
    let store = MemoryStore::new();
    let mine = test_session(Duration::hours(1));
    let theirs = test_session(Duration::hours(1));
    let a1 = test_address(&mine, "mine000001");
    let a2 = test_address(&mine, "mine000002");
    let other = test_address(&theirs, "theirs0001");

    let mut older = test_message(&a1.email_address, "older");
    older.received_at -= Duration::minutes(10);
    store.insert_message(older);
    store.insert_message(test_message(&a2.email_address, "newer"));
    store.insert_message(test_message(&other.email_address, "not mine"));
    for a in [a1, a2, other] {
        store.insert_address(a);
    }

    let messages = ListMessagesUseCase { messages: store }
        .execute(authenticated(&mine))
        .await
        .unwrap();

    let subjects: Vec<&str> = messages.iter().map(|m| m.subject.as_str()).collect();
    assert_eq!(subjects, ["newer", "older"]);
}

// ── Get ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_get_own_message_and_mark_read() {
    let store = MemoryStore::new();
    let session = test_session(Duration::hours(1));
    let address = test_address(&session, "reader0001");
    let message = test_message(&address.email_address, "hi");
    let id = message.id;
    store.insert_address(address);
    store.insert_message(message);

    let fetched = GetMessageUseCase {
        messages: store.clone(),
        addresses: store.clone(),
    }
    .execute(id, authenticated(&session))
    .await
    .unwrap();

    assert!(fetched.is_read);
    assert!(store.lock().messages[0].is_read);
}

#[tokio::test]
async fn should_forbid_reading_other_sessions_message() {
    let store = MemoryStore::new();
    let owner = test_session(Duration::hours(1));
    let intruder = test_session(Duration::hours(1));
    let address = test_address(&owner, "private001");
    let message = test_message(&address.email_address, "secret");
    let id = message.id;
    store.insert_address(address);
    store.insert_message(message);

    let result = GetMessageUseCase {
        messages: store.clone(),
        addresses: store.clone(),
    }
    .execute(id, authenticated(&intruder))
    .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
    assert!(!store.lock().messages[0].is_read);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_message() {
    let store = MemoryStore::new();
    let result = GetMessageUseCase {
        messages: store.clone(),
        addresses: store,
    }
    .execute(MessageId::new(), authenticated(&test_session(Duration::hours(1))))
    .await;

    assert!(
        matches!(result, Err(ApiError::MessageNotFound)),
        "expected MessageNotFound, got {result:?}"
    );
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_own_message_then_report_not_found() {
    let store = MemoryStore::new();
    let session = test_session(Duration::hours(1));
    let address = test_address(&session, "delete0001");
    let message = test_message(&address.email_address, "bye");
    let id = message.id;
    store.insert_address(address);
    store.insert_message(message);

    let delete = DeleteMessageUseCase {
        messages: store.clone(),
        addresses: store.clone(),
    };
    delete.execute(id, authenticated(&session)).await.unwrap();

    let listed = ListMessagesUseCase {
        messages: store.clone(),
    }
    .execute(authenticated(&session))
    .await
    .unwrap();
    assert!(listed.is_empty());

    let result = GetMessageUseCase {
        messages: store.clone(),
        addresses: store,
    }
    .execute(id, authenticated(&session))
    .await;
    assert!(
        matches!(result, Err(ApiError::MessageNotFound)),
        "expected MessageNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_forbid_deleting_other_sessions_message() {
    let store = MemoryStore::new();
    let owner = test_session(Duration::hours(1));
    let intruder = test_session(Duration::hours(1));
    let address = test_address(&owner, "keep000001");
    let message = test_message(&address.email_address, "keep");
    let id = message.id;
    store.insert_address(address);
    store.insert_message(message);

    let result = DeleteMessageUseCase {
        messages: store.clone(),
        addresses: store.clone(),
    }
    .execute(id, authenticated(&intruder))
    .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
    assert_eq!(store.lock().messages.len(), 1);
}
