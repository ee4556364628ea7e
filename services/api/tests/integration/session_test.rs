use chrono::{Duration, Utc};

use tempmail_api::domain::types::MAX_SESSION_IPS;
use tempmail_api::error::ApiError;
use tempmail_api::usecase::session::{AuthenticateSessionUseCase, VerifyCodeUseCase};
use tempmail_auth_types::token::Role;
use tempmail_testing::auth::{admin_token, mint_token, session_token};

use crate::helpers::{MemoryStore, TEST_JWT_SECRET, TEST_MAIL_DOMAIN, test_code, test_session};

fn verify(store: &MemoryStore) -> VerifyCodeUseCase<MemoryStore> {
    VerifyCodeUseCase {
        codes: store.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        mail_domain: TEST_MAIL_DOMAIN.to_owned(),
    }
}

fn authenticate(store: &MemoryStore) -> AuthenticateSessionUseCase<MemoryStore> {
    AuthenticateSessionUseCase {
        sessions: store.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

// ── VerifyCode ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_redeem_code_and_provision_initial_address() {
    let store = MemoryStore::new();
    store.insert_code(test_code("ABCD1234", Duration::hours(12), 3));

    let output = verify(&store).execute("ABCD1234").await.unwrap();

    let inner = store.lock();
    assert_eq!(inner.sessions.len(), 1);
    assert_eq!(inner.addresses.len(), 1);
    let code = &inner.codes[0];
    assert!(code.used_at.is_some());
    assert_eq!(code.session_id, Some(output.session.id));

    let session_len = output.session.expires_at - output.session.created_at;
    assert_eq!(session_len, Duration::hours(3));
    assert_eq!(output.address.session_id, output.session.id);
    assert_eq!(output.address.expires_at, output.session.expires_at);
    assert!(output.address.email_address.ends_with("@tempmail.local"));
    assert!(!output.token.is_empty());
}

#[tokio::test]
async fn should_normalize_code_input() {
    let store = MemoryStore::new();
    store.insert_code(test_code("ABCD1234", Duration::hours(1), 1));

    verify(&store).execute("  abcd1234\n").await.unwrap();
}

#[tokio::test]
async fn should_return_not_found_for_unknown_code() {
    let result = verify(&MemoryStore::new()).execute("NOPE0000").await;
    assert!(
        matches!(result, Err(ApiError::CodeNotFound)),
        "expected CodeNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_second_redemption() {
    let store = MemoryStore::new();
    store.insert_code(test_code("ONCE0001", Duration::hours(1), 1));

    verify(&store).execute("ONCE0001").await.unwrap();
    let result = verify(&store).execute("ONCE0001").await;

    assert!(
        matches!(result, Err(ApiError::CodeAlreadyUsed)),
        "expected CodeAlreadyUsed, got {result:?}"
    );
    assert_eq!(store.lock().sessions.len(), 1);
}

#[tokio::test]
async fn should_reject_expired_code_without_issuing_session() {
    let store = MemoryStore::new();
    store.insert_code(test_code("STALE001", Duration::seconds(-1), 1));

    let result = verify(&store).execute("STALE001").await;

    assert!(
        matches!(result, Err(ApiError::CodeExpired)),
        "expected CodeExpired, got {result:?}"
    );
    let inner = store.lock();
    assert!(inner.sessions.is_empty());
    assert!(inner.addresses.is_empty());
    assert!(inner.codes[0].used_at.is_none());
}

#[tokio::test]
async fn should_retry_when_initial_address_collides() {
    let store = MemoryStore::new();
    store.insert_code(test_code("RETRY001", Duration::hours(1), 1));
    store.lock().forced_address_taken = 2;

    verify(&store).execute("RETRY001").await.unwrap();

    assert_eq!(store.lock().sessions.len(), 1);
}

#[tokio::test]
async fn should_redeem_once_under_concurrency() {
    let store = MemoryStore::new();
    store.insert_code(test_code("RACE0001", Duration::hours(1), 1));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let uc = verify(&store);
        handles.push(tokio::spawn(async move { uc.execute("RACE0001").await }));
    }

    let mut redeemed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => redeemed += 1,
            Err(ApiError::CodeAlreadyUsed) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(redeemed, 1);
    assert_eq!(store.lock().sessions.len(), 1);
}

// ── AuthenticateSession ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_authenticate_live_session() {
    let store = MemoryStore::new();
    let session = test_session(Duration::hours(1));
    store.insert_session(session.clone());

    let auth = authenticate(&store)
        .execute(&session_token(session.id.0), Some("10.0.0.1"))
        .await
        .unwrap();

    assert_eq!(auth.session_id, session.id);
    assert_eq!(auth.expires_at, session.expires_at);
}

#[tokio::test]
async fn should_reject_expired_session_even_with_valid_token() {
    let store = MemoryStore::new();
    let mut session = test_session(Duration::hours(1));
    session.expires_at = Utc::now() - Duration::seconds(1);
    store.insert_session(session.clone());

    // Token still valid for an hour; the stored session is not.
    let result = authenticate(&store)
        .execute(&session_token(session.id.0), None)
        .await;

    assert!(
        matches!(result, Err(ApiError::SessionExpired)),
        "expected SessionExpired, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_token() {
    let store = MemoryStore::new();
    let session = test_session(Duration::hours(1));
    store.insert_session(session.clone());
    let token = mint_token(&session.id.to_string(), Role::User, -10);

    let result = authenticate(&store).execute(&token, None).await;

    assert!(
        matches!(result, Err(ApiError::SessionExpired)),
        "expected SessionExpired, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_admin_token_on_session_routes() {
    let result = authenticate(&MemoryStore::new())
        .execute(&admin_token("admin"), None)
        .await;
    assert!(
        matches!(result, Err(ApiError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_session_and_garbage_token() {
    let store = MemoryStore::new();
    let unknown = test_session(Duration::hours(1));

    let result = authenticate(&store)
        .execute(&session_token(unknown.id.0), None)
        .await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));

    let result = authenticate(&store).execute("not-a-jwt", None).await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

#[tokio::test]
async fn should_allow_two_ips_and_reject_third() {
    let store = MemoryStore::new();
    let session = test_session(Duration::hours(1));
    store.insert_session(session.clone());
    let token = session_token(session.id.0);
    let uc = authenticate(&store);

    uc.execute(&token, Some("10.0.0.1")).await.unwrap();
    uc.execute(&token, Some("10.0.0.2")).await.unwrap();
    // Already-bound IPs keep working.
    uc.execute(&token, Some("10.0.0.1")).await.unwrap();

    let result = uc.execute(&token, Some("10.0.0.3")).await;
    assert!(
        matches!(result, Err(ApiError::TooManyDevices)),
        "expected TooManyDevices, got {result:?}"
    );
    assert_eq!(
        store.lock().session_ips[&session.id].len() as u64,
        MAX_SESSION_IPS
    );
}

#[tokio::test]
async fn should_skip_binding_when_ip_unknown() {
    let store = MemoryStore::new();
    let session = test_session(Duration::hours(1));
    store.insert_session(session.clone());

    authenticate(&store)
        .execute(&session_token(session.id.0), None)
        .await
        .unwrap();

    assert!(store.lock().session_ips.is_empty());
}
