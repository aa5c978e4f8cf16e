//! End-to-end session lifecycle through the public API.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, TimeZone, Utc};
use setsisaw_auth::{
    AuthError, AuthErrorKind, InMemoryCredentialStore, NewAccount, PasswordHasher,
    SessionConfig, SessionManager, SigningSecret,
};
use setsisaw_core::Role;
use std::sync::Arc;

const T0: i64 = 1_700_000_000;

fn at(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).unwrap()
}

fn manager() -> SessionManager {
    SessionManager::new(
        SigningSecret::new("integration-test-secret").unwrap(),
        SessionConfig::default(),
        Arc::new(InMemoryCredentialStore::new()),
    )
    .with_hasher(PasswordHasher::with_params(1024, 1, 1).unwrap())
}

async fn sign_up(m: &SessionManager, username: &str, password: &str) {
    m.sign_up(NewAccount {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: password.to_string(),
        ..Default::default()
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_alice_lifecycle() {
    let m = manager();
    sign_up(&m, "alice", "hunter2").await;

    // Sign in: T1 valid for five minutes
    let t1 = m.sign_in_at("alice", "hunter2", at(T0)).await.unwrap();
    let c1 = m.get_claims_at(&t1, at(T0)).unwrap();
    assert_eq!(c1.username, "alice");
    assert_eq!(c1.role, Role::User);
    assert_eq!(c1.exp, T0 + 300);

    // Immediate refresh is too early
    let err = m.refresh_token_at(&t1, at(T0)).unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::TooEarly);
    assert_eq!(err.status_code(), 400);

    // Four and a half minutes in, 30 seconds remain
    let now = at(T0) + Duration::seconds(270);
    let t2 = m.refresh_token_at(&t1, now).unwrap();
    let c2 = m.get_claims_at(&t2, now).unwrap();

    assert_eq!(c2.username, c1.username);
    assert_eq!(c2.id, c1.id);
    assert_eq!(c2.role, c1.role);
    assert_eq!(c2.exp, now.timestamp() + 300);

    // T1 still expires on its own schedule
    assert_eq!(
        m.get_claims_at(&t1, at(T0 + 301)).unwrap_err(),
        AuthError::Expired
    );
    assert!(m.get_claims_at(&t2, at(T0 + 301)).is_ok());
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_the_same() {
    let m = manager();
    sign_up(&m, "real_user", "right").await;

    assert!(!m.authenticate("ghost_user", "anything").await);
    assert!(!m.authenticate("real_user", "wrong").await);

    let ghost = m.sign_in("ghost_user", "anything").await.unwrap_err();
    let wrong = m.sign_in("real_user", "wrong").await.unwrap_err();

    assert_eq!(ghost, wrong);
    assert_eq!(ghost.kind(), AuthErrorKind::Unauthorized);
    assert_eq!(ghost.description(), wrong.description());
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let m = manager();
    sign_up(&m, "alice", "pw").await;
    let token = m.sign_in_at("alice", "pw", at(T0)).await.unwrap();

    // Swap the payload for one claiming ADMIN, keep the original signature
    let parts: Vec<&str> = token.split('.').collect();
    let forged_payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"username":"alice","id":"1","role":"ADMIN","iat":{T0},"exp":{}}}"#,
        T0 + 300
    ));
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    let err = m.get_claims_at(&forged, at(T0)).unwrap_err();
    assert_eq!(err, AuthError::InvalidSignature);
}

#[tokio::test]
async fn test_entitlement_from_verified_claims() {
    let m = manager();
    sign_up(&m, "alice", "pw").await;
    let token = m.sign_in("alice", "pw").await.unwrap();
    let claims = m.get_claims(&token).unwrap();

    assert!(m.is_entitled(&claims, Role::User));
    assert!(!m.is_entitled(&claims, Role::Editor));
    assert!(!m.is_entitled(&claims, Role::Admin));
}
