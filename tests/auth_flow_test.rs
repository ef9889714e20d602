mod common;

use std::time::Instant;

use common::TestHarness;

use cms_admin_backend::errors::{CredentialError, InternalError};
use cms_admin_backend::types::db::user::Role;

#[tokio::test]
async fn login_returns_token_for_valid_credentials() {
    let harness = TestHarness::new().await;
    harness
        .seed_user("admin@example.com", "correct-password", Role::Admin)
        .await;

    let (user, access_token) = harness
        .coordinator
        .login("admin@example.com", "correct-password", None)
        .await
        .expect("login should succeed");

    assert_eq!(user.email, "admin@example.com");
    assert!(!access_token.is_empty());

    let claims = harness
        .app_data
        .token_service
        .verify_access_token(&access_token)
        .expect("issued token should verify");
    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.role, Role::Admin);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let harness = TestHarness::new().await;
    harness
        .seed_user("admin@example.com", "correct-password", Role::Admin)
        .await;

    let result = harness
        .coordinator
        .login("admin@example.com", "wrong-password", None)
        .await;

    assert!(matches!(
        result,
        Err(InternalError::Credential(CredentialError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn login_rejects_unknown_email_with_same_error() {
    let harness = TestHarness::new().await;
    harness
        .seed_user("admin@example.com", "correct-password", Role::Admin)
        .await;

    let unknown = harness
        .coordinator
        .login("nobody@example.com", "whatever", None)
        .await;
    let wrong = harness
        .coordinator
        .login("admin@example.com", "wrong-password", None)
        .await;

    // Both must fail identically so responses cannot reveal which emails exist
    assert!(matches!(
        unknown,
        Err(InternalError::Credential(CredentialError::InvalidCredentials))
    ));
    assert!(matches!(
        wrong,
        Err(InternalError::Credential(CredentialError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn login_rejects_unknown_email_in_comparable_time() {
    let harness = TestHarness::new().await;
    harness
        .seed_user("admin@example.com", "correct-password", Role::Admin)
        .await;

    // Warm both paths so first-call setup does not skew the samples
    let _ = harness
        .coordinator
        .login("admin@example.com", "wrong-password", None)
        .await;
    let _ = harness
        .coordinator
        .login("nobody@example.com", "wrong-password", None)
        .await;

    let start = Instant::now();
    for _ in 0..5 {
        let _ = harness
            .coordinator
            .login("admin@example.com", "wrong-password", None)
            .await;
    }
    let known = start.elapsed();

    let start = Instant::now();
    for _ in 0..5 {
        let _ = harness
            .coordinator
            .login("nobody@example.com", "wrong-password", None)
            .await;
    }
    let unknown = start.elapsed();

    // Both failure paths pay a bcrypt round. Without the burned round the
    // unknown-email path returns several times faster, which is enough to
    // enumerate accounts.
    assert!(
        known < unknown * 3,
        "known-email rejection took {known:?} vs {unknown:?} for unknown"
    );
    assert!(
        unknown < known * 3,
        "unknown-email rejection took {unknown:?} vs {known:?} for known"
    );
}

#[tokio::test]
async fn login_matches_email_case_insensitively() {
    let harness = TestHarness::new().await;
    harness
        .seed_user("Admin@Example.Com", "correct-password", Role::Admin)
        .await;

    let (user, _token) = harness
        .coordinator
        .login("ADMIN@EXAMPLE.COM", "correct-password", None)
        .await
        .expect("login should succeed regardless of email case");

    assert_eq!(user.email, "admin@example.com");
}

#[tokio::test]
async fn bearer_token_authenticates_request() {
    let harness = TestHarness::new().await;
    let seeded = harness
        .seed_user("editor@example.com", "editor-password", Role::Editor)
        .await;

    let (_user, token) = harness
        .coordinator
        .login("editor@example.com", "editor-password", None)
        .await
        .unwrap();

    let header = format!("Bearer {}", token);
    let authenticated = harness
        .authenticator
        .authenticate(Some(&header))
        .await
        .expect("bearer token should authenticate");

    assert_eq!(authenticated.id, seeded.id);
    assert_eq!(authenticated.role, Role::Editor);
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let harness = TestHarness::new().await;
    harness
        .seed_user("editor@example.com", "old-password", Role::Editor)
        .await;

    let (_user, token) = harness
        .coordinator
        .login("editor@example.com", "old-password", None)
        .await
        .unwrap();
    let header = format!("Bearer {}", token);
    let actor = harness.authenticator.authenticate(Some(&header)).await.unwrap();

    let result = harness
        .coordinator
        .change_password(&actor, "not-the-old-password", "new-password", None)
        .await;

    assert!(matches!(
        result,
        Err(InternalError::Credential(CredentialError::IncorrectPassword))
    ));

    // Old password still works after the failed attempt
    harness
        .coordinator
        .login("editor@example.com", "old-password", None)
        .await
        .expect("old password should remain valid");
}

#[tokio::test]
async fn change_password_replaces_credential() {
    let harness = TestHarness::new().await;
    harness
        .seed_user("editor@example.com", "old-password", Role::Editor)
        .await;

    let (_user, token) = harness
        .coordinator
        .login("editor@example.com", "old-password", None)
        .await
        .unwrap();
    let header = format!("Bearer {}", token);
    let actor = harness.authenticator.authenticate(Some(&header)).await.unwrap();

    harness
        .coordinator
        .change_password(&actor, "old-password", "new-password", None)
        .await
        .expect("password change should succeed");

    let old_login = harness
        .coordinator
        .login("editor@example.com", "old-password", None)
        .await;
    assert!(old_login.is_err());

    harness
        .coordinator
        .login("editor@example.com", "new-password", None)
        .await
        .expect("new password should log in");
}

#[tokio::test]
async fn login_attempts_are_audited() {
    let harness = TestHarness::new().await;
    harness
        .seed_user("admin@example.com", "correct-password", Role::Admin)
        .await;

    harness
        .coordinator
        .login("admin@example.com", "correct-password", Some("203.0.113.7".to_string()))
        .await
        .unwrap();
    let _ = harness
        .coordinator
        .login("admin@example.com", "wrong-password", None)
        .await;

    let events = harness.app_data.audit_store.recent(10).await.unwrap();
    let actions: Vec<&str> = events.iter().map(|e| e.action.as_str()).collect();

    assert!(actions.contains(&"login_success"));
    assert!(actions.contains(&"login_failure"));

    let success = events
        .iter()
        .find(|e| e.action == "login_success")
        .unwrap();
    assert_eq!(success.ip_address.as_deref(), Some("203.0.113.7"));

    // Failed attempts store a fingerprint, never the raw email
    let failure = events
        .iter()
        .find(|e| e.action == "login_failure")
        .unwrap();
    assert!(!failure.data.contains("admin@example.com"));
    assert!(failure.data.contains("sha256:"));
}
