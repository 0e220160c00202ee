//! Integration tests for account registration, credentials, session tokens
//! and scan quota accounting.

use scanledger::config::Config;
use scanledger::services::{AccountError, SessionSigner};
use scanledger::state::SharedState;

const SECRET: &str = "account-test-secret";

async fn spawn_state_with(configure: impl FnOnce(&mut Config)) -> SharedState {
    let db_path = std::env::temp_dir().join(format!(
        "scanledger-account-test-{}.db",
        uuid::Uuid::new_v4()
    ));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.secret_key = SECRET.to_string();
    config.security.pbkdf2_rounds = 1_000;
    configure(&mut config);

    SharedState::new(config)
        .await
        .expect("failed to create shared state")
}

async fn spawn_state() -> SharedState {
    spawn_state_with(|_| {}).await
}

#[tokio::test]
async fn register_applies_defaults() {
    let state = spawn_state().await;

    let user = state
        .accounts
        .register("Ada", "ada@example.com", "correct horse")
        .await
        .unwrap();

    assert_eq!(user.name, "Ada");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.scan_quota, 31);
    assert!(!user.is_admin);
    assert!(user.token.is_none());
    assert!(state.accounts.exists("ada@example.com").await.unwrap());
    assert!(!state.accounts.exists("bob@example.com").await.unwrap());
}

#[tokio::test]
async fn duplicate_registration_leaves_store_unchanged() {
    let state = spawn_state().await;
    let config = state.config();

    let original = state
        .store
        .create_user("Ada", "ada@example.com", "first", &config.security, &config.accounts)
        .await
        .unwrap()
        .expect("first registration should insert");

    let second = state
        .store
        .create_user("Impostor", "ada@example.com", "second", &config.security, &config.accounts)
        .await
        .unwrap();
    assert!(second.is_none());

    let stored = state
        .store
        .get_user_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, original.id);
    assert_eq!(stored.name, "Ada");
    assert!(stored.check_password("first"));
    assert!(!stored.check_password("second"));

    let err = state
        .accounts
        .register("Impostor", "ada@example.com", "second")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::EmailTaken(_)));
}

#[tokio::test]
async fn fetch_by_email_or_id() {
    let state = spawn_state().await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    let by_email = state
        .accounts
        .fetch(Some("ada@example.com"), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user.id);

    let by_id = state.accounts.fetch(None, Some(user.id)).await.unwrap().unwrap();
    assert_eq!(by_id.email, "ada@example.com");

    assert!(
        state
            .accounts
            .fetch(Some("nobody@example.com"), None)
            .await
            .unwrap()
            .is_none()
    );
    assert!(state.accounts.fetch(None, Some(9_999)).await.unwrap().is_none());
}

#[tokio::test]
async fn fetch_without_selector_is_an_error() {
    let state = spawn_state().await;

    let err = state.accounts.fetch(None, None).await.unwrap_err();
    assert!(matches!(err, AccountError::Validation(_)));

    assert!(state.store.fetch_user(None, None).await.is_err());
}

#[tokio::test]
async fn check_password_matches_only_the_original() {
    let state = spawn_state().await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "correct horse")
        .await
        .unwrap();

    assert!(state.accounts.check_password(&user, "correct horse").await.unwrap());
    assert!(!state.accounts.check_password(&user, "correct hors3").await.unwrap());
    assert!(!state.accounts.check_password(&user, "correct horse ").await.unwrap());
}

#[tokio::test]
async fn issued_token_resolves_to_same_user() {
    let state = spawn_state().await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    let token = state.accounts.issue_token(&user, None).await.unwrap();
    let resolved = state.accounts.authenticate(&token).await.unwrap().unwrap();
    assert_eq!(resolved.id, user.id);
    assert_eq!(resolved.email, user.email);
    assert_eq!(resolved.token.as_deref(), Some(token.as_str()));
}

#[tokio::test]
async fn expired_token_yields_none() {
    let state = spawn_state().await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    let token = SessionSigner::new(SECRET, 3600)
        .unwrap()
        .sign(&user.email, user.id, -10)
        .unwrap();
    assert!(state.accounts.authenticate(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn issue_token_rejects_unusable_lifetimes() {
    let state = spawn_state().await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    for expires_in in [0, -10, i64::MAX] {
        let err = state
            .accounts
            .issue_token(&user, Some(expires_in))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }

    let stored = state.accounts.fetch(None, Some(user.id)).await.unwrap().unwrap();
    assert!(stored.token.is_none());
}

#[tokio::test]
async fn foreign_or_malformed_tokens_yield_none() {
    let state = spawn_state().await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    let foreign = SessionSigner::new("some-other-secret", 3600)
        .unwrap()
        .sign(&user.email, user.id, 3600)
        .unwrap();
    assert!(state.accounts.authenticate(&foreign).await.unwrap().is_none());

    assert!(state.accounts.authenticate("garbage").await.unwrap().is_none());
    assert!(state.accounts.authenticate("").await.unwrap().is_none());
}

#[tokio::test]
async fn token_for_unknown_subject_yields_none() {
    let state = spawn_state().await;

    let token = SessionSigner::new(SECRET, 3600)
        .unwrap()
        .sign("ghost@example.com", 42, 3600)
        .unwrap();
    assert!(state.accounts.authenticate(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn newer_token_replaces_remembered_one_without_revoking() {
    let state = spawn_state().await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    let first = state.accounts.issue_token(&user, Some(3600)).await.unwrap();
    let second = state.accounts.issue_token(&user, Some(7200)).await.unwrap();
    assert_ne!(first, second);

    let stored = state.accounts.fetch(None, Some(user.id)).await.unwrap().unwrap();
    assert_eq!(stored.token.as_deref(), Some(second.as_str()));

    // Still signed and unexpired, so still accepted
    assert!(state.accounts.authenticate(&first).await.unwrap().is_some());
    assert!(state.accounts.authenticate(&second).await.unwrap().is_some());
}

#[tokio::test]
async fn logout_clears_remembered_token() {
    let state = spawn_state().await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    state.accounts.issue_token(&user, None).await.unwrap();
    state.accounts.logout(&user).await.unwrap();

    let stored = state.accounts.fetch(None, Some(user.id)).await.unwrap().unwrap();
    assert!(stored.token.is_none());
}

#[tokio::test]
async fn login_checks_credentials() {
    let state = spawn_state().await;
    state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    let token = state.accounts.login("ada@example.com", "pw").await.unwrap();
    let resolved = state.accounts.authenticate(&token).await.unwrap().unwrap();
    assert_eq!(resolved.email, "ada@example.com");

    let err = state.accounts.login("ada@example.com", "PW").await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidCredentials));

    let err = state.accounts.login("nobody@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidCredentials));
}

#[tokio::test]
async fn start_new_report_decrements_quota_without_floor() {
    let state = spawn_state_with(|config| config.accounts.default_scan_quota = 1).await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    let mut expected = 1;
    for _ in 0..3 {
        state
            .accounts
            .start_new_report(&user, "https://example.com", None)
            .await
            .unwrap();
        expected -= 1;

        let stored = state.accounts.fetch(None, Some(user.id)).await.unwrap().unwrap();
        assert_eq!(stored.scan_quota, expected);
    }

    let stored = state.accounts.fetch(None, Some(user.id)).await.unwrap().unwrap();
    assert_eq!(stored.scan_quota, -2);
    assert!(!stored.has_scan_quota());
    assert_eq!(state.reports.list_for_user(user.id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn reduce_scan_quota_returns_new_value() {
    let state = spawn_state().await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    assert_eq!(state.accounts.reduce_scan_quota(&user).await.unwrap(), 30);
    assert_eq!(state.accounts.reduce_scan_quota(&user).await.unwrap(), 29);
}

#[tokio::test]
async fn delete_user_cascades_to_reports() {
    let state = spawn_state().await;
    let ada = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();
    let bob = state
        .accounts
        .register("Bob", "bob@example.com", "pw")
        .await
        .unwrap();

    let first = state
        .accounts
        .start_new_report(&ada, "https://a.example", Some("home"))
        .await
        .unwrap();
    let second = state
        .accounts
        .start_new_report(&ada, "https://b.example", None)
        .await
        .unwrap();
    let kept = state
        .accounts
        .start_new_report(&bob, "https://c.example", None)
        .await
        .unwrap();

    state.accounts.delete_user(&ada).await.unwrap();

    assert!(state.accounts.fetch(None, Some(ada.id)).await.unwrap().is_none());
    assert!(state.reports.fetch(&first.hashid).await.unwrap().is_none());
    assert!(state.reports.fetch(&second.hashid).await.unwrap().is_none());
    assert!(state.reports.fetch(&kept.hashid).await.unwrap().is_some());

    let err = state.accounts.delete_user(&ada).await.unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

#[tokio::test]
async fn admin_flag_can_be_toggled() {
    let state = spawn_state().await;
    let user = state
        .accounts
        .register("Ada", "ada@example.com", "pw")
        .await
        .unwrap();

    state.accounts.set_admin(&user, true).await.unwrap();
    let stored = state.accounts.fetch(None, Some(user.id)).await.unwrap().unwrap();
    assert!(stored.is_admin);

    state.accounts.set_admin(&user, false).await.unwrap();
    let stored = state.accounts.fetch(None, Some(user.id)).await.unwrap().unwrap();
    assert!(!stored.is_admin);
}
