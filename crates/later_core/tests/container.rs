use chrono::{Duration, Utc};
use later_core::{AppContainer, AppError, AuthError, CoreConfig, Locale, Session};

#[test]
fn expired_session_cannot_open_a_scope() {
    let container = AppContainer::in_memory(CoreConfig::default()).unwrap();
    let stale = Session {
        user_id: "u1".to_string(),
        email: None,
        is_anonymous: true,
        access_token: "token".to_string(),
        expires_at: Utc::now() - Duration::seconds(1),
    };

    match container.session_scope(&stale) {
        Err(err) => assert_eq!(err, AppError::Auth(AuthError::SessionExpired)),
        Ok(_) => panic!("expired session opened a scope"),
    }
}

#[test]
fn scope_is_bound_to_the_session_user() {
    let container = AppContainer::in_memory(CoreConfig::default()).unwrap();
    let session = container.auth().sign_in_anonymously().unwrap();
    let scope = container.session_scope(&session).unwrap();

    assert_eq!(scope.user_id(), session.user_id);
    let space = scope
        .space_service()
        .create_space("Home", None, None)
        .unwrap();
    assert_eq!(space.user_id, session.user_id);

    let other = container.auth().sign_in_anonymously().unwrap();
    let other_scope = container.session_scope(&other).unwrap();
    assert!(other_scope.space_service().list_spaces(true).unwrap().is_empty());
}

#[test]
fn file_backed_container_keeps_data_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        db_path: dir.path().join("later.sqlite3"),
        ..CoreConfig::default()
    };

    let token = {
        let container = AppContainer::open(config.clone()).unwrap();
        let session = container.auth().sign_in_anonymously().unwrap();
        container
            .session_scope(&session)
            .unwrap()
            .space_service()
            .create_space("Home", None, None)
            .unwrap();
        session.access_token
    };

    let container = AppContainer::open(config).unwrap();
    let session = container.auth_service().restore_session(&token).unwrap();
    let spaces = container
        .session_scope(&session)
        .unwrap()
        .space_service()
        .list_spaces(false)
        .unwrap();
    assert_eq!(spaces.len(), 1);
}

#[test]
fn messages_follow_configured_locale() {
    let config = CoreConfig {
        locale: Locale::De,
        ..CoreConfig::default()
    };
    let container = AppContainer::in_memory(config).unwrap();
    assert_eq!(container.messages().locale(), Locale::De);
}
