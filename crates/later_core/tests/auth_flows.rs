use chrono::{DateTime, Duration, TimeZone, Utc};
use later_core::db::open_db_in_memory;
use later_core::repo::auth_repo::{AuthBackend, SqliteAuthBackend};
use later_core::service::auth_service::{
    AuthPolicy, AuthService, SignUpOutcome, MAX_FAILED_SIGN_INS, RATE_LIMIT_WINDOW_SECS,
};
use later_core::{AppError, AuthError, Session};
use rusqlite::Connection;
use std::cell::Cell;
use std::rc::Rc;

const PASSWORD: &str = "correct horse";

fn policy(require_email_confirmation: bool) -> AuthPolicy {
    AuthPolicy {
        session_ttl: Duration::hours(1),
        require_email_confirmation,
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

fn service_at(
    conn: &Connection,
    policy: AuthPolicy,
    now: Rc<Cell<DateTime<Utc>>>,
) -> AuthService<SqliteAuthBackend<'_>> {
    AuthService::with_clock(
        SqliteAuthBackend::new(conn),
        policy,
        Box::new(move || now.get()),
    )
}

fn signed_in(outcome: SignUpOutcome) -> Session {
    match outcome {
        SignUpOutcome::SignedIn(session) => session,
        other => panic!("expected a session, got {other:?}"),
    }
}

fn auth_error(err: AppError) -> AuthError {
    match err {
        AppError::Auth(err) => err,
        other => panic!("expected auth error, got {other}"),
    }
}

#[test]
fn sign_up_then_sign_in_with_normalized_email() {
    let conn = open_db_in_memory().unwrap();
    let clock = Rc::new(Cell::new(start()));
    let auth = service_at(&conn, policy(false), clock.clone());

    let session = signed_in(auth.sign_up(None, " Ada@Example.com ", PASSWORD).unwrap());
    assert_eq!(session.email.as_deref(), Some("ada@example.com"));
    assert!(!session.is_anonymous);
    assert_eq!(session.expires_at, start() + Duration::hours(1));
    auth.sign_out(&session).unwrap();

    let again = auth.sign_in(None, "ADA@example.com", PASSWORD).unwrap();
    assert_eq!(again.user_id, session.user_id);
    assert_ne!(again.access_token, session.access_token);
}

#[test]
fn sign_up_rejects_bad_input_and_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let auth = service_at(&conn, policy(false), Rc::new(Cell::new(start())));

    assert_eq!(
        auth_error(auth.sign_up(None, "not-an-email", PASSWORD).unwrap_err()),
        AuthError::InvalidEmail
    );
    assert_eq!(
        auth_error(auth.sign_up(None, "ada@example.com", "short").unwrap_err()),
        AuthError::WeakPassword
    );
    auth.sign_up(None, "ada@example.com", PASSWORD).unwrap();
    assert_eq!(
        auth_error(auth.sign_up(None, "ADA@example.com", PASSWORD).unwrap_err()),
        AuthError::UserAlreadyExists
    );
}

#[test]
fn active_session_blocks_another_sign_in() {
    let conn = open_db_in_memory().unwrap();
    let auth = service_at(&conn, policy(false), Rc::new(Cell::new(start())));
    let session = auth.sign_in_anonymously(None).unwrap();

    assert_eq!(
        auth_error(auth.sign_in_anonymously(Some(&session)).unwrap_err()),
        AuthError::AlreadyAuthenticated
    );
    assert_eq!(
        auth_error(
            auth.sign_up(Some(&session), "ada@example.com", PASSWORD)
                .unwrap_err()
        ),
        AuthError::AlreadyAuthenticated
    );
}

#[test]
fn wrong_password_is_invalid_credentials() {
    let conn = open_db_in_memory().unwrap();
    let auth = service_at(&conn, policy(false), Rc::new(Cell::new(start())));
    auth.sign_up(None, "ada@example.com", PASSWORD).unwrap();

    assert_eq!(
        auth_error(auth.sign_in(None, "ada@example.com", "wrong pass").unwrap_err()),
        AuthError::InvalidCredentials
    );
    assert_eq!(
        auth_error(auth.sign_in(None, "nobody@example.com", PASSWORD).unwrap_err()),
        AuthError::InvalidCredentials
    );
}

#[test]
fn repeated_failures_lock_out_until_the_window_passes() {
    let conn = open_db_in_memory().unwrap();
    let clock = Rc::new(Cell::new(start()));
    let auth = service_at(&conn, policy(false), clock.clone());
    auth.sign_up(None, "ada@example.com", PASSWORD).unwrap();

    for _ in 0..MAX_FAILED_SIGN_INS {
        assert_eq!(
            auth_error(auth.sign_in(None, "ada@example.com", "wrong pass").unwrap_err()),
            AuthError::InvalidCredentials
        );
    }
    assert_eq!(
        auth_error(auth.sign_in(None, "ada@example.com", PASSWORD).unwrap_err()),
        AuthError::RateLimitExceeded
    );

    clock.set(start() + Duration::seconds(RATE_LIMIT_WINDOW_SECS + 1));
    auth.sign_in(None, "ada@example.com", PASSWORD).unwrap();
    let backend = SqliteAuthBackend::new(&conn);
    assert_eq!(
        backend
            .count_failed_attempts("ada@example.com", start() - Duration::days(1))
            .unwrap(),
        0
    );
}

#[test]
fn confirmation_gate_blocks_sign_in_until_confirmed() {
    let conn = open_db_in_memory().unwrap();
    let auth = service_at(&conn, policy(true), Rc::new(Cell::new(start())));

    let user_id = match auth.sign_up(None, "ada@example.com", PASSWORD).unwrap() {
        SignUpOutcome::ConfirmationRequired { user_id } => user_id,
        other => panic!("expected confirmation, got {other:?}"),
    };
    assert_eq!(
        auth_error(auth.sign_in(None, "ada@example.com", PASSWORD).unwrap_err()),
        AuthError::EmailNotConfirmed
    );

    auth.confirm_email(&user_id).unwrap();
    let session = auth.sign_in(None, "ada@example.com", PASSWORD).unwrap();
    assert_eq!(session.user_id, user_id);
}

#[test]
fn anonymous_upgrade_keeps_user_id_and_revokes_old_token() {
    let conn = open_db_in_memory().unwrap();
    let auth = service_at(&conn, policy(false), Rc::new(Cell::new(start())));

    let guest = auth.sign_in_anonymously(None).unwrap();
    assert!(guest.is_anonymous);
    assert_eq!(guest.email, None);

    let upgraded = auth
        .upgrade_anonymous(&guest, "ada@example.com", PASSWORD)
        .unwrap();
    assert_eq!(upgraded.user_id, guest.user_id);
    assert!(!upgraded.is_anonymous);
    assert_eq!(upgraded.email.as_deref(), Some("ada@example.com"));

    assert_eq!(
        auth_error(auth.restore_session(&guest.access_token).unwrap_err()),
        AuthError::SessionExpired
    );
    assert_eq!(
        auth.restore_session(&upgraded.access_token).unwrap().user_id,
        guest.user_id
    );
}

#[test]
fn upgrading_a_registered_account_fails() {
    let conn = open_db_in_memory().unwrap();
    let auth = service_at(&conn, policy(false), Rc::new(Cell::new(start())));
    let session = signed_in(auth.sign_up(None, "ada@example.com", PASSWORD).unwrap());

    assert_eq!(
        auth_error(
            auth.upgrade_anonymous(&session, "other@example.com", PASSWORD)
                .unwrap_err()
        ),
        AuthError::UpgradeFailed
    );
}

#[test]
fn upgrading_to_a_taken_email_fails() {
    let conn = open_db_in_memory().unwrap();
    let auth = service_at(&conn, policy(false), Rc::new(Cell::new(start())));
    let registered = signed_in(auth.sign_up(None, "ada@example.com", PASSWORD).unwrap());
    auth.sign_out(&registered).unwrap();

    let guest = auth.sign_in_anonymously(None).unwrap();
    assert_eq!(
        auth_error(
            auth.upgrade_anonymous(&guest, "ada@example.com", PASSWORD)
                .unwrap_err()
        ),
        AuthError::UserAlreadyExists
    );
}

#[test]
fn expired_sessions_are_dropped_on_restore() {
    let conn = open_db_in_memory().unwrap();
    let clock = Rc::new(Cell::new(start()));
    let auth = service_at(&conn, policy(false), clock.clone());
    let session = auth.sign_in_anonymously(None).unwrap();
    assert_eq!(
        auth.restore_session(&session.access_token).unwrap(),
        session
    );

    clock.set(session.expires_at);
    assert_eq!(
        auth_error(auth.restore_session(&session.access_token).unwrap_err()),
        AuthError::SessionExpired
    );
    let backend = SqliteAuthBackend::new(&conn);
    assert_eq!(backend.find_session(&session.access_token).unwrap(), None);

    auth.sign_in_anonymously(Some(&session)).unwrap();
}

#[test]
fn unknown_token_is_session_expired() {
    let conn = open_db_in_memory().unwrap();
    let auth = service_at(&conn, policy(false), Rc::new(Cell::new(start())));
    assert_eq!(
        auth_error(auth.restore_session("no-such-token").unwrap_err()),
        AuthError::SessionExpired
    );
}
