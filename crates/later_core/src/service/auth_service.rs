//! Authentication use-cases and session policy.
//!
//! # Responsibility
//! - Validate credentials before they reach the backend.
//! - Enforce sign-in rate limits, session expiry and email confirmation.
//!
//! # Invariants
//! - At most one session is active per caller; starting another fails
//!   with `AlreadyAuthenticated`.
//! - After `MAX_FAILED_SIGN_INS` failures inside `RATE_LIMIT_WINDOW_SECS` an
//!   email is locked out until the window passes.
//! - Upgrading keeps the anonymous user id, so owned content carries over.

use crate::config::CoreConfig;
use crate::error::{AppResult, AuthError};
use crate::model::session::Session;
use crate::repo::auth_repo::AuthBackend;
use crate::service::validation;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};

pub const MAX_FAILED_SIGN_INS: u32 = 5;
pub const RATE_LIMIT_WINDOW_SECS: i64 = 15 * 60;

/// Session and confirmation rules applied by [`AuthService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthPolicy {
    pub session_ttl: Duration,
    pub require_email_confirmation: bool,
}

impl From<&CoreConfig> for AuthPolicy {
    fn from(config: &CoreConfig) -> Self {
        Self {
            session_ttl: config.session_ttl,
            require_email_confirmation: config.require_email_confirmation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    /// Account created; a session is issued only after confirmation.
    ConfirmationRequired { user_id: String },
}

pub type Clock = Box<dyn Fn() -> DateTime<Utc>>;

pub struct AuthService<B: AuthBackend> {
    backend: B,
    policy: AuthPolicy,
    clock: Clock,
}

impl<B: AuthBackend> AuthService<B> {
    pub fn new(backend: B, policy: AuthPolicy) -> Self {
        Self::with_clock(backend, policy, Box::new(Utc::now))
    }

    pub fn with_clock(backend: B, policy: AuthPolicy, clock: Clock) -> Self {
        Self {
            backend,
            policy,
            clock,
        }
    }

    pub fn sign_up(
        &self,
        current: Option<&Session>,
        email: &str,
        password: &str,
    ) -> AppResult<SignUpOutcome> {
        self.ensure_signed_out(current)?;
        let email = validation::email(email)?;
        validation::password(password)?;

        let now = (self.clock)();
        let user = self.backend.create_user(&email, password, now)?;
        info!(
            "event=auth_sign_up module=service status=ok user_id={}",
            user.id
        );
        if self.policy.require_email_confirmation {
            return Ok(SignUpOutcome::ConfirmationRequired { user_id: user.id });
        }
        let session = self
            .backend
            .create_session(&user, now + self.policy.session_ttl)?;
        Ok(SignUpOutcome::SignedIn(session))
    }

    pub fn confirm_email(&self, user_id: &str) -> AppResult<()> {
        self.backend.confirm_email(user_id)
    }

    pub fn sign_in(
        &self,
        current: Option<&Session>,
        email: &str,
        password: &str,
    ) -> AppResult<Session> {
        self.ensure_signed_out(current)?;
        let email = validation::email(email)?;
        let now = (self.clock)();

        let failures = self
            .backend
            .count_failed_attempts(&email, now - Duration::seconds(RATE_LIMIT_WINDOW_SECS))?;
        if failures >= MAX_FAILED_SIGN_INS {
            warn!("event=auth_sign_in module=service status=error error_code=rate_limited");
            return Err(AuthError::RateLimitExceeded.into());
        }

        let Some(user) = self.backend.verify_credentials(&email, password)? else {
            self.backend.record_failed_attempt(&email, now)?;
            warn!(
                "event=auth_sign_in module=service status=error error_code=invalid_credentials"
            );
            return Err(AuthError::InvalidCredentials.into());
        };
        if self.policy.require_email_confirmation && !user.email_confirmed {
            return Err(AuthError::EmailNotConfirmed.into());
        }

        self.backend.clear_failed_attempts(&email)?;
        let session = self
            .backend
            .create_session(&user, now + self.policy.session_ttl)?;
        info!(
            "event=auth_sign_in module=service status=ok user_id={}",
            session.user_id
        );
        Ok(session)
    }

    pub fn sign_in_anonymously(&self, current: Option<&Session>) -> AppResult<Session> {
        self.ensure_signed_out(current)?;
        let now = (self.clock)();
        let session = self
            .backend
            .create_anonymous_user(now)
            .and_then(|user| {
                self.backend
                    .create_session(&user, now + self.policy.session_ttl)
            })
            .map_err(|err| {
                warn!(
                    "event=auth_sign_in_anonymous module=service status=error error_code={}",
                    err.message_key()
                );
                AuthError::AnonymousSignInFailed
            })?;
        info!(
            "event=auth_sign_in_anonymous module=service status=ok user_id={}",
            session.user_id
        );
        Ok(session)
    }

    /// Converts an anonymous session into an email/password account.
    ///
    /// The old token is revoked and a fresh session is returned for the same
    /// user id.
    pub fn upgrade_anonymous(
        &self,
        current: &Session,
        email: &str,
        password: &str,
    ) -> AppResult<Session> {
        self.ensure_live(current)?;
        if !current.is_anonymous {
            return Err(AuthError::UpgradeFailed.into());
        }
        let email = validation::email(email)?;
        validation::password(password)?;

        let user = self
            .backend
            .attach_credentials(&current.user_id, &email, password)?;
        self.backend.delete_session(&current.access_token)?;
        let session = self
            .backend
            .create_session(&user, (self.clock)() + self.policy.session_ttl)?;
        info!(
            "event=auth_upgrade module=service status=ok user_id={}",
            session.user_id
        );
        Ok(session)
    }

    pub fn sign_out(&self, current: &Session) -> AppResult<()> {
        self.backend.delete_session(&current.access_token)?;
        info!(
            "event=auth_sign_out module=service status=ok user_id={}",
            current.user_id
        );
        Ok(())
    }

    /// Resolves a persisted token back into a live session.
    pub fn restore_session(&self, token: &str) -> AppResult<Session> {
        let session = self
            .backend
            .find_session(token)?
            .ok_or(AuthError::SessionExpired)?;
        if let Err(err) = self.ensure_live(&session) {
            self.backend.delete_session(token)?;
            return Err(err);
        }
        Ok(session)
    }

    /// Fails with `SessionExpired` once `session` is past its expiry.
    pub fn ensure_live(&self, session: &Session) -> AppResult<()> {
        if session.is_expired((self.clock)()) {
            return Err(AuthError::SessionExpired.into());
        }
        Ok(())
    }

    fn ensure_signed_out(&self, current: Option<&Session>) -> AppResult<()> {
        match current {
            Some(session) if !session.is_expired((self.clock)()) => {
                Err(AuthError::AlreadyAuthenticated.into())
            }
            _ => Ok(()),
        }
    }
}
