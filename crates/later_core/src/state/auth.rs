//! Long-lived controller holding the current session.

use crate::error::{AppResult, AuthError};
use crate::model::session::Session;
use crate::repo::auth_repo::AuthBackend;
use crate::service::auth_service::{AuthService, SignUpOutcome};
use crate::state::AsyncValue;

pub struct AuthController<B: AuthBackend> {
    service: AuthService<B>,
    session: AsyncValue<Option<Session>>,
}

impl<B: AuthBackend> AuthController<B> {
    /// Starts signed out.
    pub fn new(service: AuthService<B>) -> Self {
        Self {
            service,
            session: AsyncValue::Data(None),
        }
    }

    pub fn state(&self) -> &AsyncValue<Option<Session>> {
        &self.session
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.value().and_then(Option::as_ref)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// Resumes a persisted session; failures leave the controller signed
    /// out with the error recorded.
    pub fn restore(&mut self, token: &str) -> AppResult<Session> {
        match self.service.restore_session(token) {
            Ok(session) => Ok(self.hold(session)),
            Err(err) => {
                self.session = AsyncValue::Error(err.clone());
                Err(err)
            }
        }
    }

    pub fn sign_up(&mut self, email: &str, password: &str) -> AppResult<SignUpOutcome> {
        let outcome = self.service.sign_up(self.session(), email, password)?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.hold(session.clone());
        }
        Ok(outcome)
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> AppResult<Session> {
        let session = self.service.sign_in(self.session(), email, password)?;
        Ok(self.hold(session))
    }

    pub fn sign_in_anonymously(&mut self) -> AppResult<Session> {
        let session = self.service.sign_in_anonymously(self.session())?;
        Ok(self.hold(session))
    }

    pub fn upgrade(&mut self, email: &str, password: &str) -> AppResult<Session> {
        let current = self.require_session()?;
        let session = self.service.upgrade_anonymous(&current, email, password)?;
        Ok(self.hold(session))
    }

    pub fn sign_out(&mut self) -> AppResult<()> {
        if let Some(current) = self.session().cloned() {
            self.service.sign_out(&current)?;
        }
        self.session = AsyncValue::Data(None);
        Ok(())
    }

    /// Current session, or `SessionExpired` when absent or past expiry.
    pub fn require_session(&self) -> AppResult<Session> {
        let session = self
            .session()
            .cloned()
            .ok_or(AuthError::SessionExpired)?;
        self.service.ensure_live(&session)?;
        Ok(session)
    }

    fn hold(&mut self, session: Session) -> Session {
        self.session = AsyncValue::Data(Some(session.clone()));
        session
    }
}
