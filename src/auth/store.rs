use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{info, warn};
use thiserror::Error;

use crate::domain::user::User;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Login failed")]
    LoginFailed,
    #[error("Registration failed")]
    RegistrationFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
}

/// Resolves credentials to a local account.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, email: &str, password: &str) -> Result<User>;

    fn register(&self, email: &str, password: &str, _name: &str) -> Result<User> {
        self.authenticate(email, password)
    }
}

/// Accepts any credentials after a fake round trip.
pub struct MockAuthenticator {
    pub delay: Duration,
}

impl Default for MockAuthenticator {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1000),
        }
    }
}

impl Authenticator for MockAuthenticator {
    fn authenticate(&self, email: &str, _password: &str) -> Result<User> {
        thread::sleep(self.delay);
        let email = email.trim();
        if email.is_empty() {
            return Err(anyhow!("email is required"));
        }
        Ok(User::from_email("1", email))
    }
}

/// Local account state. Gates the dashboard route.
pub struct AuthStore {
    user: Option<User>,
    authenticator: Arc<dyn Authenticator>,
}

impl AuthStore {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            user: None,
            authenticator,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        let outcome = self.authenticator.authenticate(email, password);
        self.complete(AuthAction::Login, outcome)
    }

    pub fn register(&mut self, email: &str, password: &str, name: &str) -> Result<(), AuthError> {
        let outcome = self.authenticator.register(email, password, name);
        self.complete(AuthAction::Register, outcome)
    }

    /// Applies an authenticator result obtained elsewhere (e.g. on the
    /// worker thread). The underlying cause is logged, never surfaced.
    pub fn complete(&mut self, action: AuthAction, outcome: Result<User>) -> Result<(), AuthError> {
        match outcome {
            Ok(user) => {
                info!("{action:?} succeeded for {}", user.email);
                self.user = Some(user);
                Ok(())
            }
            Err(e) => {
                warn!("{action:?} failed: {e:#}");
                Err(match action {
                    AuthAction::Login => AuthError::LoginFailed,
                    AuthAction::Register => AuthError::RegistrationFailed,
                })
            }
        }
    }

    pub fn logout(&mut self) {
        self.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AuthStore {
        AuthStore::new(Arc::new(MockAuthenticator {
            delay: Duration::ZERO,
        }))
    }

    fn consistent(s: &AuthStore) -> bool {
        s.is_authenticated() == s.user().is_some()
    }

    #[test]
    fn starts_signed_out() {
        let s = store();
        assert!(!s.is_authenticated());
        assert!(consistent(&s));
    }

    #[test]
    fn login_then_logout() {
        let mut s = store();
        s.login("ada@example.com", "pw").unwrap();
        assert!(s.is_authenticated());
        assert!(consistent(&s));
        assert_eq!(s.user().unwrap().name, "ada");

        s.logout();
        assert!(!s.is_authenticated());
        assert!(consistent(&s));
    }

    #[test]
    fn register_uses_local_part_as_name() {
        let mut s = store();
        s.register("bob@example.com", "pw", "Robert").unwrap();
        assert!(consistent(&s));
        assert_eq!(s.user().unwrap().name, "bob");
    }

    #[test]
    fn failures_are_generic() {
        let mut s = store();
        assert_eq!(s.login("  ", "pw"), Err(AuthError::LoginFailed));
        assert_eq!(s.register("", "pw", "x"), Err(AuthError::RegistrationFailed));
        assert!(!s.is_authenticated());
        assert!(consistent(&s));
        assert_eq!(AuthError::LoginFailed.to_string(), "Login failed");
    }

    #[test]
    fn failed_login_keeps_existing_user() {
        let mut s = store();
        s.login("ada@example.com", "pw").unwrap();
        assert!(s.login("", "pw").is_err());
        assert_eq!(s.user().unwrap().email, "ada@example.com");
    }
}
