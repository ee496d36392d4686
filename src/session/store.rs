//! Session lifecycle: login, logout, role switching, restart restoration.
//!
//! `SessionStore` is the single owner of session state. Every mutation --
//! login, logout, role switch, forced expiry -- goes through the operations
//! here, which keep the in-memory state, the two durable keys, and the
//! values outbound requests derive their headers from consistent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::SkillWalletError;

use super::storage::SessionStorage;
use super::types::{Identity, Role, Session};

/// Outcome of a successful credential exchange.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: Identity,
}

/// Credential exchange against the auth backend.
///
/// Implemented by `api::ApiClient`; tests substitute a scripted exchange.
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    async fn exchange_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, SkillWalletError>;
}

type ExpiryHook = Box<dyn Fn() + Send + Sync>;

pub struct SessionStore {
    state: Mutex<Session>,
    storage: Box<dyn SessionStorage>,
    /// Guards the expiry hook so concurrent 401s fire it at most once.
    /// Re-armed by the next successful login.
    expiry_notified: AtomicBool,
    on_expired: Mutex<Option<ExpiryHook>>,
}

impl SessionStore {
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        Self {
            state: Mutex::new(Session::default()),
            storage,
            expiry_notified: AtomicBool::new(false),
            on_expired: Mutex::new(None),
        }
    }

    /// Register the hook fired when any request sees a 401. Typically the
    /// shell's navigation to the login entry point.
    pub fn set_expiry_hook(&self, hook: ExpiryHook) {
        *self.on_expired.lock().unwrap() = Some(hook);
    }

    /// A clone of the current session, taken under the lock. Outbound
    /// requests derive their headers from one of these at issue time.
    pub fn snapshot(&self) -> Session {
        self.state.lock().unwrap().clone()
    }

    /// Restore persisted state after a process restart.
    ///
    /// Only the token and active role survive restarts; identity does not.
    /// A token without an identity is a valid "partially restored" session:
    /// token-gated views work immediately, identity-dependent surfaces stay
    /// anonymous until the next login. A persisted role without a token is
    /// stale and gets cleared.
    pub fn restore(&self) -> Result<Session, SkillWalletError> {
        let token = self.storage.load_token()?;
        let role = self.storage.load_role()?;

        let mut state = self.state.lock().unwrap();
        match token {
            Some(token) => {
                info!(
                    "Restored session from storage (role: {})",
                    role.as_ref().map(|r| r.as_str()).unwrap_or("none")
                );
                state.token = Some(token);
                state.user = None;
                state.active_role = role;
            }
            None => {
                if role.is_some() {
                    if let Err(e) = self.storage.clear_role() {
                        warn!("Failed to clear stale persisted role: {}", e);
                    }
                }
                *state = Session::default();
            }
        }
        Ok(state.clone())
    }

    /// Exchange credentials for a session.
    ///
    /// On success the token and identity are stored and, when the identity
    /// holds the Student role, Student is auto-selected as the active role
    /// (fixed precedence over Parent). Otherwise the active role stays
    /// unset until the user picks one. On failure the store is left
    /// exactly as it was.
    pub async fn login(
        &self,
        auth: &dyn CredentialExchange,
        email: &str,
        password: &str,
    ) -> Result<Session, SkillWalletError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(SkillWalletError::Auth(
                "Email and password are required".to_string(),
            ));
        }

        let outcome = auth.exchange_credentials(email, password).await?;

        let auto_role = outcome
            .user
            .roles
            .contains(&Role::Student)
            .then_some(Role::Student);

        if let Err(e) = self.storage.store_token(&outcome.token) {
            warn!("Session will not survive a restart: {}", e);
        }
        if let Some(role) = &auto_role {
            if let Err(e) = self.storage.store_role(role) {
                warn!("Failed to persist active role: {}", e);
            }
        }

        let mut state = self.state.lock().unwrap();
        state.token = Some(outcome.token);
        state.user = Some(outcome.user);
        state.active_role = auto_role;
        self.expiry_notified.store(false, Ordering::SeqCst);

        info!(
            "Logged in as {} (active role: {})",
            state.user.as_ref().map(|u| u.email.as_str()).unwrap_or(""),
            state
                .active_role
                .as_ref()
                .map(|r| r.as_str())
                .unwrap_or("none")
        );
        Ok(state.clone())
    }

    /// Clear the session. Always succeeds and is idempotent; storage
    /// failures are logged rather than surfaced.
    pub fn logout(&self) {
        if let Err(e) = self.storage.clear_token() {
            warn!("Failed to clear persisted token: {}", e);
        }
        if let Err(e) = self.storage.clear_role() {
            warn!("Failed to clear persisted role: {}", e);
        }

        let mut state = self.state.lock().unwrap();
        if state.is_authenticated() {
            info!("Logged out");
        }
        *state = Session::default();
    }

    /// Switch the role the user operates under.
    ///
    /// Membership in `user.roles` is NOT checked; callers are trusted to
    /// offer only roles the signed-in identity actually holds. Requests
    /// issued after this call carry the new role header; in-flight
    /// requests keep the old one.
    pub fn set_active_role(&self, role: Role) {
        if let Err(e) = self.storage.store_role(&role) {
            warn!("Failed to persist active role: {}", e);
        }
        let mut state = self.state.lock().unwrap();
        info!("Active role switched to {}", role);
        state.active_role = Some(role);
    }

    /// Forced expiry: some request saw a 401. Clears the session and fires
    /// the expiry hook at most once, no matter how many in-flight requests
    /// hit this concurrently.
    pub fn notify_expired(&self) {
        self.logout();
        if !self.expiry_notified.swap(true, Ordering::SeqCst) {
            if let Some(hook) = self.on_expired.lock().unwrap().as_ref() {
                hook();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::InMemoryStorage;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    struct FakeAuth {
        result: Result<LoginOutcome, String>,
    }

    impl FakeAuth {
        fn ok(token: &str, roles: Vec<Role>) -> Self {
            Self {
                result: Ok(LoginOutcome {
                    token: token.to_string(),
                    user: Identity {
                        id: "u-1".to_string(),
                        email: "kim@example.com".to_string(),
                        first_name: Some("Kim".to_string()),
                        last_name: None,
                        roles,
                    },
                }),
            }
        }

        fn rejecting() -> Self {
            Self {
                result: Err("Invalid email or password".to_string()),
            }
        }
    }

    #[async_trait]
    impl CredentialExchange for FakeAuth {
        async fn exchange_credentials(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<LoginOutcome, SkillWalletError> {
            self.result
                .clone()
                .map_err(SkillWalletError::Auth)
        }
    }

    fn make_store() -> SessionStore {
        SessionStore::new(Box::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_login_auto_selects_student_when_present() {
        let store = make_store();
        let auth = FakeAuth::ok("tok-1", vec![Role::Parent, Role::Student]);

        let session = store.login(&auth, "kim@example.com", "pw").await.unwrap();
        assert_eq!(session.token.as_deref(), Some("tok-1"));
        assert_eq!(session.active_role, Some(Role::Student));
    }

    #[tokio::test]
    async fn test_login_without_student_role_leaves_role_unset() {
        let store = make_store();
        let auth = FakeAuth::ok("tok-2", vec![Role::Parent]);

        let session = store.login(&auth, "kim@example.com", "pw").await.unwrap();
        assert_eq!(session.active_role, None);
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_store_unchanged() {
        let store = make_store();
        let good = FakeAuth::ok("tok-3", vec![Role::Student]);
        store.login(&good, "kim@example.com", "pw").await.unwrap();
        let before = store.snapshot();

        let bad = FakeAuth::rejecting();
        let err = store.login(&bad, "kim@example.com", "wrong").await;
        assert!(matches!(err, Err(SkillWalletError::Auth(_))));
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_login_rejects_empty_credentials_without_calling_backend() {
        let store = make_store();
        // A rejecting exchange would return Auth with its own message;
        // empty input must be caught before the exchange happens.
        let auth = FakeAuth::ok("tok-4", vec![Role::Student]);

        let err = store.login(&auth, "", "pw").await;
        assert!(matches!(err, Err(SkillWalletError::Auth(_))));
        assert!(!store.snapshot().is_authenticated());

        let err = store.login(&auth, "kim@example.com", "").await;
        assert!(matches!(err, Err(SkillWalletError::Auth(_))));
        assert!(!store.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let store = make_store();
        let auth = FakeAuth::ok("tok-5", vec![Role::Student]);
        store.login(&auth, "kim@example.com", "pw").await.unwrap();

        store.logout();
        let after_first = store.snapshot();
        store.logout();
        assert_eq!(store.snapshot(), after_first);
        assert_eq!(after_first, Session::default());
    }

    #[tokio::test]
    async fn test_set_active_role_does_not_check_membership() {
        let store = make_store();
        let auth = FakeAuth::ok("tok-6", vec![Role::Student]);
        store.login(&auth, "kim@example.com", "pw").await.unwrap();

        // Parent is not in the identity's role set; the switch still lands.
        store.set_active_role(Role::Parent);
        assert_eq!(store.snapshot().active_role, Some(Role::Parent));
    }

    #[tokio::test]
    async fn test_expiry_hook_fires_once_for_concurrent_401s() {
        let store = make_store();
        let auth = FakeAuth::ok("tok-7", vec![Role::Student]);
        store.login(&auth, "kim@example.com", "pw").await.unwrap();

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        store.set_expiry_hook(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        store.notify_expired();
        store.notify_expired();
        store.notify_expired();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!store.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn test_expiry_hook_rearms_after_next_login() {
        let store = make_store();
        let auth = FakeAuth::ok("tok-8", vec![Role::Student]);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        store.set_expiry_hook(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        store.login(&auth, "kim@example.com", "pw").await.unwrap();
        store.notify_expired();
        store.login(&auth, "kim@example.com", "pw").await.unwrap();
        store.notify_expired();

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }
}
