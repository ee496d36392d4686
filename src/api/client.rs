//! HTTP client for the SkillWallet backend.
//!
//! Every request derives its credentials from a fresh session snapshot, so
//! a role switch or logout affects the next request without re-auth, while
//! requests already in flight keep the headers they were issued with. Any
//! 401 response, from any endpoint, funnels through the same expiry path:
//! the session is cleared and the registered hook fires once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::SkillWalletError;
use crate::session::{CredentialExchange, LoginOutcome, Session, SessionStore};

use super::types::{
    ChildDetailPayload, LoginPayload, LoginRequest, ParentDashboardPayload,
    StudentDashboardPayload, WalletPayload,
};

/// Header carrying the active role on authenticated requests.
pub const ACTIVE_ROLE_HEADER: &str = "x-active-role";

pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

/// Credential headers for one outbound request, derived from a session
/// snapshot taken at issue time.
fn credential_headers(session: &Session) -> Vec<(&'static str, String)> {
    let mut headers = Vec::new();
    if let Some(token) = &session.token {
        headers.push(("authorization", format!("Bearer {}", token)));
    }
    if let Some(role) = &session.active_role {
        headers.push((ACTIVE_ROLE_HEADER, role.as_str().to_string()));
    }
    headers
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        session: Arc<SessionStore>,
    ) -> Result<Self, SkillWalletError> {
        let client = reqwest::Client::builder()
            .user_agent("SkillWallet/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SkillWalletError::Fetch(format!("Failed to build HTTP client: {}", e)))?;

        // Endpoint paths are joined relative to the base, which only works
        // when the base path ends in a slash.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            SkillWalletError::Config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SkillWalletError> {
        self.base_url
            .join(path)
            .map_err(|e| SkillWalletError::Fetch(format!("Invalid endpoint path '{}': {}", path, e)))
    }

    /// Issue an authenticated GET and decode the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, SkillWalletError> {
        let url = self.endpoint(path)?;

        let snapshot = self.session.snapshot();
        let mut request = self.client.get(url.clone());
        for (name, value) in credential_headers(&snapshot) {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SkillWalletError::Fetch(format!("Request to {} failed: {}", url, e)))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Unauthorized response from {}, clearing session", url);
            self.session.notify_expired();
            return Err(SkillWalletError::SessionExpired);
        }
        if !response.status().is_success() {
            return Err(SkillWalletError::Fetch(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        response.json::<T>().await.map_err(|e| {
            SkillWalletError::Fetch(format!("Failed to decode response from {}: {}", url, e))
        })
    }

    pub async fn student_dashboard(&self) -> Result<StudentDashboardPayload, SkillWalletError> {
        self.get_json("student-dashboard/my-dashboard").await
    }

    pub async fn parent_dashboard(&self) -> Result<ParentDashboardPayload, SkillWalletError> {
        self.get_json("parent-dashboard/my-dashboard").await
    }

    pub async fn child_detail(&self, child_id: &str) -> Result<ChildDetailPayload, SkillWalletError> {
        self.get_json(&format!("parent-dashboard/children/{}", child_id))
            .await
    }

    pub async fn my_wallet(&self) -> Result<WalletPayload, SkillWalletError> {
        self.get_json("skill-wallet/my-wallet").await
    }

    pub async fn student_wallet(&self, student_id: &str) -> Result<WalletPayload, SkillWalletError> {
        self.get_json(&format!("skill-wallet/student/{}", student_id))
            .await
    }
}

#[async_trait]
impl CredentialExchange for ApiClient {
    async fn exchange_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, SkillWalletError> {
        let url = self.endpoint("auth/login")?;
        info!("Logging in via {}", url);

        let response = self
            .client
            .post(url.clone())
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| SkillWalletError::Fetch(format!("Login request failed: {}", e)))?;

        // A 401 here is a credential rejection, not an expired session;
        // it must not clear any existing state.
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || status == StatusCode::BAD_REQUEST
        {
            return Err(SkillWalletError::Auth(
                "Invalid email or password".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(SkillWalletError::Fetch(format!(
                "{} returned {}",
                url, status
            )));
        }

        let payload: LoginPayload = response.json().await.map_err(|e| {
            SkillWalletError::Fetch(format!("Failed to decode login response: {}", e))
        })?;
        Ok(LoginOutcome {
            token: payload.access_token,
            user: payload.user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{InMemoryStorage, Role, SessionStorage};

    fn make_client(base_url: &str) -> ApiClient {
        let config = ClientConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        };
        let store = Arc::new(SessionStore::new(Box::new(InMemoryStorage::new())));
        ApiClient::new(&config, store).unwrap()
    }

    #[test]
    fn test_logged_out_snapshot_produces_no_credential_headers() {
        let session = Session::default();
        assert!(credential_headers(&session).is_empty());
    }

    #[test]
    fn test_token_without_role_produces_bearer_only() {
        let session = Session {
            token: Some("tok-1".to_string()),
            user: None,
            active_role: None,
        };
        let headers = credential_headers(&session);
        assert_eq!(headers, vec![("authorization", "Bearer tok-1".to_string())]);
    }

    #[test]
    fn test_active_role_adds_discrete_header() {
        let session = Session {
            token: Some("tok-1".to_string()),
            user: None,
            active_role: Some(Role::Parent),
        };
        let headers = credential_headers(&session);
        assert!(headers.contains(&("authorization", "Bearer tok-1".to_string())));
        assert!(headers.contains(&(ACTIVE_ROLE_HEADER, "Parent".to_string())));
    }

    #[test]
    fn test_headers_come_from_the_snapshot_not_live_state() {
        // Snapshot-at-issue: a role switch must not affect a request whose
        // headers were already derived, only requests issued afterwards.
        let storage = InMemoryStorage::new();
        storage.store_token("tok-1").unwrap();
        storage.store_role(&Role::Student).unwrap();
        let store = SessionStore::new(Box::new(storage));
        store.restore().unwrap();

        let issued_before = store.snapshot();
        store.set_active_role(Role::Parent);

        let headers = credential_headers(&issued_before);
        assert!(headers.contains(&(ACTIVE_ROLE_HEADER, "Student".to_string())));

        let headers = credential_headers(&store.snapshot());
        assert!(headers.contains(&(ACTIVE_ROLE_HEADER, "Parent".to_string())));
    }

    #[test]
    fn test_endpoint_joins_relative_to_base() {
        let client = make_client("https://api.example.edu/v1");
        let url = client.endpoint("skill-wallet/my-wallet").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.edu/v1/skill-wallet/my-wallet"
        );
    }

    #[test]
    fn test_invalid_base_url_is_a_config_error() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        };
        let store = Arc::new(SessionStore::new(Box::new(InMemoryStorage::new())));
        let err = ApiClient::new(&config, store);
        assert!(matches!(err, Err(SkillWalletError::Config(_))));
    }
}
