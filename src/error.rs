use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillWalletError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<SkillWalletError> for String {
    fn from(err: SkillWalletError) -> Self {
        err.to_string()
    }
}
