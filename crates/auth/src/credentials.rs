use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use invoicedash_core::UserId;

/// Name of the email/password provider.
pub const CREDENTIALS_PROVIDER: &str = "credentials";

const MIN_PASSWORD_LEN: usize = 6;

/// Sign-in form payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Shape check done before any lookup: an address with `@` and a password
    /// of at least six characters.
    pub fn is_well_formed(&self) -> bool {
        let email = self.email.trim();
        let well_formed_email = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
            None => false,
        };
        well_formed_email && self.password.chars().count() >= MIN_PASSWORD_LEN
    }
}

/// Recognized authentication failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// Unknown user, wrong password or malformed credentials.
    CredentialsSignin,
    /// The provider refused the user (e.g. disabled account).
    AccessDenied,
    /// The provider is unknown or misconfigured.
    Configuration,
    /// The provider callback failed for a reason it reported.
    CallbackRouteError,
}

impl AuthErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthErrorKind::CredentialsSignin => "CredentialsSignin",
            AuthErrorKind::AccessDenied => "AccessDenied",
            AuthErrorKind::Configuration => "Configuration",
            AuthErrorKind::CallbackRouteError => "CallbackRouteError",
        }
    }
}

impl core::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum VerifyError {
    /// A classified authentication failure.
    #[error("authentication failed: {0}")]
    Auth(AuthErrorKind),

    /// Anything else (storage outage, bug). Not turned into a user message.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VerifyError {
    pub fn kind(&self) -> Option<AuthErrorKind> {
        match self {
            VerifyError::Auth(kind) => Some(*kind),
            VerifyError::Other(_) => None,
        }
    }
}

/// External credential check.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, provider: &str, credentials: &Credentials) -> Result<UserId, VerifyError>;
}
