//! Postgres-backed credential verification against the `users` table.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use invoicedash_auth::{
    AuthErrorKind, CREDENTIALS_PROVIDER, CredentialVerifier, Credentials, User, VerifyError,
};
use invoicedash_core::UserId;

#[derive(Debug, Clone)]
pub struct PostgresCredentialVerifier {
    pool: Arc<PgPool>,
}

impl PostgresCredentialVerifier {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query("SELECT id, name, email, password FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&*self.pool)
            .await?;

        row.map(|row| -> Result<User, sqlx::Error> {
            Ok(User {
                id: UserId::from_uuid(row.try_get("id")?),
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                password_hash: row.try_get("password")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl CredentialVerifier for PostgresCredentialVerifier {
    #[instrument(skip(self, credentials), fields(email = %credentials.email), err)]
    async fn verify(&self, provider: &str, credentials: &Credentials) -> Result<UserId, VerifyError> {
        if provider != CREDENTIALS_PROVIDER {
            return Err(VerifyError::Auth(AuthErrorKind::Configuration));
        }
        if !credentials.is_well_formed() {
            return Err(VerifyError::Auth(AuthErrorKind::CredentialsSignin));
        }

        // Lookup failures are not authentication outcomes; they propagate as-is.
        let user = self
            .find_user(credentials.email.trim())
            .await
            .map_err(|e| VerifyError::Other(anyhow::Error::new(e).context("failed to fetch user")))?;

        match user {
            Some(user) if user.verify_password(&credentials.password) => Ok(user.id),
            _ => Err(VerifyError::Auth(AuthErrorKind::CredentialsSignin)),
        }
    }
}
