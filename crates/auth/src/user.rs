//! Dashboard users and password hashes.

use bcrypt::BcryptError;

use invoicedash_core::{Entity, UserId};

/// Work factor used for new password hashes.
pub const PASSWORD_COST: u32 = bcrypt::DEFAULT_COST;

/// A user allowed to sign in to the dashboard.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// bcrypt hash, salt and cost included.
    pub password_hash: String,
}

impl core::fmt::Debug for User {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Entity for User {
    type Key = UserId;

    fn key(&self) -> UserId {
        self.id
    }
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Self, BcryptError> {
        Ok(Self {
            id,
            name: name.into(),
            email: email.into(),
            password_hash: hash_password(password)?,
        })
    }

    /// A stored hash that bcrypt cannot parse never matches.
    pub fn verify_password(&self, password: &str) -> bool {
        match bcrypt::verify(password, &self.password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(user_id = %self.id, error = %e, "stored password hash is unreadable");
                false
            }
        }
    }
}

/// Hash stored in the `users.password` column.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, PASSWORD_COST)
}
