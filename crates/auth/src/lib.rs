//! `invoicedash-auth`: the sign-in boundary.
//!
//! Decoupled from HTTP and storage: verifiers are injected behind
//! [`CredentialVerifier`], and the dashboard only classifies their outcome.

pub mod credentials;
pub mod in_memory;
pub mod user;

pub use credentials::{
    AuthErrorKind, CREDENTIALS_PROVIDER, CredentialVerifier, Credentials, VerifyError,
};
pub use in_memory::InMemoryCredentialVerifier;
pub use user::{PASSWORD_COST, User, hash_password};
