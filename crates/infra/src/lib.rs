//! Infrastructure layer: datastore adapters, view cache, credentials, config.

pub mod cache;
pub mod config;
pub mod credentials;
pub mod queries;
pub mod schema;
pub mod seed;
pub mod store;

pub use cache::{CacheTag, InMemoryViewCache, ViewCache};
pub use config::DashboardConfig;
pub use credentials::PostgresCredentialVerifier;
pub use queries::DashboardQueries;
pub use store::{InMemoryDashboardStore, InvoiceStore, PostgresDashboardStore, StoreError};
