//! Invoice write path: the three single-statement mutations.
//!
//! ## Error Mapping
//!
//! | Failure | StoreError |
//! |---------|------------|
//! | UPDATE/DELETE matched no row | `NotFound` |
//! | Foreign key / unique / check violation (`23503`, `23505`, `23514`) | `Constraint` |
//! | Any other database, pool or network failure | `Database` |

use async_trait::async_trait;
use thiserror::Error;

use invoicedash_core::InvoiceId;
use invoicedash_invoicing::{InvoiceChanges, NewInvoice};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryDashboardStore;
pub use postgres::PostgresDashboardStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Invoice persistence. Each call is one atomic statement.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError>;

    async fn update(&self, id: InvoiceId, changes: InvoiceChanges) -> Result<(), StoreError>;

    async fn delete(&self, id: InvoiceId) -> Result<(), StoreError>;
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("{} failed: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23503") | Some("23505") | Some("23514") => StoreError::Constraint(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {}", operation))
        }
        other => StoreError::Database(format!("sqlx error in {}: {}", operation, other)),
    }
}
