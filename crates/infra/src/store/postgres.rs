//! Postgres-backed dashboard datastore.
//!
//! ## Thread Safety
//!
//! Uses the SQLx connection pool, which is `Send + Sync`; every statement runs
//! on its own pooled connection and commits on its own.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use invoicedash_core::InvoiceId;
use invoicedash_invoicing::{InvoiceChanges, NewInvoice};

use super::{InvoiceStore, StoreError, map_sqlx_error};

/// Postgres datastore for the `invoices`, `sellers` and `revenue` tables.
#[derive(Debug, Clone)]
pub struct PostgresDashboardStore {
    pub(crate) pool: Arc<PgPool>,
}

impl PostgresDashboardStore {
    /// Create a new PostgresDashboardStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl InvoiceStore for PostgresDashboardStore {
    #[instrument(skip(self, invoice), fields(seller_id = %invoice.seller_id, amount = invoice.amount.value()), err)]
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO invoices (seller_id, amount, status, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(invoice.seller_id.as_uuid())
        .bind(invoice.amount.value())
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_invoice", e))?;

        let id: uuid::Uuid = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("insert_invoice", e))?;
        Ok(InvoiceId::from_uuid(id))
    }

    #[instrument(skip(self, changes), fields(invoice_id = %id), err)]
    async fn update(&self, id: InvoiceId, changes: InvoiceChanges) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET seller_id = $1, amount = $2, status = $3
            WHERE id = $4
            "#,
        )
        .bind(changes.seller_id.as_uuid())
        .bind(changes.amount.value())
        .bind(changes.status.as_str())
        .bind(id.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_invoice", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn delete(&self, id: InvoiceId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_invoice", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
