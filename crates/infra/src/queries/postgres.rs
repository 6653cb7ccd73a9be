//! Postgres implementation of the dashboard read queries.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use invoicedash_core::{Cents, InvoiceId, SellerId};
use invoicedash_invoicing::{InvoiceRecord, InvoiceStatus};

use super::{
    CardData, DashboardQueries, ITEMS_PER_PAGE, InvoiceTableRow, LATEST_INVOICES, LatestInvoice,
    Revenue, SellerField, SellerTableRow, page_count, page_offset,
};
use crate::store::{PostgresDashboardStore, StoreError, map_sqlx_error};

const INVOICE_SEARCH: &str = r#"
    sellers.name ILIKE $1 OR
    sellers.email ILIKE $1 OR
    invoices.amount::text ILIKE $1 OR
    invoices.date::text ILIKE $1 OR
    invoices.status ILIKE $1
"#;

/// `%query%` with LIKE metacharacters escaped, so the search is a plain substring match.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn parse_status(raw: String) -> Result<InvoiceStatus, sqlx::Error> {
    raw.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn invoice_record(row: &PgRow) -> Result<InvoiceRecord, sqlx::Error> {
    Ok(InvoiceRecord {
        id: InvoiceId::from_uuid(row.try_get("id")?),
        seller_id: SellerId::from_uuid(row.try_get("seller_id")?),
        amount: Cents::new(row.try_get("amount")?),
        status: parse_status(row.try_get("status")?)?,
        date: row.try_get("date")?,
    })
}

fn invoice_table_row(row: &PgRow) -> Result<InvoiceTableRow, sqlx::Error> {
    Ok(InvoiceTableRow {
        id: InvoiceId::from_uuid(row.try_get("id")?),
        seller_id: SellerId::from_uuid(row.try_get("seller_id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        image_url: row.try_get("image_url")?,
        date: row.try_get("date")?,
        amount: Cents::new(row.try_get("amount")?),
        status: parse_status(row.try_get("status")?)?,
    })
}

fn seller_table_row(row: &PgRow) -> Result<SellerTableRow, sqlx::Error> {
    Ok(SellerTableRow {
        id: SellerId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        image_url: row.try_get("image_url")?,
        total_invoices: row.try_get("total_invoices")?,
        total_awaiting: Cents::new(row.try_get("total_awaiting")?),
        total_fulfilled: Cents::new(row.try_get("total_fulfilled")?),
    })
}

fn collect_rows<T>(
    operation: &str,
    rows: Vec<PgRow>,
    map: fn(&PgRow) -> Result<T, sqlx::Error>,
) -> Result<Vec<T>, StoreError> {
    rows.iter()
        .map(map)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| map_sqlx_error(operation, e))
}

#[async_trait]
impl DashboardQueries for PostgresDashboardStore {
    #[instrument(skip(self), err)]
    async fn card_data(&self) -> Result<CardData, StoreError> {
        let pool = &*self.pool;
        let invoice_count = sqlx::query("SELECT COUNT(*) AS count FROM invoices").fetch_one(pool);
        let seller_count = sqlx::query("SELECT COUNT(*) AS count FROM sellers").fetch_one(pool);
        let totals = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN status = 'fulfilled' THEN amount ELSE 0 END), 0)::BIGINT AS fulfilled,
                COALESCE(SUM(CASE WHEN status = 'awaiting' THEN amount ELSE 0 END), 0)::BIGINT AS awaiting
            FROM invoices
            "#,
        )
        .fetch_one(pool);

        let (invoice_count, seller_count, totals) =
            tokio::try_join!(invoice_count, seller_count, totals)
                .map_err(|e| map_sqlx_error("card_data", e))?;

        let decode = || -> Result<CardData, sqlx::Error> {
            Ok(CardData {
                number_of_invoices: invoice_count.try_get("count")?,
                number_of_sellers: seller_count.try_get("count")?,
                total_fulfilled: Cents::new(totals.try_get("fulfilled")?),
                total_awaiting: Cents::new(totals.try_get("awaiting")?),
            })
        };
        decode().map_err(|e| map_sqlx_error("card_data", e))
    }

    #[instrument(skip(self), err)]
    async fn revenue(&self) -> Result<Vec<Revenue>, StoreError> {
        let rows = sqlx::query("SELECT month, revenue FROM revenue ORDER BY position ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("revenue", e))?;

        collect_rows("revenue", rows, |row| {
            Ok(Revenue {
                month: row.try_get("month")?,
                revenue: row.try_get("revenue")?,
            })
        })
    }

    #[instrument(skip(self), err)]
    async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT invoices.id, invoices.amount, sellers.name, sellers.email, sellers.image_url
            FROM invoices
            JOIN sellers ON invoices.seller_id = sellers.id
            ORDER BY invoices.date DESC, invoices.id DESC
            LIMIT $1
            "#,
        )
        .bind(LATEST_INVOICES as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("latest_invoices", e))?;

        collect_rows("latest_invoices", rows, |row| {
            Ok(LatestInvoice {
                id: InvoiceId::from_uuid(row.try_get("id")?),
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                image_url: row.try_get("image_url")?,
                amount: Cents::new(row.try_get("amount")?),
            })
        })
    }

    #[instrument(skip(self), err)]
    async fn filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<InvoiceTableRow>, StoreError> {
        let sql = format!(
            r#"
            SELECT
                invoices.id,
                invoices.seller_id,
                invoices.amount,
                invoices.date,
                invoices.status,
                sellers.name,
                sellers.email,
                sellers.image_url
            FROM invoices
            JOIN sellers ON invoices.seller_id = sellers.id
            WHERE {INVOICE_SEARCH}
            ORDER BY invoices.date DESC, invoices.id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(like_pattern(query))
            .bind(ITEMS_PER_PAGE as i64)
            .bind(page_offset(page) as i64)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("filtered_invoices", e))?;

        collect_rows("filtered_invoices", rows, invoice_table_row)
    }

    #[instrument(skip(self), err)]
    async fn invoice_pages(&self, query: &str) -> Result<u32, StoreError> {
        let sql = format!(
            r#"
            SELECT COUNT(*) AS count
            FROM invoices
            JOIN sellers ON invoices.seller_id = sellers.id
            WHERE {INVOICE_SEARCH}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(like_pattern(query))
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("invoice_pages", e))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| map_sqlx_error("invoice_pages", e))?;
        Ok(page_count(count.max(0) as u64))
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn invoice_by_id(&self, id: InvoiceId) -> Result<Option<InvoiceRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, seller_id, amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("invoice_by_id", e))?;

        row.as_ref()
            .map(invoice_record)
            .transpose()
            .map_err(|e| map_sqlx_error("invoice_by_id", e))
    }

    #[instrument(skip(self), err)]
    async fn sellers(&self) -> Result<Vec<SellerField>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM sellers ORDER BY name ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("sellers", e))?;

        collect_rows("sellers", rows, |row| {
            Ok(SellerField {
                id: SellerId::from_uuid(row.try_get("id")?),
                name: row.try_get("name")?,
            })
        })
    }

    #[instrument(skip(self), err)]
    async fn filtered_sellers(&self, query: &str) -> Result<Vec<SellerTableRow>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                sellers.id,
                sellers.name,
                sellers.email,
                sellers.image_url,
                COUNT(invoices.id) AS total_invoices,
                COALESCE(SUM(CASE WHEN invoices.status = 'awaiting' THEN invoices.amount ELSE 0 END), 0)::BIGINT AS total_awaiting,
                COALESCE(SUM(CASE WHEN invoices.status = 'fulfilled' THEN invoices.amount ELSE 0 END), 0)::BIGINT AS total_fulfilled
            FROM sellers
            LEFT JOIN invoices ON sellers.id = invoices.seller_id
            WHERE sellers.name ILIKE $1 OR sellers.email ILIKE $1
            GROUP BY sellers.id, sellers.name, sellers.email, sellers.image_url
            ORDER BY sellers.name ASC
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("filtered_sellers", e))?;

        collect_rows("filtered_sellers", rows, seller_table_row)
    }
}
