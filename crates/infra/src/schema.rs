//! Table definitions for the Postgres backend.

use sqlx::PgPool;
use tracing::info;

/// Statements run in order by [`ensure_schema`]; each is idempotent.
pub const SCHEMA: &[&str] = &[
    r#"CREATE EXTENSION IF NOT EXISTS "pgcrypto""#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(255) NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sellers (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        image_url VARCHAR(255) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        seller_id UUID NOT NULL REFERENCES sellers (id),
        amount BIGINT NOT NULL CHECK (amount >= 0),
        status VARCHAR(16) NOT NULL CHECK (status IN ('awaiting', 'fulfilled')),
        date DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS revenue (
        month VARCHAR(4) NOT NULL UNIQUE,
        revenue BIGINT NOT NULL,
        position SMALLINT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS invoices_date_idx ON invoices (date DESC)",
];

/// Create the dashboard tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(statements = SCHEMA.len(), "schema ensured");
    Ok(())
}
