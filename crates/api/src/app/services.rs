//! Wiring of the datastore, view cache and credential verifier behind the
//! router, for either backend.

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use invoicedash_auth::{CredentialVerifier, InMemoryCredentialVerifier};
use invoicedash_infra::{
    DashboardConfig, DashboardQueries, InMemoryDashboardStore, InMemoryViewCache, InvoiceStore,
    PostgresCredentialVerifier, PostgresDashboardStore, ViewCache, schema, seed,
};

use crate::actions::InvoiceActions;

/// Everything a request handler needs.
#[derive(Clone)]
pub struct AppServices {
    pub actions: InvoiceActions,
    pub queries: Arc<dyn DashboardQueries>,
    pub cache: Arc<dyn ViewCache>,
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppServices {
    pub async fn from_config(config: &DashboardConfig) -> anyhow::Result<Self> {
        if config.use_persistent_stores {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;
            return Self::postgres(url).await;
        }
        Self::in_memory(config.seed_demo_data)
    }

    /// Process-local stores (dev/test), optionally loaded with demo data.
    pub fn in_memory(seed_demo_data: bool) -> anyhow::Result<Self> {
        let store = Arc::new(InMemoryDashboardStore::new());
        let verifier = Arc::new(InMemoryCredentialVerifier::new());
        if seed_demo_data {
            seed::seed_demo_data(&store, &verifier)?;
        }

        tracing::info!(seeded = seed_demo_data, "using in-memory stores");
        Ok(Self::assemble(store.clone(), store, verifier))
    }

    pub async fn postgres(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("failed to connect to Postgres")?;
        schema::ensure_schema(&pool)
            .await
            .context("failed to prepare the database schema")?;

        let verifier = Arc::new(PostgresCredentialVerifier::new(pool.clone()));
        let store = Arc::new(PostgresDashboardStore::new(pool));

        tracing::info!("using Postgres stores");
        Ok(Self::assemble(store.clone(), store, verifier))
    }

    fn assemble(
        store: Arc<dyn InvoiceStore>,
        queries: Arc<dyn DashboardQueries>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let cache: Arc<dyn ViewCache> = Arc::new(InMemoryViewCache::new());
        Self {
            actions: InvoiceActions::new(store, cache.clone()),
            queries,
            cache,
            verifier,
        }
    }
}
