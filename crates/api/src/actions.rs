//! Server-side invoice mutations and sign-in.
//!
//! Every mutation runs the same steps in order: validate the form, run one
//! datastore statement, invalidate the cached invoice list, then redirect.
//! A failed step ends the pipeline and none of the later steps run.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use invoicedash_auth::{AuthErrorKind, CREDENTIALS_PROVIDER, CredentialVerifier, Credentials, VerifyError};
use invoicedash_core::InvoiceId;
use invoicedash_infra::{CacheTag, InvoiceStore, StoreError, ViewCache};
use invoicedash_invoicing::{INVOICES_PATH, InvoiceForm, Mutation, Outcome, State, validate};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";
pub const SOMETHING_WENT_WRONG_MESSAGE: &str = "Something went wrong.";

/// Create/update/delete handlers for invoices.
#[derive(Clone)]
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    cache: Arc<dyn ViewCache>,
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, cache: Arc<dyn ViewCache>) -> Self {
        Self { store, cache }
    }

    /// Create an invoice dated today (UTC).
    pub async fn create_invoice(&self, form: &InvoiceForm) -> Outcome {
        self.create_invoice_on(form, Utc::now().date_naive()).await
    }

    pub async fn create_invoice_on(&self, form: &InvoiceForm, date: NaiveDate) -> Outcome {
        let invoice = match validate(form) {
            Ok(valid) => valid.issued_on(date),
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "create invoice form rejected");
                return Outcome::State(State::invalid(errors, Mutation::Create.missing_fields_message()));
            }
        };

        match self.store.insert(invoice).await {
            Ok(id) => tracing::info!(invoice_id = %id, "invoice created"),
            Err(e) => {
                tracing::error!(error = %e, "failed to create invoice");
                return Outcome::State(State::message(Mutation::Create.database_error_message()));
            }
        }

        self.invalidate_invoice_list();
        Outcome::redirect_to_invoices()
    }

    /// Replace seller, amount and status of invoice `id`.
    ///
    /// An id that does not parse or matches no row is reported as a database
    /// error, the same as a failed statement.
    pub async fn update_invoice(&self, id: &str, form: &InvoiceForm) -> Outcome {
        let changes = match validate(form) {
            Ok(valid) => valid.into_changes(),
            Err(errors) => {
                tracing::debug!(invoice_id = id, fields = errors.len(), "update invoice form rejected");
                return Outcome::State(State::invalid(errors, Mutation::Update.missing_fields_message()));
            }
        };

        let result = match id.parse::<InvoiceId>() {
            Ok(invoice_id) => self.store.update(invoice_id, changes).await,
            // A malformed id cannot match any row.
            Err(_) => Err(StoreError::NotFound),
        };
        if let Err(e) = result {
            tracing::error!(invoice_id = id, error = %e, "failed to update invoice");
            return Outcome::State(State::message(Mutation::Update.database_error_message()));
        }

        tracing::info!(invoice_id = id, "invoice updated");
        self.invalidate_invoice_list();
        Outcome::redirect_to_invoices()
    }

    /// Delete invoice `id`. `None` means the row is gone and the list was
    /// invalidated; the caller stays on the current view.
    pub async fn delete_invoice(&self, id: &str) -> Option<State> {
        let result = match id.parse::<InvoiceId>() {
            Ok(invoice_id) => self.store.delete(invoice_id).await,
            Err(_) => Err(StoreError::NotFound),
        };
        if let Err(e) = result {
            tracing::error!(invoice_id = id, error = %e, "failed to delete invoice");
            return Some(State::message(Mutation::Delete.database_error_message()));
        }

        tracing::info!(invoice_id = id, "invoice deleted");
        self.invalidate_invoice_list();
        None
    }

    fn invalidate_invoice_list(&self) {
        self.cache.invalidate(&CacheTag::new(INVOICES_PATH));
    }
}

/// Sign in with email and password.
///
/// `Ok(None)` on success, `Ok(Some(message))` for a recognized sign-in
/// failure. Anything the verifier could not classify is returned as `Err`.
pub async fn authenticate(
    verifier: &dyn CredentialVerifier,
    credentials: &Credentials,
) -> anyhow::Result<Option<String>> {
    match verifier.verify(CREDENTIALS_PROVIDER, credentials).await {
        Ok(user_id) => {
            tracing::info!(user_id = %user_id, "signed in");
            Ok(None)
        }
        Err(VerifyError::Auth(AuthErrorKind::CredentialsSignin)) => {
            Ok(Some(INVALID_CREDENTIALS_MESSAGE.to_string()))
        }
        Err(VerifyError::Auth(kind)) => {
            tracing::warn!(kind = %kind, "sign-in failed");
            Ok(Some(SOMETHING_WENT_WRONG_MESSAGE.to_string()))
        }
        Err(VerifyError::Other(e)) => Err(e.context("sign-in failed")),
    }
}
