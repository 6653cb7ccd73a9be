//! Caller-facing results of the invoice mutations.

use serde::{Deserialize, Serialize};

use crate::form::FieldErrors;

/// Path of the invoice list view. Doubles as its cache tag and as the
/// redirect target after a successful create/update.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Result shape handed back to the form: field errors plus a summary message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl State {
    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors: Some(errors),
            message: Some(message.into()),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }
}

/// How a mutation ended: either navigate away, or stay and show a `State`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Redirect(String),
    State(State),
}

impl Outcome {
    pub fn redirect_to_invoices() -> Self {
        Outcome::Redirect(INVOICES_PATH.to_string())
    }

    pub fn state(&self) -> Option<&State> {
        match self {
            Outcome::State(s) => Some(s),
            Outcome::Redirect(_) => None,
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Outcome::Redirect(path) => Some(path),
            Outcome::State(_) => None,
        }
    }
}

/// The three invoice mutations, used to word their failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    fn verb(self) -> &'static str {
        match self {
            Mutation::Create => "Create",
            Mutation::Update => "Update",
            Mutation::Delete => "Delete",
        }
    }

    pub fn missing_fields_message(self) -> String {
        format!("Missing Fields. Failed to {} Invoice.", self.verb())
    }

    pub fn database_error_message(self) -> String {
        format!("Database Error: Failed to {} Invoice.", self.verb())
    }
}
