//! Row identifiers. Invoices, sellers and users are keyed by UUID columns.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of an invoice row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(Uuid);

/// Identifier of a seller (the party an invoice is billed against).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerId(Uuid);

/// Identifier of a dashboard user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

/// Parse an id out of a form field or URL segment.
///
/// Surrounding whitespace is ignored. The nil UUID is rejected: it is what an
/// unselected `<select>` or a zeroed column decodes to, never a real row.
fn parse_row_id(raw: &str, what: &str) -> Result<Uuid, DomainError> {
    let uuid = Uuid::from_str(raw.trim())
        .map_err(|e| DomainError::invalid_id(format!("{what}: {e}")))?;
    if uuid.is_nil() {
        return Err(DomainError::invalid_id(format!("{what}: nil uuid")));
    }
    Ok(uuid)
}

macro_rules! row_id {
    ($t:ty, $what:literal) => {
        impl $t {
            /// Fresh time-ordered (v7) id for a row inserted by this process.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_row_id(s, $what).map(Self)
            }
        }
    };
}

row_id!(InvoiceId, "invoice id");
row_id!(SellerId, "seller id");
row_id!(UserId, "user id");
