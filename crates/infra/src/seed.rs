//! Demo data for the in-memory backend.

use anyhow::Context;
use chrono::NaiveDate;
use uuid::Uuid;

use invoicedash_auth::{InMemoryCredentialVerifier, User};
use invoicedash_core::{Cents, InvoiceId, SellerId, UserId};
use invoicedash_invoicing::{InvoiceRecord, InvoiceStatus};

use crate::queries::{Revenue, Seller};
use crate::store::InMemoryDashboardStore;

pub const DEMO_USER_EMAIL: &str = "user@nextmail.com";
pub const DEMO_USER_PASSWORD: &str = "123456";

const DEMO_USER_ID: Uuid = Uuid::from_u128(0x410544b2_4001_4271_9855_fec4b6a6442a);

const SELLERS: &[(u128, &str, &str, &str)] = &[
    (0x3958dc9e_712f_4377_85e9_fec4b6a6442a, "Delba de Oliveira", "delba@oliveira.com", "/sellers/delba-de-oliveira.png"),
    (0x3958dc9e_742f_4377_85e9_fec4b6a6442a, "Lee Robinson", "lee@robinson.com", "/sellers/lee-robinson.png"),
    (0x3958dc9e_737f_4377_85e9_fec4b6a6442a, "Hector Simpson", "hector@simpson.com", "/sellers/hector-simpson.png"),
    (0x50ca3e18_62cd_11ee_8c99_0242ac120002, "Steven Tey", "steven@tey.com", "/sellers/steven-tey.png"),
    (0x3958dc9e_787f_4377_85e9_fec4b6a6442a, "Steph Dietz", "steph@dietz.com", "/sellers/steph-dietz.png"),
    (0x76d65c26_f784_44a2_ac19_586678f7c2f2, "Michael Novotny", "michael@novotny.com", "/sellers/michael-novotny.png"),
];

/// (seller index, cents, status, date)
const INVOICES: &[(usize, i64, &str, &str)] = &[
    (0, 15795, "awaiting", "2022-12-06"),
    (1, 20348, "awaiting", "2022-11-14"),
    (4, 3040, "fulfilled", "2022-10-29"),
    (3, 44800, "fulfilled", "2023-09-10"),
    (5, 34577, "awaiting", "2023-08-05"),
    (2, 54246, "awaiting", "2023-07-16"),
    (0, 666, "awaiting", "2023-06-27"),
    (3, 32545, "fulfilled", "2023-06-09"),
    (4, 1250, "fulfilled", "2023-06-17"),
    (5, 8546, "fulfilled", "2023-06-07"),
    (1, 500, "fulfilled", "2023-08-19"),
    (5, 8945, "fulfilled", "2023-06-03"),
    (2, 1000, "fulfilled", "2022-06-05"),
];

const REVENUE: &[(&str, i64)] = &[
    ("Jan", 2000),
    ("Feb", 1800),
    ("Mar", 2200),
    ("Apr", 2500),
    ("May", 2300),
    ("Jun", 3200),
    ("Jul", 3500),
    ("Aug", 3700),
    ("Sep", 2500),
    ("Oct", 2800),
    ("Nov", 3000),
    ("Dec", 4800),
];

/// Load the demo sellers, invoices, revenue series and sign-in user.
pub fn seed_demo_data(
    store: &InMemoryDashboardStore,
    verifier: &InMemoryCredentialVerifier,
) -> anyhow::Result<()> {
    let seller_ids: Vec<SellerId> = SELLERS
        .iter()
        .map(|(id, _, _, _)| SellerId::from_uuid(Uuid::from_u128(*id)))
        .collect();

    for ((_, name, email, image_url), id) in SELLERS.iter().zip(&seller_ids) {
        store.add_seller(Seller {
            id: *id,
            name: name.to_string(),
            email: email.to_string(),
            image_url: image_url.to_string(),
        })?;
    }

    for (seller, cents, status, date) in INVOICES {
        let seller_id = *seller_ids
            .get(*seller)
            .with_context(|| format!("demo invoice references seller #{seller}"))?;
        store.add_invoice(InvoiceRecord {
            id: InvoiceId::new(),
            seller_id,
            amount: Cents::new(*cents),
            status: status.parse::<InvoiceStatus>()?,
            date: date
                .parse::<NaiveDate>()
                .with_context(|| format!("demo invoice date {date:?}"))?,
        })?;
    }

    store.set_revenue(
        REVENUE
            .iter()
            .map(|(month, revenue)| Revenue {
                month: month.to_string(),
                revenue: *revenue,
            })
            .collect(),
    )?;

    verifier.insert(User::new(
        UserId::from_uuid(DEMO_USER_ID),
        "User",
        DEMO_USER_EMAIL,
        DEMO_USER_PASSWORD,
    )?);

    tracing::info!(
        sellers = SELLERS.len(),
        invoices = INVOICES.len(),
        "seeded demo data"
    );
    Ok(())
}
