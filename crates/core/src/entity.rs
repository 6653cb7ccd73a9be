//! Rows with a stable identity.

/// A record identified by a copyable, ordered key.
///
/// The in-memory tables are keyed by `Entity::key`, so two records with the
/// same key are the same row whatever their other fields hold.
pub trait Entity {
    type Key: Copy + Ord + core::fmt::Display;

    fn key(&self) -> Self::Key;
}
