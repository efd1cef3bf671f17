//! Ledger error model.

use thiserror::Error;

use storehouse_core::{DomainError, ItemId};

/// Errors surfaced by report generation and report lookups.
///
/// Data the engine cannot map (foreign storage, unknown item) is skipped and
/// never shows up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A movement's unit is neither the row's reporting unit nor derived
    /// directly from it. Only raised under `ConversionPolicy::Fail`.
    #[error("cannot convert '{item}' from '{from}' to '{to}'")]
    UnsupportedConversion { item: String, from: String, to: String },

    /// The report holds no row for this item.
    #[error("no ledger row for item {0}")]
    RowNotFound(ItemId),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
