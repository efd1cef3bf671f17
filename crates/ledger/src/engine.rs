//! Turnover-balance aggregation.
//!
//! Given a catalog, a transaction log, a storage and a period, the engine
//! produces one [`LedgerRow`](crate::row::LedgerRow) per catalog item:
//!
//! - movements at the storage dated **before** `start` build the opening balance;
//! - movements dated within `[start, end]` build inflow (positive) and
//!   outflow (magnitude of negatives);
//! - the closing balance receives every applied movement.
//!
//! Every call starts from an empty report, so repeated calls over unchanged
//! inputs yield identical figures.

use std::sync::Arc;

use storehouse_core::Entity;
use storehouse_inventory::{ItemCatalog, Storage, Transaction, convert};

use crate::error::LedgerError;
use crate::period::{Period, Phase};
use crate::report::{LedgerReport, ReportDiagnostics};

/// What to do with a movement whose unit cannot be converted into the row's
/// reporting unit.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ConversionPolicy {
    /// Leave the movement out, count it in
    /// [`ReportDiagnostics::unconvertible`] and log a warning.
    #[default]
    Skip,
    /// Abort generation with [`LedgerError::UnsupportedConversion`].
    Fail,
}

/// Stateless report generator.
#[derive(Debug, Clone, Default)]
pub struct LedgerEngine {
    conversion_policy: ConversionPolicy,
}

impl LedgerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conversion_policy(mut self, policy: ConversionPolicy) -> Self {
        self.conversion_policy = policy;
        self
    }

    pub fn conversion_policy(&self) -> ConversionPolicy {
        self.conversion_policy
    }

    /// Build the turnover-balance report for `storage` over `period`.
    ///
    /// Movements for items outside `catalog` are skipped; movements at other
    /// storages never touch the report. Fails under
    /// [`ConversionPolicy::Fail`] for an unconvertible unit, and with
    /// [`LedgerError::Domain`] when a quantity leaves the `Decimal` range.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(storage = %storage.code(), start = %period.start(), end = %period.end())
    )]
    pub fn generate<'a, I>(
        &self,
        period: &Period,
        storage: &Arc<Storage>,
        catalog: &ItemCatalog,
        transactions: I,
    ) -> Result<LedgerReport, LedgerError>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut report = LedgerReport::empty(*period, Arc::clone(storage), catalog);
        let mut diagnostics = ReportDiagnostics::default();

        for transaction in transactions {
            if **transaction.storage() != **storage {
                continue;
            }
            let Some(phase) = period.phase_of(transaction.occurred_at()) else {
                continue;
            };
            diagnostics.considered += 1;

            let Some(row) = report.row_mut(&transaction.item().id()) else {
                diagnostics.unknown_item += 1;
                continue;
            };

            let Some(quantity) = convert(transaction.quantity(), transaction.unit(), row.unit())?
            else {
                match self.conversion_policy {
                    ConversionPolicy::Fail => {
                        return Err(LedgerError::UnsupportedConversion {
                            item: transaction.item().name().to_string(),
                            from: transaction.unit().name().to_string(),
                            to: row.unit().name().to_string(),
                        });
                    }
                    ConversionPolicy::Skip => {
                        tracing::warn!(
                            transaction_id = %transaction.id(),
                            item = %transaction.item().name(),
                            from = %transaction.unit().name(),
                            to = %row.unit().name(),
                            "skipping movement with unconvertible unit"
                        );
                        diagnostics.unconvertible += 1;
                        continue;
                    }
                }
            };

            match phase {
                Phase::Opening => {
                    row.apply_opening(quantity)?;
                    diagnostics.opening_applied += 1;
                }
                Phase::Period => {
                    row.apply_movement(quantity)?;
                    diagnostics.period_applied += 1;
                }
            }
        }

        tracing::debug!(
            rows = report.len(),
            considered = diagnostics.considered,
            opening_applied = diagnostics.opening_applied,
            period_applied = diagnostics.period_applied,
            unknown_item = diagnostics.unknown_item,
            unconvertible = diagnostics.unconvertible,
            "ledger report generated"
        );

        report.set_diagnostics(diagnostics);
        Ok(report)
    }
}

/// [`LedgerEngine::generate`] with the default (skipping) conversion policy.
pub fn generate<'a, I>(
    period: &Period,
    storage: &Arc<Storage>,
    catalog: &ItemCatalog,
    transactions: I,
) -> Result<LedgerReport, LedgerError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    LedgerEngine::new().generate(period, storage, catalog, transactions)
}
