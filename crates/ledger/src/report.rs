//! Turnover-balance report container.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storehouse_core::{DomainError, Entity, ItemId, ReportId, UnitId};
use storehouse_inventory::{ItemCatalog, Storage, UnitOfMeasure};

use crate::error::LedgerError;
use crate::period::Period;
use crate::row::LedgerRow;

/// Counters collected while a report is generated.
///
/// Movements at other storages or dated after the period end are excluded by
/// the partition itself and are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDiagnostics {
    /// Movements at the report's storage dated on or before the period end.
    pub considered: u64,
    /// Movements folded into opening balances.
    pub opening_applied: u64,
    /// Movements folded into inflow/outflow.
    pub period_applied: u64,
    /// Movements whose item has no row in the supplied catalog.
    pub unknown_item: u64,
    /// Movements whose unit could not be converted to the row's unit.
    pub unconvertible: u64,
}

impl ReportDiagnostics {
    pub fn skipped(&self) -> u64 {
        self.unknown_item + self.unconvertible
    }
}

/// Per-unit sums over the rows of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitTotals {
    pub unit: Arc<UnitOfMeasure>,
    pub opening_balance: Decimal,
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub closing_balance: Decimal,
}

/// Turnover-balance report for one storage and period.
///
/// Holds exactly one row per catalog item, in catalog order, including items
/// without any movement.
#[derive(Debug, Clone)]
pub struct LedgerReport {
    id: ReportId,
    period: Period,
    storage: Arc<Storage>,
    rows: Vec<LedgerRow>,
    index: HashMap<ItemId, usize>,
    diagnostics: ReportDiagnostics,
}

impl LedgerReport {
    /// Zeroed report with one row per catalog item.
    pub(crate) fn empty(period: Period, storage: Arc<Storage>, catalog: &ItemCatalog) -> Self {
        let mut rows = Vec::with_capacity(catalog.len());
        let mut index = HashMap::with_capacity(catalog.len());
        for item in catalog {
            index.insert(item.id(), rows.len());
            rows.push(LedgerRow::new(item));
        }
        Self {
            id: ReportId::new(),
            period,
            storage,
            rows,
            index,
            diagnostics: ReportDiagnostics::default(),
        }
    }

    pub(crate) fn row_mut(&mut self, item_id: &ItemId) -> Option<&mut LedgerRow> {
        let idx = *self.index.get(item_id)?;
        self.rows.get_mut(idx)
    }

    pub(crate) fn set_diagnostics(&mut self, diagnostics: ReportDiagnostics) {
        self.diagnostics = diagnostics;
    }

    pub fn id(&self) -> ReportId {
        self.id
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    /// Rows in catalog order.
    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn diagnostics(&self) -> &ReportDiagnostics {
        &self.diagnostics
    }

    pub fn row(&self, item_id: &ItemId) -> Option<&LedgerRow> {
        self.index.get(item_id).map(|&idx| &self.rows[idx])
    }

    /// Like [`LedgerReport::row`], failing with [`LedgerError::RowNotFound`].
    pub fn find_row(&self, item_id: &ItemId) -> Result<&LedgerRow, LedgerError> {
        self.row(item_id).ok_or(LedgerError::RowNotFound(*item_id))
    }

    /// Rows with a non-zero figure.
    pub fn active_rows(&self) -> impl Iterator<Item = &LedgerRow> {
        self.rows.iter().filter(|row| row.has_activity())
    }

    /// Column sums per reporting unit, in order of first appearance.
    ///
    /// Rows in different units are never added together. Fails when a sum
    /// leaves the `Decimal` range.
    pub fn totals(&self) -> Result<Vec<UnitTotals>, LedgerError> {
        let mut totals: Vec<UnitTotals> = Vec::new();
        let mut positions: HashMap<UnitId, usize> = HashMap::new();

        for row in &self.rows {
            let idx = *positions.entry(row.unit().id()).or_insert_with(|| {
                totals.push(UnitTotals {
                    unit: Arc::clone(row.unit()),
                    opening_balance: Decimal::ZERO,
                    inflow: Decimal::ZERO,
                    outflow: Decimal::ZERO,
                    closing_balance: Decimal::ZERO,
                });
                totals.len() - 1
            });
            let t = &mut totals[idx];
            let add = |total: Decimal, value: Decimal| {
                total.checked_add(value).ok_or_else(|| {
                    DomainError::invariant(format!("{} totals overflow", row.unit().name()))
                })
            };
            t.opening_balance = add(t.opening_balance, row.opening_balance())?;
            t.inflow = add(t.inflow, row.inflow())?;
            t.outflow = add(t.outflow, row.outflow())?;
            t.closing_balance = add(t.closing_balance, row.closing_balance())?;
        }

        Ok(totals)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
