//! One item's turnover for a period.

use std::sync::Arc;

use rust_decimal::Decimal;

use storehouse_core::{DomainError, DomainResult, ValueObject};
use storehouse_inventory::{Item, UnitOfMeasure};

/// Turnover of a single item, expressed in the item's reporting unit.
///
/// `closing_balance == opening_balance + inflow - outflow` holds after every
/// mutation; `inflow` and `outflow` are non-negative magnitudes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    item: Arc<Item>,
    unit: Arc<UnitOfMeasure>,
    opening_balance: Decimal,
    inflow: Decimal,
    outflow: Decimal,
    closing_balance: Decimal,
}

impl LedgerRow {
    /// Zeroed row reporting in the item's base unit (or its own unit if it
    /// has no base).
    pub fn new(item: &Arc<Item>) -> Self {
        Self {
            item: Arc::clone(item),
            unit: Arc::clone(item.reporting_unit()),
            opening_balance: Decimal::ZERO,
            inflow: Decimal::ZERO,
            outflow: Decimal::ZERO,
            closing_balance: Decimal::ZERO,
        }
    }

    pub fn item(&self) -> &Arc<Item> {
        &self.item
    }

    pub fn unit(&self) -> &Arc<UnitOfMeasure> {
        &self.unit
    }

    pub fn opening_balance(&self) -> Decimal {
        self.opening_balance
    }

    pub fn inflow(&self) -> Decimal {
        self.inflow
    }

    pub fn outflow(&self) -> Decimal {
        self.outflow
    }

    pub fn closing_balance(&self) -> Decimal {
        self.closing_balance
    }

    /// Net movement within the period.
    pub fn net_change(&self) -> Decimal {
        self.inflow - self.outflow
    }

    pub fn has_activity(&self) -> bool {
        !(self.opening_balance.is_zero()
            && self.inflow.is_zero()
            && self.outflow.is_zero()
            && self.closing_balance.is_zero())
    }

    pub fn is_balanced(&self) -> bool {
        // Both sides stay in range whenever the identity holds.
        self.closing_balance.checked_sub(self.opening_balance) == Some(self.net_change())
    }

    /// Movement dated before the period start; `quantity` is already in
    /// the reporting unit.
    pub(crate) fn apply_opening(&mut self, quantity: Decimal) -> DomainResult<()> {
        let opening_balance = self.checked_add(self.opening_balance, quantity)?;
        let closing_balance = self.checked_add(self.closing_balance, quantity)?;
        self.opening_balance = opening_balance;
        self.closing_balance = closing_balance;
        Ok(())
    }

    /// Movement dated within the period; `quantity` is already in the
    /// reporting unit. The row is left untouched on overflow.
    pub(crate) fn apply_movement(&mut self, quantity: Decimal) -> DomainResult<()> {
        let (inflow, outflow) = if quantity.is_sign_negative() {
            (self.inflow, self.checked_add(self.outflow, quantity.abs())?)
        } else {
            (self.checked_add(self.inflow, quantity)?, self.outflow)
        };
        let closing_balance = self.checked_add(self.closing_balance, quantity)?;
        self.inflow = inflow;
        self.outflow = outflow;
        self.closing_balance = closing_balance;
        Ok(())
    }

    fn checked_add(&self, total: Decimal, quantity: Decimal) -> DomainResult<Decimal> {
        total.checked_add(quantity).ok_or_else(|| {
            DomainError::invariant(format!("ledger row for '{}' overflows", self.item.name()))
        })
    }
}

impl ValueObject for LedgerRow {}
