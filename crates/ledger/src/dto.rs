//! Export shape of a ledger report.
//!
//! Flat, serde-friendly records that exporters (CSV, JSON, Markdown, XML)
//! and persistence layers consume. Quantities serialize as decimal strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storehouse_core::{Entity, ItemId, ReportId, StorageId, UnitId};

use crate::report::{LedgerReport, ReportDiagnostics};
use crate::row::LedgerRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRowDto {
    pub item_id: ItemId,
    pub item_name: String,
    pub unit_id: UnitId,
    pub unit_name: String,
    pub opening_balance: Decimal,
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub closing_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReportDto {
    pub id: ReportId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub storage_id: StorageId,
    pub storage_name: String,
    pub rows: Vec<LedgerRowDto>,
    pub diagnostics: ReportDiagnostics,
}

impl From<&LedgerRow> for LedgerRowDto {
    fn from(row: &LedgerRow) -> Self {
        Self {
            item_id: row.item().id(),
            item_name: row.item().name().to_string(),
            unit_id: row.unit().id(),
            unit_name: row.unit().name().to_string(),
            opening_balance: row.opening_balance(),
            inflow: row.inflow(),
            outflow: row.outflow(),
            closing_balance: row.closing_balance(),
        }
    }
}

impl From<&LedgerReport> for LedgerReportDto {
    fn from(report: &LedgerReport) -> Self {
        Self {
            id: report.id(),
            start: report.period().start(),
            end: report.period().end(),
            storage_id: report.storage().code(),
            storage_name: report.storage().name().to_string(),
            rows: report.rows().iter().map(LedgerRowDto::from).collect(),
            diagnostics: *report.diagnostics(),
        }
    }
}

impl LedgerReport {
    pub fn to_dto(&self) -> LedgerReportDto {
        LedgerReportDto::from(self)
    }
}
