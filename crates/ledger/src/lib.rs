//! Turnover-balance ledger (opening balance, inflow, outflow, closing
//! balance per item) for one storage over a period.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod dto;
pub mod engine;
pub mod error;
pub mod period;
pub mod report;
pub mod row;

pub use dto::{LedgerReportDto, LedgerRowDto};
pub use engine::{ConversionPolicy, LedgerEngine, generate};
pub use error::LedgerError;
pub use period::{Period, Phase};
pub use report::{LedgerReport, ReportDiagnostics, UnitTotals};
pub use row::LedgerRow;
