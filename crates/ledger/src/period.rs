//! Reporting period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storehouse_core::{DomainError, DomainResult, ValueObject};
use storehouse_inventory::parse_timestamp;

/// Where a timestamp falls relative to a [`Period`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Strictly before the start: contributes to the opening balance.
    Opening,
    /// Within `[start, end]`: contributes to inflow/outflow.
    Period,
}

/// Closed interval `[start, end]`; both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::validation(format!(
                "period start {start} is after its end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a period from two `YYYY-MM-DD HH:MM:SS` timestamps.
    pub fn parse(start: &str, end: &str) -> DomainResult<Self> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Classify `at`. A timestamp equal to `start` belongs to the period only;
    /// anything after `end` belongs to neither phase.
    pub fn phase_of(&self, at: DateTime<Utc>) -> Option<Phase> {
        if at < self.start {
            Some(Phase::Opening)
        } else if at <= self.end {
            Some(Phase::Period)
        } else {
            None
        }
    }
}

impl ValueObject for Period {}
