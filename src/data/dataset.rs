//! Dataset Module
//! In-memory avocado sales table, sorted by date and immutable after load.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Region value of the whole-country rollup rows.
pub const ROLLUP_REGION: &str = "TotalUS";

/// One row of the sales table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub date: NaiveDate,
    pub region: String,
    pub avocado_type: String,
    pub average_price: f64,
    pub total_volume: f64,
}

impl Record {
    pub fn is_rollup(&self) -> bool {
        self.region == ROLLUP_REGION
    }
}

/// Sales records ordered ascending by date.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, sorting rows by date. Rows sharing a date keep file order.
    pub fn from_records(mut records: Vec<Record>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct regions, alphabetically sorted.
    pub fn regions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.region.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct types in order of first appearance.
    pub fn types(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.avocado_type.as_str()))
            .map(|r| r.avocado_type.clone())
            .collect()
    }

    /// Every calendar day from the first to the last date, inclusive.
    pub fn calendar_days(&self) -> Vec<NaiveDate> {
        match self.date_bounds() {
            Some((first, last)) => first.iter_days().take_while(|d| *d <= last).collect(),
            None => Vec::new(),
        }
    }

    /// First and last date of the table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }
}
