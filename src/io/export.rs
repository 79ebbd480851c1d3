use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerStore;
use crate::domain::{Expense, format_cents, units_from_cents};
use crate::storage::KeyValueStore;

/// Full ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    /// Budget in currency units.
    pub budget: f64,
    pub dark_mode: bool,
    pub expenses: Vec<Expense>,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a, S: KeyValueStore> {
    store: &'a LedgerStore<S>,
}

impl<'a, S: KeyValueStore> Exporter<'a, S> {
    pub fn new(store: &'a LedgerStore<S>) -> Self {
        Self { store }
    }

    /// Export expenses to CSV format. Receipts are reduced to a yes/no column.
    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "name", "category", "amount", "has_receipt"])?;

        let mut count = 0;
        for expense in self.store.expenses() {
            csv_writer.write_record([
                expense.id.to_string(),
                expense.date.clone(),
                expense.name.clone(),
                expense.category.clone(),
                format_cents(expense.amount_cents),
                expense.has_receipt().to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the whole ledger as a JSON snapshot
    pub fn export_snapshot_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            budget: units_from_cents(self.store.budget()),
            dark_mode: self.store.dark_mode(),
            expenses: self.store.expenses().to_vec(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
