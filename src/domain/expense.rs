use std::collections::HashSet;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{Category, Cents, as_units};

/// Expense ids are millisecond timestamps, kept strictly increasing per ledger.
pub type ExpenseId = i64;

/// Name given to the record synthesized when a receipt arrives on an empty ledger.
pub const RECEIPT_PLACEHOLDER_NAME: &str = "Receipt Upload";

/// A single recorded expense.
///
/// Serializes to `{id, name, amount, category, date, receipt}` with `amount`
/// in currency units and `receipt` as a data URI or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    #[serde(rename = "amount", with = "as_units")]
    pub amount_cents: Cents,
    /// Stored verbatim, even when it is not a known category.
    pub category: String,
    /// Formatted once at creation time.
    pub date: String,
    #[serde(default)]
    pub receipt: Option<String>,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        name: String,
        amount_cents: Cents,
        category: String,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            name,
            amount_cents,
            category,
            date: format_expense_date(created_at),
            receipt: None,
        }
    }

    /// Zero-amount record that only carries a receipt.
    pub fn receipt_placeholder(id: ExpenseId, receipt: String, created_at: DateTime<Local>) -> Self {
        Self::new(
            id,
            RECEIPT_PLACEHOLDER_NAME.to_string(),
            0,
            Category::Other.as_str().to_string(),
            created_at,
        )
        .with_receipt(receipt)
    }

    pub fn with_receipt(mut self, receipt: String) -> Self {
        self.receipt = Some(receipt);
        self
    }

    pub fn has_receipt(&self) -> bool {
        self.receipt.is_some()
    }

    /// Category used for display; unknown values resolve to `Other`.
    pub fn display_category(&self) -> Category {
        Category::resolve(&self.category)
    }
}

/// en-US short date, e.g. "Oct 19, 2026".
pub fn format_expense_date<Tz: chrono::TimeZone>(at: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%b %-d, %Y").to_string()
}

/// Next id for a ledger: the current timestamp, bumped past the largest
/// existing id so ids stay unique when several records land in the same
/// millisecond. If the largest id is `i64::MAX`, the first free id counting
/// up from the timestamp is used instead.
pub fn next_expense_id(now_millis: i64, expenses: &[Expense]) -> ExpenseId {
    match expenses.iter().map(|e| e.id).max() {
        Some(last) if last >= now_millis => match last.checked_add(1) {
            Some(id) => id,
            None => {
                let used: HashSet<ExpenseId> = expenses.iter().map(|e| e.id).collect();
                (now_millis..=i64::MAX)
                    .chain(i64::MIN..now_millis)
                    .find(|id| !used.contains(id))
                    .unwrap_or(now_millis)
            }
        },
        _ => now_millis,
    }
}
