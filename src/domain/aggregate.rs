use serde::{Deserialize, Serialize};

use super::{Cents, Expense};

/// One row of the category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Cents,
    pub percentage: f64,
}

/// Derived display values for a ledger snapshot. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_spent: Cents,
    pub remaining: Cents,
    pub over_budget: bool,
    pub breakdown: Vec<CategoryShare>,
}

/// Sum of all expense amounts. Saturates instead of overflowing.
pub fn total_spent(expenses: &[Expense]) -> Cents {
    expenses
        .iter()
        .fold(0, |total: Cents, e| total.saturating_add(e.amount_cents))
}

/// Budget left after spending. Negative means over budget.
pub fn remaining(budget: Cents, total: Cents) -> Cents {
    budget.saturating_sub(total)
}

/// Group spending by raw category, in order of first appearance.
/// Returns an empty breakdown when nothing has been spent.
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryShare> {
    let total = total_spent(expenses);
    if total == 0 {
        return Vec::new();
    }

    let mut groups: Vec<(&str, Cents)> = Vec::new();
    for expense in expenses {
        match groups.iter_mut().find(|(c, _)| *c == expense.category) {
            Some((_, sum)) => *sum = sum.saturating_add(expense.amount_cents),
            None => groups.push((expense.category.as_str(), expense.amount_cents)),
        }
    }

    groups
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_string(),
            amount,
            percentage: amount as f64 / total as f64 * 100.0,
        })
        .collect()
}

pub fn summarize(expenses: &[Expense], budget: Cents) -> LedgerSummary {
    let total = total_spent(expenses);
    let remaining = remaining(budget, total);
    LedgerSummary {
        total_spent: total,
        remaining,
        over_budget: remaining < 0,
        breakdown: category_breakdown(expenses),
    }
}
