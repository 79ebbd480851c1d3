use anyhow::Context;
use chrono::{Local, Utc};
use tracing::{debug, info, warn};

use crate::domain::{
    Cents, DEFAULT_BUDGET_CENTS, Expense, ExpenseId, LedgerSummary, MAX_AMOUNT_CENTS,
    cents_from_units, next_expense_id, summarize, units_from_cents,
};
use crate::io::ReceiptImage;
use crate::storage::{KEY_BUDGET, KEY_DARK_MODE, KEY_EXPENSES, KeyValueStore};

use super::AppError;

const INVALID_ENTRY: &str = "Please enter a valid expense name and a positive amount!";
const INVALID_BUDGET: &str = "Please enter a valid positive number for your budget.";
const AMOUNT_TOO_LARGE: &str = "Amounts cannot exceed 10000000000.00.";

/// Callback invoked after every mutation with the current records and aggregates.
pub type ChangeListener = Box<dyn Fn(&[Expense], &LedgerSummary) + Send>;

/// Everything the store persists.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerState {
    pub expenses: Vec<Expense>,
    pub budget: Cents,
    pub dark_mode: bool,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            expenses: Vec::new(),
            budget: DEFAULT_BUDGET_CENTS,
            dark_mode: false,
        }
    }
}

/// Outcome of attaching a receipt.
#[derive(Debug, Clone)]
pub struct ReceiptAttachment {
    pub expense: Expense,
    /// True when no expense existed and a placeholder was created.
    pub created: bool,
}

/// Owns the expense ledger, the budget and display preferences, and writes
/// them back to storage after every mutation.
///
/// A failed write never undoes the in-memory change. The failure is logged
/// and kept until [`LedgerStore::take_persistence_error`] is called.
pub struct LedgerStore<S: KeyValueStore> {
    storage: S,
    expenses: Vec<Expense>,
    budget: Cents,
    dark_mode: bool,
    listeners: Vec<ChangeListener>,
    persistence_error: Option<AppError>,
}

impl<S: KeyValueStore> LedgerStore<S> {
    /// Create a store with explicit initial state. Nothing is written until
    /// the first mutation or an explicit [`save`](Self::save).
    pub fn new(storage: S, state: LedgerState) -> Self {
        Self {
            storage,
            expenses: state.expenses,
            budget: state.budget,
            dark_mode: state.dark_mode,
            listeners: Vec::new(),
            persistence_error: None,
        }
    }

    /// Open a store from whatever is persisted. Missing or unreadable data
    /// falls back to an empty ledger and the default budget.
    pub async fn load(storage: S) -> Self {
        let state = read_state(&storage).await;
        info!(
            expenses = state.expenses.len(),
            budget = state.budget,
            "Loaded ledger"
        );
        Self::new(storage, state)
    }

    /// Write the full state to storage.
    pub async fn save(&self) -> Result<(), AppError> {
        let expenses =
            serde_json::to_string(&self.expenses).context("Failed to serialize expenses")?;
        self.storage.set(KEY_EXPENSES, &expenses).await?;
        self.storage
            .set(KEY_BUDGET, &units_from_cents(self.budget).to_string())
            .await?;
        self.storage
            .set(KEY_DARK_MODE, if self.dark_mode { "true" } else { "false" })
            .await?;
        debug!(expenses = self.expenses.len(), "Saved ledger");
        Ok(())
    }

    // ========================
    // Expense operations
    // ========================

    /// Record a new expense at the end of the ledger.
    pub async fn add_expense(
        &mut self,
        name: &str,
        amount: f64,
        category: &str,
    ) -> Result<Expense, AppError> {
        let (name, amount_cents) = validate_entry(name, amount)?;

        let id = next_expense_id(Utc::now().timestamp_millis(), &self.expenses);
        let expense = Expense::new(id, name, amount_cents, category.to_string(), Local::now());
        self.expenses.push(expense.clone());
        info!(id, amount_cents, category, "Added expense");

        self.commit().await;
        Ok(expense)
    }

    /// Remove an expense. Unknown ids leave the ledger untouched.
    pub async fn delete_expense(&mut self, id: ExpenseId) -> Result<Expense, AppError> {
        let expense = self.remove(id)?;
        info!(id, "Deleted expense");

        self.commit().await;
        Ok(expense)
    }

    /// Take an expense out of the ledger so it can be edited and added again.
    ///
    /// The returned record is no longer stored; re-submitting it through
    /// [`add_expense`](Self::add_expense) gives it a new id and puts it at
    /// the end of the list.
    pub async fn start_edit(&mut self, id: ExpenseId) -> Result<Expense, AppError> {
        let expense = self.remove(id)?;
        info!(id, "Expense removed for editing");

        self.commit().await;
        Ok(expense)
    }

    /// Attach a receipt to the most recent expense, or to a new zero-amount
    /// placeholder when the ledger is empty.
    pub async fn attach_receipt(&mut self, image: ReceiptImage) -> ReceiptAttachment {
        let attachment = match self.expenses.last_mut() {
            Some(last) => {
                last.receipt = Some(image.into_data_uri());
                ReceiptAttachment {
                    expense: last.clone(),
                    created: false,
                }
            }
            None => {
                let id = next_expense_id(Utc::now().timestamp_millis(), &self.expenses);
                let expense = Expense::receipt_placeholder(id, image.into_data_uri(), Local::now());
                self.expenses.push(expense.clone());
                ReceiptAttachment {
                    expense,
                    created: true,
                }
            }
        };
        info!(
            id = attachment.expense.id,
            created = attachment.created,
            "Attached receipt"
        );

        self.commit().await;
        attachment
    }

    /// Drop every expense and restore the default budget.
    pub async fn reset_all(&mut self) {
        self.expenses.clear();
        self.budget = DEFAULT_BUDGET_CENTS;
        info!("Reset ledger");

        self.commit().await;
    }

    // ========================
    // Budget and preferences
    // ========================

    pub async fn set_budget(&mut self, value: f64) -> Result<(), AppError> {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::validation(INVALID_BUDGET));
        }
        let budget = cents_from_units(value)
            .filter(|cents| *cents <= MAX_AMOUNT_CENTS)
            .ok_or_else(|| AppError::validation(AMOUNT_TOO_LARGE))?;

        self.budget = budget;
        info!(budget, "Updated budget");

        self.commit().await;
        Ok(())
    }

    pub async fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
        self.commit().await;
    }

    /// Flip the dark-mode preference and return the new value.
    pub async fn toggle_dark_mode(&mut self) -> bool {
        let enabled = !self.dark_mode;
        self.set_dark_mode(enabled).await;
        enabled
    }

    // ========================
    // Queries
    // ========================

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn find(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn budget(&self) -> Cents {
        self.budget
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn summary(&self) -> LedgerSummary {
        summarize(&self.expenses, self.budget)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Register a render callback, run after every mutation.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: Fn(&[Expense], &LedgerSummary) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Return and clear the last storage failure, if any.
    pub fn take_persistence_error(&mut self) -> Option<AppError> {
        self.persistence_error.take()
    }

    fn remove(&mut self, id: ExpenseId) -> Result<Expense, AppError> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(AppError::ExpenseNotFound(id))?;
        Ok(self.expenses.remove(index))
    }

    /// Persist and notify listeners after an in-memory change.
    async fn commit(&mut self) {
        if let Err(err) = self.save().await {
            warn!(error = %err, "Failed to persist ledger; keeping in-memory state");
            self.persistence_error = Some(err);
        }

        if !self.listeners.is_empty() {
            let summary = self.summary();
            for listener in &self.listeners {
                listener(&self.expenses, &summary);
            }
        }
    }
}

/// Check a user-entered expense and normalize it to a trimmed name and cents.
///
/// Amounts are rounded to the nearest cent; anything that rounds to zero is
/// not a positive amount. Amounts above [`MAX_AMOUNT_CENTS`] are rejected.
pub fn validate_entry(name: &str, amount: f64) -> Result<(String, Cents), AppError> {
    let name = name.trim();
    if name.is_empty() || !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::validation(INVALID_ENTRY));
    }
    match cents_from_units(amount) {
        Some(cents) if cents > MAX_AMOUNT_CENTS => Err(AppError::validation(AMOUNT_TOO_LARGE)),
        Some(cents) if cents > 0 => Ok((name.to_string(), cents)),
        Some(_) => Err(AppError::validation(INVALID_ENTRY)),
        None => Err(AppError::validation(AMOUNT_TOO_LARGE)),
    }
}

async fn read_state<S: KeyValueStore>(storage: &S) -> LedgerState {
    let mut state = LedgerState::default();

    match storage.get(KEY_EXPENSES).await {
        Ok(Some(raw)) => match serde_json::from_str::<Vec<Expense>>(&raw) {
            Ok(expenses) => state.expenses = expenses,
            Err(err) => warn!(error = %err, "Stored expenses are malformed; starting empty"),
        },
        Ok(None) => {}
        Err(err) => warn!(error = %err, "Could not read expenses; starting empty"),
    }

    match storage.get(KEY_BUDGET).await {
        Ok(Some(raw)) => match parse_budget(&raw) {
            Some(budget) => state.budget = budget,
            None => warn!(raw = %raw, "Stored budget is invalid; using default"),
        },
        Ok(None) => {}
        Err(err) => warn!(error = %err, "Could not read budget; using default"),
    }

    match storage.get(KEY_DARK_MODE).await {
        Ok(Some(raw)) => state.dark_mode = raw.trim() == "true",
        Ok(None) => {}
        Err(err) => warn!(error = %err, "Could not read dark mode preference"),
    }

    state
}

fn parse_budget(raw: &str) -> Option<Cents> {
    let value: f64 = raw.trim().parse().ok()?;
    cents_from_units(value).filter(|cents| (0..=MAX_AMOUNT_CENTS).contains(cents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_entry() {
        assert_eq!(
            validate_entry("  Coffee ", 4.5).unwrap(),
            ("Coffee".to_string(), 450)
        );
        assert!(validate_entry("", 4.5).unwrap_err().is_validation());
        assert!(validate_entry("   ", 4.5).is_err());
        assert!(validate_entry("Coffee", 0.0).is_err());
        assert!(validate_entry("Coffee", -3.0).is_err());
        assert!(validate_entry("Coffee", f64::NAN).is_err());
        assert!(validate_entry("Coffee", f64::INFINITY).is_err());
        assert!(validate_entry("Coffee", 0.001).is_err());
    }

    #[test]
    fn test_validate_entry_rounds_to_cents() {
        assert_eq!(validate_entry("Fuel", 4.567).unwrap().1, 457);
        assert_eq!(validate_entry("Fuel", 4.564).unwrap().1, 456);
        assert_eq!(validate_entry("Gum", 0.005).unwrap().1, 1);

        let err = validate_entry("Gum", 0.004).unwrap_err();
        assert_eq!(err.to_string(), INVALID_ENTRY);
    }

    #[test]
    fn test_validate_entry_amount_cap() {
        assert_eq!(
            validate_entry("House", 10_000_000_000.0).unwrap().1,
            MAX_AMOUNT_CENTS
        );

        for amount in [10_000_000_000.01, 5e16, 1e300] {
            let err = validate_entry("Yacht", amount).unwrap_err();
            assert_eq!(err.to_string(), AMOUNT_TOO_LARGE);
        }
    }

    #[test]
    fn test_parse_budget() {
        assert_eq!(parse_budget("1000"), Some(100_000));
        assert_eq!(parse_budget("995.5"), Some(99_550));
        assert_eq!(parse_budget("0"), Some(0));
        assert_eq!(parse_budget("-5"), None);
        assert_eq!(parse_budget("abc"), None);
        assert_eq!(parse_budget("NaN"), None);
        assert_eq!(parse_budget("1e17"), None);
    }
}
