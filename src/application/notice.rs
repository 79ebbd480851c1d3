use std::fmt;

use super::AppError;

pub const MSG_EXPENSE_ADDED: &str = "Expense added!";
pub const MSG_EXPENSE_DELETED: &str = "Expense deleted successfully!";
pub const MSG_EXPENSE_LOADED_FOR_EDIT: &str =
    "Expense loaded for editing. Adjust and add it again to save!";
pub const MSG_DATA_RESET: &str = "All data has been reset!";
pub const MSG_BUDGET_UPDATED: &str = "Budget updated successfully!";
pub const MSG_RECEIPT_ATTACHED: &str = "Receipt added to your last expense!";
pub const MSG_RECEIPT_CREATED: &str = "New expense created with receipt!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Success => "success",
        }
    }
}

/// User-visible message produced by a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        Notice::error(err.to_string())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity.as_str(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_from_error() {
        let notice = Notice::from(&AppError::ExpenseNotFound(42));
        assert!(notice.is_error());
        assert_eq!(notice.message, "Expense not found: 42");
        assert_eq!(notice.to_string(), "[error] Expense not found: 42");
    }

    #[test]
    fn test_success_notice() {
        let notice = Notice::success(MSG_BUDGET_UPDATED);
        assert!(!notice.is_error());
        assert_eq!(notice.severity.as_str(), "success");
    }
}
