//! Command structs for engine operations.
//!
//! These types group parameters for expense write operations, keeping call
//! sites readable and avoiding long argument lists.

use crate::validate::ExpenseDraft;

/// Create a new expense.
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub user_id: i64,
    pub draft: ExpenseDraft,
    /// Skip the duplicate probe when the caller confirmed the submission.
    pub force: bool,
}

impl CreateExpenseCmd {
    #[must_use]
    pub fn new(user_id: i64, draft: ExpenseDraft) -> Self {
        Self {
            user_id,
            draft,
            force: false,
        }
    }

    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Update an existing expense; absent draft fields keep their stored value.
#[derive(Clone, Debug)]
pub struct UpdateExpenseCmd {
    pub user_id: i64,
    pub expense_id: i64,
    pub draft: ExpenseDraft,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new(user_id: i64, expense_id: i64, draft: ExpenseDraft) -> Self {
        Self {
            user_id,
            expense_id,
            draft,
        }
    }
}
