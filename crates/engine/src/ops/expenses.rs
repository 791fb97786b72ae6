use chrono::NaiveDate;

use crate::Expense;

mod list;
mod write;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Filters for listing a user's expenses.
///
/// `date_from` and `date_to` are both inclusive.
#[derive(Clone, Debug)]
pub struct ExpenseListFilter {
    pub category_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// 1-based page number.
    pub page: u64,
    /// Rows per page, capped at [`MAX_PAGE_SIZE`].
    pub limit: u64,
}

impl Default for ExpenseListFilter {
    fn default() -> Self {
        Self {
            category_id: None,
            date_from: None,
            date_to: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of expenses plus the total match count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpensePage {
    pub items: Vec<Expense>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}
