pub use audit_logs::ChangeType;
pub use categories::{Category, DEFAULT_COLOR_CODE};
pub use commands::{CreateExpenseCmd, UpdateExpenseCmd};
pub use error::{DuplicateCandidate, EngineError};
pub use expenses::{Expense, PaymentMethod};
pub use money::MoneyCents;
pub use ops::{
    AnalyticsOverview, CategorySpending, Engine, EngineBuilder, ExpenseListFilter, ExpensePage,
    MonthlySpending, SpendingForecast,
};
pub use validate::{ExpenseDraft, ValidatedExpense, MAX_AMOUNT, MAX_DESCRIPTION_LEN};

pub mod audit_logs;
pub mod categories;
mod commands;
mod error;
pub mod expenses;
mod money;
mod ops;
pub mod users;
mod util;
mod validate;

type ResultEngine<T> = Result<T, EngineError>;
