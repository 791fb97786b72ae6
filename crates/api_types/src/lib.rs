use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthUserView {
        pub id: i64,
        pub username: String,
        pub email: String,
    }

    /// Body of successful register/login responses.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub token: String,
        pub user: AuthUserView,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileView {
        pub id: i64,
        pub username: String,
        pub email: String,
        pub full_name: Option<String>,
    }

    /// Request body for updating the profile; absent fields are kept.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub username: Option<String>,
        pub full_name: Option<String>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub color_code: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub color_code: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub user_id: Option<i64>,
        pub name: String,
        pub color_code: String,
        pub is_system: bool,
    }
}

pub mod expense {
    use super::*;

    /// JSON body for creating or partially updating an expense.
    ///
    /// All fields are optional at the wire level; the server decides which
    /// ones a given operation requires. Amounts are decimal major units.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseBody {
        pub amount: Option<f64>,
        pub description: Option<String>,
        pub category_id: Option<i64>,
        pub payment_method: Option<String>,
        /// `YYYY-MM-DD`.
        pub expense_date: Option<String>,
        pub tags: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i64,
        pub category_id: i64,
        pub amount: f64,
        pub description: String,
        pub payment_method: String,
        pub tags: String,
        pub receipt_path: Option<String>,
        pub expense_date: NaiveDate,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub items: Vec<ExpenseView>,
        pub total: u64,
        pub page: u64,
        pub limit: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkDeleteRequest {
        pub ids: Vec<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkDeleteResponse {
        pub deleted: u64,
    }
}

pub mod analytics {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendingView {
        pub name: String,
        pub total: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OverviewResponse {
        pub current_month_total: f64,
        pub previous_month_total: f64,
        pub top_categories: Vec<CategorySpendingView>,
        pub recent_expenses: Vec<super::expense::ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTrendView {
        pub year: i32,
        pub month: u32,
        pub total: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ForecastResponse {
        pub avg_daily: f64,
        pub projected_month_total: f64,
    }
}
