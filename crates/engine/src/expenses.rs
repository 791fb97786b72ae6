//! Expense records.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    Netbanking,
    Wallet,
}

impl PaymentMethod {
    pub const ALL: &'static [&'static str] = &["cash", "card", "upi", "netbanking", "wallet"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Upi => "upi",
            Self::Netbanking => "netbanking",
            Self::Wallet => "wallet",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            "netbanking" => Ok(Self::Netbanking),
            "wallet" => Ok(Self::Wallet),
            other => Err(EngineError::Validation(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub amount_cents: i64,
    pub description: String,
    pub payment_method: String,
    /// Comma-joined normalized tag list (may be empty).
    pub tags: String,
    pub receipt_path: Option<String>,
    pub expense_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Expense snapshot handed to callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: MoneyCents,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub tags: String,
    pub receipt_path: Option<String>,
    pub expense_date: NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            amount: MoneyCents::new(model.amount_cents),
            description: model.description,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            tags: model.tags,
            receipt_path: model.receipt_path,
            expense_date: model.expense_date,
            created_at: model.created_at,
        })
    }
}

/// Serializes the business fields of a row for an audit snapshot.
///
/// Ownership and bookkeeping columns are included so a deleted expense can be
/// reconstructed from its last audit entry alone.
pub(crate) fn snapshot(model: &Model) -> ResultEngine<serde_json::Value> {
    serde_json::to_value(SnapshotView {
        id: model.id,
        user_id: model.user_id,
        category_id: model.category_id,
        amount: MoneyCents::new(model.amount_cents).to_major_f64(),
        description: &model.description,
        payment_method: &model.payment_method,
        tags: &model.tags,
        receipt_path: model.receipt_path.as_deref(),
        expense_date: model.expense_date,
    })
    .map_err(|err| EngineError::Validation(format!("snapshot serialization failed: {err}")))
}

#[derive(Serialize)]
struct SnapshotView<'a> {
    id: i64,
    user_id: i64,
    category_id: i64,
    amount: f64,
    description: &'a str,
    payment_method: &'a str,
    tags: &'a str,
    receipt_path: Option<&'a str>,
    expense_date: NaiveDate,
}
