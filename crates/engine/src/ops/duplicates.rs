use chrono::NaiveDate;
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{DuplicateCandidate, MoneyCents, ResultEngine, expenses};

use super::Engine;

impl Engine {
    /// Probes for existing expenses that exactly match the submission on
    /// amount, description and date.
    ///
    /// The match is strict equality, not fuzzy. Candidates come back oldest
    /// first; the result is advisory and callers decide whether to block.
    pub(super) async fn find_duplicate_expenses(
        db_tx: &DatabaseTransaction,
        user_id: i64,
        amount: MoneyCents,
        description: &str,
        expense_date: NaiveDate,
    ) -> ResultEngine<Vec<DuplicateCandidate>> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .filter(expenses::Column::AmountCents.eq(amount.cents()))
            .filter(expenses::Column::Description.eq(description))
            .filter(expenses::Column::ExpenseDate.eq(expense_date))
            .order_by_asc(expenses::Column::Id)
            .all(db_tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|model| DuplicateCandidate {
                id: model.id,
                amount: MoneyCents::new(model.amount_cents),
                description: model.description,
                expense_date: model.expense_date,
            })
            .collect())
    }
}
