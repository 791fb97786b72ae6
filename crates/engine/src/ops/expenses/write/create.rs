use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    ChangeType, CreateExpenseCmd, EngineError, Expense, ResultEngine, expenses, validate,
};

use super::super::super::{Engine, with_tx};

impl Engine {
    /// Creates an expense: validate, check the category is usable, probe for
    /// duplicates, insert, and write the audit entry, all in one transaction.
    ///
    /// `cmd.force` skips the duplicate probe after the client confirmed the
    /// submission is intentional.
    pub async fn create_expense(&self, cmd: CreateExpenseCmd) -> ResultEngine<Expense> {
        let validated = validate::validate(&cmd.draft)?;

        with_tx!(self, |db_tx| {
            Self::require_usable_category(&db_tx, cmd.user_id, validated.category_id).await?;

            if !cmd.force {
                let candidates = Self::find_duplicate_expenses(
                    &db_tx,
                    cmd.user_id,
                    validated.amount,
                    &validated.description,
                    validated.expense_date,
                )
                .await?;
                if let Some(candidate) = candidates.into_iter().next() {
                    return Err(EngineError::PossibleDuplicate(candidate));
                }
            }

            let active = expenses::ActiveModel {
                user_id: ActiveValue::Set(cmd.user_id),
                category_id: ActiveValue::Set(validated.category_id),
                amount_cents: ActiveValue::Set(validated.amount.cents()),
                description: ActiveValue::Set(validated.description.clone()),
                payment_method: ActiveValue::Set(validated.payment_method.as_str().to_string()),
                tags: ActiveValue::Set(validated.tags.clone()),
                receipt_path: ActiveValue::Set(validated.receipt_path.clone()),
                expense_date: ActiveValue::Set(validated.expense_date),
                created_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let model = active.insert(&db_tx).await?;

            let after = expenses::snapshot(&model)?;
            Self::record_audit(
                &db_tx,
                model.id,
                ChangeType::Create,
                cmd.user_id,
                None,
                Some(&after),
            )
            .await?;

            tracing::info!(expense_id = model.id, user_id = cmd.user_id, "expense created");
            Expense::try_from(model)
        })
    }
}
