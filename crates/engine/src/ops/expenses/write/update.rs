use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    ChangeType, Expense, MoneyCents, ResultEngine, UpdateExpenseCmd, expenses, validate,
};

use super::super::super::{Engine, with_tx};

/// Merges the stored row into the draft so absent fields keep their value
/// and the full result goes through the same rules as a create.
fn merge_draft(model: &expenses::Model, draft: &validate::ExpenseDraft) -> validate::ExpenseDraft {
    validate::ExpenseDraft {
        amount: draft
            .amount
            .clone()
            .or_else(|| Some(MoneyCents::new(model.amount_cents).to_string())),
        description: draft
            .description
            .clone()
            .or_else(|| Some(model.description.clone())),
        category_id: draft
            .category_id
            .clone()
            .or_else(|| Some(model.category_id.to_string())),
        payment_method: draft
            .payment_method
            .clone()
            .or_else(|| Some(model.payment_method.clone())),
        expense_date: draft
            .expense_date
            .clone()
            .or_else(|| Some(model.expense_date.format("%Y-%m-%d").to_string())),
        tags: draft.tags.clone().or_else(|| Some(model.tags.clone())),
        receipt_path: draft
            .receipt_path
            .clone()
            .or_else(|| model.receipt_path.clone()),
    }
}

impl Engine {
    /// Partially updates an expense.
    ///
    /// Stored values fill in the fields the caller did not send, then the
    /// merged result is validated as a whole before anything is written.
    pub async fn update_expense(&self, cmd: UpdateExpenseCmd) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let model = Self::load_owned_expense(&db_tx, cmd.user_id, cmd.expense_id).await?;

            let merged = merge_draft(&model, &cmd.draft);
            let validated = validate::validate(&merged)?;

            // Category ownership and the duplicate probe run on create only.
            let before = expenses::snapshot(&model)?;

            let mut active: expenses::ActiveModel = model.into();
            active.category_id = ActiveValue::Set(validated.category_id);
            active.amount_cents = ActiveValue::Set(validated.amount.cents());
            active.description = ActiveValue::Set(validated.description.clone());
            active.payment_method =
                ActiveValue::Set(validated.payment_method.as_str().to_string());
            active.tags = ActiveValue::Set(validated.tags.clone());
            active.receipt_path = ActiveValue::Set(validated.receipt_path.clone());
            active.expense_date = ActiveValue::Set(validated.expense_date);
            let model = active.update(&db_tx).await?;

            let after = expenses::snapshot(&model)?;
            Self::record_audit(
                &db_tx,
                model.id,
                ChangeType::Update,
                cmd.user_id,
                Some(&before),
                Some(&after),
            )
            .await?;

            tracing::info!(expense_id = model.id, user_id = cmd.user_id, "expense updated");
            Expense::try_from(model)
        })
    }
}
